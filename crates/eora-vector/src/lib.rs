//! LanceDB-backed persistent vector index for document chunks.

pub mod schema;
pub mod search;
pub mod table;
pub mod writer;

pub use search::LanceIndex;
pub use writer::ChunkWriter;
