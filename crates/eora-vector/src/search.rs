use arrow_array::{Array, Float32Array, RecordBatch, StringArray};
use async_trait::async_trait;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{DistanceType, Table};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use eora_core::traits::{Embedder, VectorIndex};
use eora_core::types::Metadata;
use eora_core::{Chunk, Error, Result, ScoredChunk};

use crate::table::{index_err, open_db, table_exists};
use crate::writer::ChunkWriter;
use crate::schema::DISTANCE_COLUMN;

/// Persistent chunk index: one Lance table inside `index_dir`.
///
/// Built once at startup and only read afterwards, so the handle can be
/// shared across queries without locking.
pub struct LanceIndex { table: Table, embedder: Arc<dyn Embedder> }

impl LanceIndex {
	/// Opens an index previously written by [`LanceIndex::create`].
	pub async fn open(index_dir: &Path, table_name: &str, embedder: Arc<dyn Embedder>) -> Result<Self> {
		let db = open_db(&index_dir.to_string_lossy()).await?;
		if !table_exists(&db, table_name).await? {
			return Err(Error::Index(format!("table '{}' not found in {}", table_name, index_dir.display())));
		}
		let table = db.open_table(table_name).execute().await.map_err(index_err)?;
		let rows = table.count_rows(None).await.map_err(index_err)?;
		info!(dir = %index_dir.display(), table = table_name, rows, "opened existing index");
		Ok(Self { table, embedder })
	}

	/// Writes `chunks` with precomputed `embeddings` into a new table and
	/// returns a handle to it.
	///
	/// Rows are written into a staging directory next to `index_dir` that is
	/// renamed into place only once every batch has landed, so a failed build
	/// leaves no `index_dir` behind.
	pub async fn create(index_dir: &Path, table_name: &str, chunks: &[Chunk], embeddings: &[Vec<f32>], embedder: Arc<dyn Embedder>) -> Result<Self> {
		let parent = match index_dir.parent() {
			Some(p) if !p.as_os_str().is_empty() => p,
			_ => Path::new("."),
		};
		std::fs::create_dir_all(parent).map_err(index_err)?;
		let staging = tempfile::Builder::new().prefix(".index-staging-").tempdir_in(parent).map_err(index_err)?;
		{
			let db = open_db(&staging.path().to_string_lossy()).await?;
			ChunkWriter::new(&db, table_name, embedder.dim()).write(chunks, embeddings).await?;
		}
		std::fs::rename(staging.path(), index_dir).map_err(index_err)?;
		// the staging path no longer exists; dropping `staging` is a no-op
		drop(staging);
		debug!(dir = %index_dir.display(), table = table_name, "index moved into place");

		let db = open_db(&index_dir.to_string_lossy()).await?;
		let table = db.open_table(table_name).execute().await.map_err(index_err)?;
		Ok(Self { table, embedder })
	}

	pub async fn len(&self) -> Result<usize> {
		self.table.count_rows(None).await.map_err(index_err)
	}

	pub async fn is_empty(&self) -> Result<bool> { Ok(self.len().await? == 0) }

	async fn search_vec(&self, query_vec: Vec<f32>, k: usize) -> Result<Vec<ScoredChunk>> {
		let batches: Vec<RecordBatch> = self.table
			.vector_search(query_vec).map_err(index_err)?
			.distance_type(DistanceType::Cosine)
			.limit(k)
			.execute().await.map_err(index_err)?
			.try_collect().await.map_err(index_err)?;
		let mut hits = Vec::new();
		for batch in &batches { hits.extend(read_hits(batch)?); }
		hits.truncate(k);
		Ok(hits)
	}
}

#[async_trait]
impl VectorIndex for LanceIndex {
	async fn similarity_search_with_score(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
		if k == 0 { return Ok(Vec::new()); }
		let query_vec = self.embedder.embed_query(query)?;
		let hits = self.search_vec(query_vec, k).await?;
		debug!(k, hits = hits.len(), "similarity search");
		Ok(hits)
	}
}

fn read_hits(batch: &RecordBatch) -> Result<Vec<ScoredChunk>> {
	let contents = string_column(batch, "content")?;
	let metadata = string_column(batch, "metadata")?;
	let distances = batch.column_by_name(DISTANCE_COLUMN)
		.and_then(|c| c.as_any().downcast_ref::<Float32Array>())
		.ok_or_else(|| Error::Index(format!("{DISTANCE_COLUMN} column missing")))?;
	let mut hits = Vec::with_capacity(batch.num_rows());
	for i in 0..batch.num_rows() {
		let meta: Metadata = serde_json::from_str(metadata.value(i)).map_err(index_err)?;
		// cosine distance in [0, 2]; similarity is 1 - distance
		let score = if distances.is_null(i) { 0.0 } else { 1.0 - distances.value(i) };
		hits.push(ScoredChunk { chunk: Chunk::new(contents.value(i), meta), score });
	}
	Ok(hits)
}

fn string_column<'b>(batch: &'b RecordBatch, name: &str) -> Result<&'b StringArray> {
	batch.column_by_name(name)
		.and_then(|c| c.as_any().downcast_ref::<StringArray>())
		.ok_or_else(|| Error::Index(format!("{name} column missing")))
}
