use arrow_array::{FixedSizeListArray, RecordBatch, RecordBatchIterator, StringArray};
use indicatif::{ProgressBar, ProgressStyle};
use lancedb::Connection;
use std::sync::Arc;
use tracing::info;

use eora_core::{Chunk, Error, Result};
use crate::schema::build_arrow_schema;
use crate::table::{ensure_table, index_err, table_exists};

const BATCH_SIZE: usize = 1000;

/// Writes chunks and their embeddings into a Lance table, creating it on the
/// first batch.
pub struct ChunkWriter<'a> { db: &'a Connection, table_name: &'a str, dim: usize }

impl<'a> ChunkWriter<'a> {
	pub fn new(db: &'a Connection, table_name: &'a str, dim: usize) -> Self {
		Self { db, table_name, dim }
	}

	pub async fn write(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<usize> {
		if chunks.len() != embeddings.len() {
			return Err(Error::Index(format!("{} chunks but {} embeddings", chunks.len(), embeddings.len())));
		}
		if chunks.is_empty() {
			info!(table = self.table_name, "no chunks to index; creating empty table");
			ensure_table(self.db, self.table_name, build_arrow_schema(self.dim_i32()?)).await?;
			return Ok(0);
		}
		info!(table = self.table_name, chunks = chunks.len(), "indexing chunks");
		let pb = ProgressBar::new(chunks.len() as u64);
		pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%)").unwrap_or_else(|_| ProgressStyle::default_bar()).progress_chars("#>-"));
		let mut written = 0usize;
		for (batch_no, (chunk_batch, emb_batch)) in chunks.chunks(BATCH_SIZE).zip(embeddings.chunks(BATCH_SIZE)).enumerate() {
			let record_batch = self.to_record_batch(batch_no * BATCH_SIZE, chunk_batch, emb_batch)?;
			self.insert_batch(record_batch).await?;
			written += chunk_batch.len();
			pb.set_position(written as u64);
		}
		pb.finish_and_clear();
		info!(table = self.table_name, written, "indexing completed");
		Ok(written)
	}

	async fn insert_batch(&self, record_batch: RecordBatch) -> Result<()> {
		let schema = record_batch.schema();
		let reader = Box::new(RecordBatchIterator::new(vec![Ok(record_batch)].into_iter(), schema));
		if table_exists(self.db, self.table_name).await? {
			let table = self.db.open_table(self.table_name).execute().await.map_err(index_err)?;
			table.add(reader).execute().await.map_err(index_err)?;
		} else {
			self.db.create_table(self.table_name, reader).execute().await.map_err(index_err)?;
		}
		Ok(())
	}

	fn to_record_batch(&self, offset: usize, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<RecordBatch> {
		let dim = self.dim_i32()?;
		let mut ids = Vec::with_capacity(chunks.len());
		let mut sources = Vec::with_capacity(chunks.len());
		let mut headers: Vec<Option<String>> = Vec::with_capacity(chunks.len());
		let mut contents = Vec::with_capacity(chunks.len());
		let mut metadata = Vec::with_capacity(chunks.len());
		let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::with_capacity(chunks.len());
		for (i, (chunk, vector)) in chunks.iter().zip(embeddings).enumerate() {
			if vector.len() != self.dim {
				return Err(Error::Index(format!("embedding {} has dimension {}, expected {}", offset + i, vector.len(), self.dim)));
			}
			ids.push(format!("chunk:{}", offset + i));
			sources.push(chunk.source().unwrap_or_default().to_string());
			headers.push(chunk.header().map(str::to_string));
			contents.push(chunk.content.clone());
			metadata.push(serde_json::to_string(&chunk.metadata).map_err(index_err)?);
			vectors.push(Some(vector.iter().map(|&x| Some(x)).collect()));
		}
		RecordBatch::try_new(build_arrow_schema(dim), vec![
			Arc::new(StringArray::from(ids)),
			Arc::new(StringArray::from(sources)),
			Arc::new(StringArray::from(headers)),
			Arc::new(StringArray::from(contents)),
			Arc::new(StringArray::from(metadata)),
			Arc::new(FixedSizeListArray::from_iter_primitive::<arrow_array::types::Float32Type, _, _>(vectors.into_iter(), dim)),
		]).map_err(index_err)
	}

	fn dim_i32(&self) -> Result<i32> {
		i32::try_from(self.dim).map_err(|_| Error::Index(format!("embedding dimension {} too large", self.dim)))
	}
}
