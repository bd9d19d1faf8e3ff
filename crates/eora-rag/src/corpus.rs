use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};

use eora_core::cache::{load_records, save_records};
use eora_core::chunker::Chunker;
use eora_core::config::CorpusSettings;
use eora_core::traits::{Embedder, PageExtractor};
use eora_core::{RawRecord, Result};
use eora_extract::{extract_links, into_records};
use eora_vector::LanceIndex;

/// Builds the persistent index on first start and reopens it afterwards.
pub struct CorpusBuilder {
    extractor: Arc<dyn PageExtractor>,
    embedder: Arc<dyn Embedder>,
    chunker: Chunker,
}

impl CorpusBuilder {
    pub fn new(extractor: Arc<dyn PageExtractor>, embedder: Arc<dyn Embedder>) -> Self {
        Self { extractor, embedder, chunker: Chunker::new() }
    }

    /// Returns a ready index for `settings.collection`.
    ///
    /// An existing index directory is trusted as-is. Otherwise records come
    /// from the JSON cache, or from extracting `links` (written to the cache
    /// before anything is embedded), and a fresh index is built from them.
    pub async fn initialize(&self, settings: &CorpusSettings, links: &[String]) -> Result<LanceIndex> {
        let index_dir = settings.index_dir();
        if index_dir.exists() {
            return LanceIndex::open(&index_dir, &settings.collection, self.embedder.clone())
                .await
                .inspect_err(|e| error!(dir = %index_dir.display(), error = %e, "failed to open index"));
        }

        let records = self.load_or_extract(&settings.cache_path(), links).await?;
        self.build(&index_dir, &settings.collection, &records).await
    }

    async fn load_or_extract(&self, cache_path: &Path, links: &[String]) -> Result<Vec<RawRecord>> {
        if cache_path.exists() {
            let records = load_records(cache_path)?;
            info!(path = %cache_path.display(), records = records.len(), "loaded record cache");
            return Ok(records);
        }
        info!(links = links.len(), "collecting documents");
        let records = into_records(extract_links(self.extractor.as_ref(), links).await);
        save_records(cache_path, &records)?;
        info!(path = %cache_path.display(), records = records.len(), "wrote record cache");
        Ok(records)
    }

    async fn build(&self, index_dir: &Path, collection: &str, records: &[RawRecord]) -> Result<LanceIndex> {
        let chunks = self.chunker.split_records(records);
        info!(records = records.len(), chunks = chunks.len(), "chunked corpus");
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .inspect_err(|e| error!(error = %e, "embedding corpus failed"))?;
        LanceIndex::create(index_dir, collection, &chunks, &embeddings, self.embedder.clone())
            .await
            .inspect_err(|e| error!(dir = %index_dir.display(), error = %e, "building index failed"))
    }
}
