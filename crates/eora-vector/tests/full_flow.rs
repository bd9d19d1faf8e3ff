use std::sync::Arc;

use eora_core::chunker::Chunker;
use eora_core::traits::{Embedder, VectorIndex};
use eora_core::types::RawRecord;
use eora_embed::HashingEmbedder;
use eora_vector::LanceIndex;
use tempfile::TempDir;

fn corpus() -> Vec<RawRecord> {
    vec![
        RawRecord::new(Some("### Проект: Lamoda\n- поиск похожей одежды по фото\n### Технологии\n- *PyTorch* трансформеры для изображений".to_string()), "https://eora.ru/cases/lamoda"),
        RawRecord::new(Some("### Проект: Додо\n- робот аналитик отзывов\n### Команда\n- аналитики".to_string()), "https://eora.ru/cases/dodo"),
        RawRecord::new(Some("### Проект: S7\n- навык для подбора авиабилетов".to_string()), "https://eora.ru/cases/s7"),
    ]
}

#[tokio::test]
async fn lancedb_full_flow() {
    let tmp = TempDir::new().expect("tmp");
    let index_dir = tmp.path().join("index");
    let embedder: Arc<dyn Embedder> = Arc::new(HashingEmbedder::new(256));

    let chunks = Chunker::new().split_records(&corpus());
    assert_eq!(chunks.len(), 5);
    let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let embeddings = embedder.embed_batch(&texts).expect("embed");

    let index = LanceIndex::create(&index_dir, "eora_test", &chunks, &embeddings, embedder.clone()).await.expect("create");
    assert_eq!(index.len().await.expect("len"), 5);

    let hits = index.similarity_search_with_score("трансформеры для изображений PyTorch", 3).await.expect("search");
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].chunk.source(), Some("https://eora.ru/cases/lamoda"));
    assert_eq!(hits[0].chunk.header(), Some("Технологии"));
    for pair in hits.windows(2) { assert!(pair[0].score >= pair[1].score, "descending scores"); }

    drop(index);
    let reopened = LanceIndex::open(&index_dir, "eora_test", embedder).await.expect("open");
    let hits = reopened.similarity_search_with_score("авиабилеты S7", 10).await.expect("search");
    assert_eq!(hits.len(), 5, "k larger than the table returns every row");
    assert_eq!(hits[0].chunk.source(), Some("https://eora.ru/cases/s7"));
}

#[tokio::test]
async fn empty_corpus_creates_openable_table() {
    let tmp = TempDir::new().expect("tmp");
    let index_dir = tmp.path().join("index");
    let embedder: Arc<dyn Embedder> = Arc::new(HashingEmbedder::new(64));

    let index = LanceIndex::create(&index_dir, "empty", &[], &[], embedder.clone()).await.expect("create");
    assert!(index.is_empty().await.expect("len"));

    let reopened = LanceIndex::open(&index_dir, "empty", embedder).await.expect("open");
    let hits = reopened.similarity_search_with_score("что угодно", 5).await.expect("search");
    assert!(hits.is_empty());
}

#[tokio::test]
async fn opening_missing_table_is_an_index_error() {
    let tmp = TempDir::new().expect("tmp");
    let embedder: Arc<dyn Embedder> = Arc::new(HashingEmbedder::new(64));
    let err = LanceIndex::open(tmp.path(), "absent", embedder).await.err().expect("error");
    assert!(matches!(err, eora_core::Error::Index(_)));
}

#[tokio::test]
async fn mismatched_embedding_count_is_rejected() {
    let tmp = TempDir::new().expect("tmp");
    let embedder: Arc<dyn Embedder> = Arc::new(HashingEmbedder::new(64));
    let chunks = Chunker::new().split_records(&corpus());
    let err = LanceIndex::create(&tmp.path().join("i"), "t", &chunks, &[], embedder).await.err().expect("error");
    assert!(matches!(err, eora_core::Error::Index(_)));
}

#[tokio::test]
async fn failed_write_leaves_no_index_directory() {
    let tmp = TempDir::new().expect("tmp");
    let index_dir = tmp.path().join("index");
    let embedder: Arc<dyn Embedder> = Arc::new(HashingEmbedder::new(8));
    let chunks = Chunker::new().split_records(&corpus());
    let short_vectors = vec![vec![0.5f32; 4]; chunks.len()];

    let err = LanceIndex::create(&index_dir, "t", &chunks, &short_vectors, embedder).await.err().expect("error");
    assert!(matches!(err, eora_core::Error::Index(_)));
    assert!(!index_dir.exists());
    let leftovers: Vec<_> = std::fs::read_dir(tmp.path()).expect("read_dir").collect();
    assert!(leftovers.is_empty(), "staging directory is cleaned up");
}
