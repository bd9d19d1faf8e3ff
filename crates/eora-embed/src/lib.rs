//! Embedding backends for the corpus index.
//!
//! `EmbeddingModel` runs an XLM-RoBERTa encoder (BGE-M3 family) locally with
//! candle. `HashingEmbedder` is a deterministic bag-of-words stand-in used by
//! tests and offline runs (`embedding.fake = true` or
//! `APP_USE_FAKE_EMBEDDINGS=1`).

use anyhow::{Result as AnyResult, anyhow};
use std::collections::HashMap;
use std::hash::Hasher;
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{Config as XLMRobertaConfig, XLMRobertaModel};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};
use twox_hash::XxHash64;

use eora_core::config::{expand_path, EmbeddingSettings};
use eora_core::traits::Embedder;
use eora_core::{Error, Result};

pub mod device;
pub mod pool;
pub mod tokenize;

pub use pool::masked_mean_l2;
pub use tokenize::tokenize_on_device;

const DEFAULT_PAD_ID: u32 = 1;

pub struct EmbeddingModel { model: XLMRobertaModel, tokenizer: Tokenizer, device: Device, dim: usize, max_len: usize, pad_id: u32 }

impl EmbeddingModel {
    pub fn load(model_dir: &Path, max_len: usize) -> AnyResult<Self> {
        let device = device::select_device();
        info!(dir = %model_dir.display(), "loading embedding model");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let pad_id = tokenizer.token_to_id("<pad>").unwrap_or(DEFAULT_PAD_ID);
        let config_path = model_dir.join("config.json");
        let config: XLMRobertaConfig = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;
        let weights = load_weights(model_dir, &device)?;
        let vb = VarBuilder::from_tensors(weights, DType::F32, &device);
        let model = XLMRobertaModel::new(&config, vb)?;
        info!(dim = config.hidden_size, max_len, "embedding model loaded");
        Ok(Self { model, tokenizer, device, dim: config.hidden_size, max_len, pad_id })
    }

    pub fn embed_text(&self, text: &str) -> AnyResult<Vec<f32>> {
        let start = Instant::now();
        let (input_ids, attention_mask) = tokenize_on_device(&self.tokenizer, text, self.max_len, self.pad_id, &self.device)?;
        let token_type_ids = Tensor::zeros((1, self.max_len), DType::I64, &self.device)?;
        let hidden = self.model.forward(&input_ids, &attention_mask, &token_type_ids, None, None, None)?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let emb: Vec<f32> = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1()?;
        if emb.len() != self.dim { return Err(anyhow!("expected embedding dimension {}, got {}", self.dim, emb.len())); }
        let elapsed = start.elapsed();
        if elapsed.as_millis() > 100 { debug!(?elapsed, chars = text.len(), "slow embedding"); }
        Ok(emb)
    }
}

impl Embedder for EmbeddingModel {
    fn dim(&self) -> usize { self.dim }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter()
            .map(|t| self.embed_text(t).map_err(|e| Error::Embedding(format!("{e:#}"))))
            .collect()
    }
}

/// Deterministic hashed bag-of-words embedder.
///
/// Lowercased alphanumeric tokens are hashed into `dim` buckets and the
/// resulting count vector is L2-normalized, so cosine similarity tracks word
/// overlap.
pub struct HashingEmbedder { dim: usize }

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim: dim.max(1) } }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for token in text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let mut hasher = XxHash64::with_seed(0);
            hasher.write(token.to_lowercase().as_bytes());
            let idx = (hasher.finish() % self.dim as u64) as usize;
            v[idx] += 1.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 { for x in &mut v { *x /= norm; } }
        v
    }
}

impl Embedder for HashingEmbedder {
    fn dim(&self) -> usize { self.dim }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

/// Builds the embedder described by `settings`.
pub fn load_embedder(settings: &EmbeddingSettings) -> Result<Box<dyn Embedder>> {
    let force_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false);
    if settings.fake || force_fake {
        warn!(dim = settings.fake_dim, "using hashing embedder; retrieval quality is word-overlap only");
        return Ok(Box::new(HashingEmbedder::new(settings.fake_dim)));
    }
    let dir = resolve_model_dir(settings.model_dir.as_deref()).map_err(|e| Error::Embedding(format!("{e:#}")))?;
    let model = EmbeddingModel::load(&dir, settings.max_len).map_err(|e| Error::Embedding(format!("{e:#}")))?;
    Ok(Box::new(model))
}

fn load_weights(model_dir: &Path, device: &Device) -> AnyResult<HashMap<String, Tensor>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        debug!(path = %safetensors.display(), "reading safetensors weights");
        return Ok(candle_core::safetensors::load(&safetensors, device)?);
    }
    let pickle = model_dir.join("pytorch_model.bin");
    debug!(path = %pickle.display(), "reading pytorch weights");
    let weights = candle_core::pickle::read_all(&pickle)?;
    Ok(weights.into_iter().collect())
}

fn resolve_model_dir(configured: Option<&str>) -> AnyResult<PathBuf> {
    let candidates = configured.map(expand_path).into_iter()
        .chain(std::env::var("APP_MODEL_DIR").ok().map(PathBuf::from))
        .chain(std::env::var("MODEL_DIR").ok().map(PathBuf::from))
        .chain([PathBuf::from("models/bge-m3"), PathBuf::from("../models/bge-m3")]);
    for dir in candidates {
        if dir.exists() { return Ok(dir); }
    }
    Err(anyhow!("Could not locate embedding model directory. Checked embedding.model_dir, APP_MODEL_DIR, MODEL_DIR, models/bge-m3 and ../models/bge-m3"))
}
