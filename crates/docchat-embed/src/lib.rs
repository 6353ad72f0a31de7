//! Local text embeddings.
//!
//! Runs a BGE-M3 (XLM-RoBERTa) encoder through candle with masked-mean + L2
//! pooling. `APP_USE_FAKE_EMBEDDINGS=1` swaps in a deterministic hash-based
//! embedder so tests and model-free machines never touch the real weights.

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::PathBuf;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{Config as XLMRobertaConfig, XLMRobertaModel};
use tokenizers::Tokenizer;

pub mod device;
pub mod pool;
pub mod tokenize;

pub use pool::masked_mean_l2;

use docchat_core::config::{expand_path, EmbeddingConfig};
use docchat_core::traits::Embedder;

pub struct EmbeddingModel {
    model: XLMRobertaModel,
    tokenizer: Tokenizer,
    device: Device,
    dim: usize,
    max_len: usize,
}

impl EmbeddingModel {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let device = device::select_device();
        let model_dir = resolve_model_dir(&config.model_dir)?;
        tracing::info!("Loading embedding model from {}", model_dir.display());

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;

        let config_path = model_dir.join("config.json");
        let model_config: XLMRobertaConfig =
            serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;

        let weights_path = model_dir.join("pytorch_model.bin");
        let weights = candle_core::pickle::read_all(&weights_path)?;
        let weights_map: HashMap<String, Tensor> = weights.into_iter().collect();
        let vb = VarBuilder::from_tensors(weights_map, DType::F32, &device);
        let model = XLMRobertaModel::new(&model_config, vb)?;
        tracing::info!("Embedding model loaded");

        Ok(Self { model, tokenizer, device, dim: config.dim, max_len: config.max_len })
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let (input_ids, attention_mask) =
            tokenize::tokenize_on_device(&self.tokenizer, text, self.max_len, &self.device)?;
        let token_type_ids = Tensor::zeros((1, self.max_len), DType::I64, &self.device)?;
        let hidden_states = self.model.forward(
            &input_ids,
            &attention_mask,
            &token_type_ids,
            None,
            None,
            None,
        )?;
        let pooled = masked_mean_l2(&hidden_states, &attention_mask)?;
        let emb: Vec<f32> = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1()?;
        if emb.len() != self.dim {
            return Err(anyhow!(
                "Embedding dim mismatch: model produced {}, configured {}",
                emb.len(),
                self.dim
            ));
        }
        Ok(emb)
    }
}

impl Embedder for EmbeddingModel {
    fn dim(&self) -> usize {
        self.dim
    }
    fn max_len(&self) -> usize {
        self.max_len
    }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_one(t)).collect()
    }
}

/// Deterministic hash-based embedding of the configured dimension.
/// L2-normalized like the real model's output.
pub struct FakeEmbedder {
    dim: usize,
    max_len: usize,
}

impl FakeEmbedder {
    pub fn new(dim: usize, max_len: usize) -> Self {
        Self { dim, max_len }
    }
}

impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }
    fn max_len(&self) -> usize {
        self.max_len
    }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| Ok(fake_embed(t, self.dim))).collect()
    }
}

fn fake_embed(text: &str, dim: usize) -> Vec<f32> {
    use std::hash::{Hash, Hasher};
    use twox_hash::XxHash64;
    let mut v = vec![0f32; dim];
    for (i, token) in text.split_whitespace().enumerate() {
        let mut hasher = XxHash64::with_seed(0);
        token.hash(&mut hasher);
        let h = hasher.finish();
        let idx = (h as usize) % dim;
        let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
        v[idx] += val + (i as f32 % 3.0) * 0.01;
    }
    let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
    for x in &mut v {
        *x /= norm;
    }
    v
}

/// The embedder the rest of the system uses: fake when
/// `APP_USE_FAKE_EMBEDDINGS` is set, the real model otherwise.
pub fn default_embedder(config: &EmbeddingConfig) -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        tracing::info!("Using FakeEmbedder (APP_USE_FAKE_EMBEDDINGS set)");
        return Ok(Box::new(FakeEmbedder::new(config.dim, config.max_len)));
    }
    Ok(Box::new(EmbeddingModel::new(config)?))
}

fn resolve_model_dir(configured: &str) -> Result<PathBuf> {
    let dir = expand_path(configured);
    if dir.exists() {
        return Ok(dir);
    }
    Err(anyhow!(
        "Could not locate embedding model directory: {}",
        dir.display()
    ))
}
