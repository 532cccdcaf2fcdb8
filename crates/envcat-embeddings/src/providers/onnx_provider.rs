//! ONNX Runtime embedding provider.
//!
//! Loads a sentence-embedding model via the `ort` crate (v2) and mean-pools
//! the token outputs into one vector per text.

use std::path::Path;
use std::sync::Mutex;

use envcat_core::errors::{EmbeddingError, EnvcatResult};
use envcat_core::traits::IEmbeddingProvider;
use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;

use crate::normalize::l2_normalize;

/// ONNX-based embedding provider.
pub struct OnnxProvider {
    /// `run` needs `&mut Session`; the trait only gives `&self`.
    session: Mutex<Session>,
    dimensions: usize,
    model_name: String,
}

impl OnnxProvider {
    /// Load an ONNX model from `model_path`.
    ///
    /// # Errors
    /// Returns `EmbeddingError::ModelLoadFailed` if the model cannot be loaded.
    pub fn load(model_path: &str, model_name: &str, dimensions: usize) -> EnvcatResult<Self> {
        let load_failed = |reason: String| EmbeddingError::ModelLoadFailed {
            path: model_path.to_string(),
            reason,
        };
        if !Path::new(model_path).exists() {
            return Err(load_failed("model file not found".to_string()).into());
        }

        let session = Session::builder()
            .map_err(|e| load_failed(e.to_string()))?
            .with_intra_threads(2)
            .map_err(|e| load_failed(e.to_string()))?
            .commit_from_file(model_path)
            .map_err(|e| load_failed(e.to_string()))?;

        debug!(model = model_name, dims = dimensions, "ONNX model loaded");

        Ok(Self {
            session: Mutex::new(session),
            dimensions,
            model_name: model_name.to_string(),
        })
    }

    /// Run inference on a single text, returning the pooled embedding.
    fn infer(&self, text: &str) -> EnvcatResult<Vec<f32>> {
        let inference_failed = |reason: String| EmbeddingError::InferenceFailed { reason };

        let token_ids = Self::simple_tokenize(text);
        let seq_len = token_ids.len();
        let input_ids: Vec<i64> = token_ids.iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = vec![1i64; seq_len];

        let ids_tensor = Tensor::from_array((vec![1i64, seq_len as i64], input_ids))
            .map_err(|e| inference_failed(format!("tensor creation error: {e}")))?;
        let mask_tensor = Tensor::from_array((vec![1i64, seq_len as i64], attention_mask))
            .map_err(|e| inference_failed(format!("tensor creation error: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| inference_failed(format!("session lock poisoned: {e}")))?;

        let outputs = session
            .run(ort::inputs![ids_tensor, mask_tensor])
            .map_err(|e| inference_failed(e.to_string()))?;

        let (_name, output) = outputs
            .iter()
            .next()
            .ok_or_else(|| inference_failed("no output tensor".to_string()))?;

        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| inference_failed(format!("tensor extraction failed: {e}")))?;

        let mut pooled = match shape.len() {
            // [batch=1, seq, dims]
            3 => {
                let seq = shape[1] as usize;
                let dims = shape[2] as usize;
                let mut pooled = vec![0.0f32; dims];
                for s in 0..seq {
                    for (d, slot) in pooled.iter_mut().enumerate() {
                        *slot += data[s * dims + d];
                    }
                }
                for v in &mut pooled {
                    *v /= seq.max(1) as f32;
                }
                pooled
            }
            // [batch=1, dims], already pooled.
            2 => data[..shape[1] as usize].to_vec(),
            _ => {
                return Err(
                    inference_failed(format!("unexpected output shape: {shape:?}")).into(),
                )
            }
        };

        if pooled.len() != self.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: pooled.len(),
            }
            .into());
        }
        l2_normalize(&mut pooled);
        Ok(pooled)
    }

    /// Word-level tokenizer hashing into a 30k vocabulary, framed by
    /// [CLS]/[SEP].
    fn simple_tokenize(text: &str) -> Vec<u32> {
        let mut ids = vec![101u32];
        for word in text.split(|c: char| !c.is_alphanumeric()) {
            if word.is_empty() {
                continue;
            }
            let mut h: u32 = 0x811c9dc5;
            for b in word.to_lowercase().as_bytes() {
                h ^= *b as u32;
                h = h.wrapping_mul(0x01000193);
            }
            ids.push(1 + (h % 29999));
        }
        ids.push(102);
        ids
    }
}

impl IEmbeddingProvider for OnnxProvider {
    fn embed(&self, text: &str) -> EnvcatResult<Vec<f32>> {
        self.infer(text)
    }

    fn embed_batch(&self, texts: &[String]) -> EnvcatResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.infer(t)).collect()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_framed() {
        let ids = OnnxProvider::simple_tokenize("Soil carbon");
        assert_eq!(ids.first(), Some(&101));
        assert_eq!(ids.last(), Some(&102));
        assert_eq!(ids.len(), 4);
        assert_eq!(OnnxProvider::simple_tokenize(""), vec![101, 102]);
    }

    #[test]
    fn tokenization_ignores_case() {
        assert_eq!(
            OnnxProvider::simple_tokenize("SOIL"),
            OnnxProvider::simple_tokenize("soil")
        );
    }

    #[test]
    fn missing_model_file_fails() {
        let err = OnnxProvider::load("/no/such/model.onnx", "m", 384).err().unwrap();
        assert!(err.to_string().contains("model file not found"));
    }
}
