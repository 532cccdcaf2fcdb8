//! OpenAI-compatible `/embeddings` HTTP provider with retry and exponential
//! backoff.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use envcat_core::config::EmbeddingConfig;
use envcat_core::errors::{ConfigError, EmbeddingError, EnvcatResult};
use envcat_core::traits::IEmbeddingProvider;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Cloud API embedding provider.
pub struct ApiProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    model_name: String,
    dimensions: usize,
    max_retries: u32,
    available: AtomicBool,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

impl ApiProvider {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model_name: impl Into<String>,
        dimensions: usize,
    ) -> EnvcatResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("HTTP client construction failed: {e}"),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model_name: model_name.into(),
            dimensions,
            max_retries: 3,
            available: AtomicBool::new(true),
        })
    }

    /// Build from config. The key is read from the environment variable
    /// named by `api_key_env`.
    pub fn from_config(config: &EmbeddingConfig) -> EnvcatResult<Self> {
        let endpoint = config.api_endpoint.clone().ok_or_else(|| ConfigError::Invalid {
            field: "embedding.api_endpoint".to_string(),
            reason: "required for the api provider".to_string(),
        })?;
        let api_key = std::env::var(&config.api_key_env).map_err(|_| ConfigError::Invalid {
            field: "embedding.api_key_env".to_string(),
            reason: format!("environment variable {} is not set", config.api_key_env),
        })?;
        Self::new(endpoint, api_key, config.model_name.clone(), config.dimensions)
    }

    /// Send an embedding request with retry and exponential backoff.
    fn request_embeddings(&self, texts: &[String]) -> EnvcatResult<Vec<Vec<f32>>> {
        if !self.available.load(Ordering::Relaxed) {
            return Err(EmbeddingError::ProviderUnavailable {
                provider: self.model_name.clone(),
            }
            .into());
        }

        let mut last_reason = String::from("no attempt made");
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                std::thread::sleep(delay);
                debug!(attempt, "retrying API embedding request");
            }

            match self.send_request(texts) {
                Ok(embeddings) => return self.check_response(texts.len(), embeddings),
                Err(reason) => {
                    warn!(attempt, error = %reason, "API embedding request failed");
                    last_reason = reason;
                }
            }
        }

        self.available.store(false, Ordering::Relaxed);
        Err(EmbeddingError::InferenceFailed {
            reason: format!("all retries exhausted: {last_reason}"),
        }
        .into())
    }

    fn send_request(&self, texts: &[String]) -> Result<Vec<EmbedData>, String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&EmbedRequest {
                model: &self.model_name,
                input: texts,
            })
            .send()
            .map_err(|e| format!("HTTP error: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(format!("API returned {status}: {body}"));
        }
        response
            .json::<EmbedResponse>()
            .map(|r| r.data)
            .map_err(|e| format!("JSON parse error: {e}"))
    }

    /// Restore input order and enforce count and dimensions. A wrong-sized
    /// vector is never padded or truncated.
    fn check_response(&self, expected: usize, mut data: Vec<EmbedData>) -> EnvcatResult<Vec<Vec<f32>>> {
        if data.len() != expected {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("requested {expected} embeddings, received {}", data.len()),
            }
            .into());
        }
        if data.iter().all(|d| d.index.is_some()) {
            data.sort_by_key(|d| d.index);
        }
        data.into_iter()
            .map(|d| {
                if d.embedding.len() == self.dimensions {
                    Ok(d.embedding)
                } else {
                    Err(EmbeddingError::DimensionMismatch {
                        expected: self.dimensions,
                        actual: d.embedding.len(),
                    }
                    .into())
                }
            })
            .collect()
    }

    /// Reset availability (e.g., after an operator fixes the endpoint).
    pub fn reset_availability(&self) {
        self.available.store(true, Ordering::Relaxed);
    }
}

impl IEmbeddingProvider for ApiProvider {
    fn embed(&self, text: &str) -> EnvcatResult<Vec<f32>> {
        let results = self.request_embeddings(&[text.to_string()])?;
        results.into_iter().next().ok_or_else(|| {
            EmbeddingError::InferenceFailed {
                reason: "empty response".to_string(),
            }
            .into()
        })
    }

    fn embed_batch(&self, texts: &[String]) -> EnvcatResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request_embeddings(texts)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(dims: usize) -> ApiProvider {
        ApiProvider::new("http://127.0.0.1:9/v1/embeddings", "k", "text-embedding-3-small", dims)
            .unwrap()
    }

    #[test]
    fn missing_endpoint_is_a_config_error() {
        let config = EmbeddingConfig {
            provider: "api".into(),
            ..Default::default()
        };
        let err = ApiProvider::from_config(&config).err().unwrap();
        assert!(err.to_string().contains("embedding.api_endpoint"));
    }

    #[test]
    fn response_is_reordered_by_index() {
        let p = provider(2);
        let data = vec![
            EmbedData { index: Some(1), embedding: vec![0.0, 1.0] },
            EmbedData { index: Some(0), embedding: vec![1.0, 0.0] },
        ];
        let out = p.check_response(2, data).unwrap();
        assert_eq!(out, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn wrong_dimensions_are_rejected() {
        let p = provider(3);
        let data = vec![EmbedData { index: None, embedding: vec![1.0, 0.0] }];
        assert!(p.check_response(1, data).is_err());
    }

    #[test]
    fn unreachable_endpoint_marks_provider_unavailable() {
        let mut p = provider(2);
        p.max_retries = 0;
        assert!(p.embed("soil").is_err());
        assert!(!p.is_available());
        p.reset_availability();
        assert!(p.is_available());
    }
}
