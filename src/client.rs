//! HTTP client for the inference API

use crate::{
    error::{AppError, Result},
    models::{Config, ImageRecord},
};
use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client, StatusCode};
use std::time::{Duration, Instant};

/// Result of one successful inference call
#[derive(Debug, Clone)]
pub struct InferenceOutcome {
    /// Number of predictions the server returned
    pub predictions: usize,
    /// Response body size in bytes
    pub body_size: usize,
    /// Elapsed time for this call
    pub latency: Duration,
}

/// Inference API abstraction
///
/// The runner and warmup stage only talk to this trait, which keeps them
/// testable against fake servers without any HTTP in the loop.
#[async_trait]
pub trait InferenceApi: Send + Sync {
    /// Run inference on one image and report the outcome
    async fn infer(&self, image: &ImageRecord) -> Result<InferenceOutcome>;

    /// Ask the server to preload the model (explicit warmup endpoint)
    async fn start_model(&self) -> Result<Duration>;
}

/// reqwest-backed inference client
pub struct HttpInferenceClient {
    http: Client,
    inference_url: String,
    warmup_url: String,
    api_key: String,
}

impl HttpInferenceClient {
    /// Create a client for the configured server and model
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::http_setup(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            inference_url: config.inference_url(),
            warmup_url: config.warmup_url(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl InferenceApi for HttpInferenceClient {
    async fn infer(&self, image: &ImageRecord) -> Result<InferenceOutcome> {
        let start = Instant::now();

        let response = self
            .http
            .post(&self.inference_url)
            .query(&[("api_key", self.api_key.as_str())])
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(image.payload.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(status, response).await);
        }

        let body = response.bytes().await?;
        let body_size = body.len();
        let parsed: serde_json::Value = serde_json::from_slice(&body)?;
        let predictions = count_predictions(&parsed);

        Ok(InferenceOutcome {
            predictions,
            body_size,
            latency: start.elapsed(),
        })
    }

    async fn start_model(&self) -> Result<Duration> {
        let start = Instant::now();

        let response = self
            .http
            .get(&self.warmup_url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(status, response).await);
        }

        // Body content is irrelevant; the response itself signals readiness
        response.bytes().await?;

        Ok(start.elapsed())
    }
}

/// Build a response-level error carrying status, body and headers
async fn error_from_response(status: StatusCode, response: reqwest::Response) -> AppError {
    let headers = format_headers(response.headers());
    let body = response.text().await.unwrap_or_default();
    AppError::http_response(status.as_u16(), body, headers)
}

fn format_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value.to_str().unwrap_or("<binary>")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Count predictions in an inference response body.
///
/// Hosted servers return `{"predictions": [...], ...}`; some self-hosted
/// builds return a bare array. Anything else counts as zero.
fn count_predictions(body: &serde_json::Value) -> usize {
    match body {
        serde_json::Value::Array(items) => items.len(),
        serde_json::Value::Object(map) => map
            .get("predictions")
            .and_then(|p| p.as_array())
            .map(|p| p.len())
            .unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_count_predictions_object_form() {
        let body = json!({
            "predictions": [
                {"class": "hand", "confidence": 0.92},
                {"class": "hand", "confidence": 0.81}
            ],
            "time": 0.043
        });
        assert_eq!(count_predictions(&body), 2);
    }

    #[test]
    fn test_count_predictions_array_form() {
        let body = json!([{"class": "hand"}, {"class": "hand"}, {"class": "hand"}]);
        assert_eq!(count_predictions(&body), 3);
    }

    #[test]
    fn test_count_predictions_unexpected_shapes() {
        assert_eq!(count_predictions(&json!({"time": 0.01})), 0);
        assert_eq!(count_predictions(&json!("ok")), 0);
        assert_eq!(count_predictions(&json!(null)), 0);
    }

    #[test]
    fn test_format_headers_joins_pairs() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        headers.insert("x-request-id", "abc123".parse().unwrap());
        let formatted = format_headers(&headers);
        assert!(formatted.contains("content-type: application/json"));
        assert!(formatted.contains("x-request-id: abc123"));
    }
}
