//! HTTP client for the prediction endpoint
//!
//! The endpoint accepts `POST {"text": "..."}` and answers
//! `{"predictions": "..."}`. Anything else is a failure.

use crate::backend::TranslationBackend;
use crate::error::{TranslateError, TranslateResult};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    predictions: Option<serde_json::Value>,
}

/// Backend that posts to a remote prediction service
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpBackend {
    /// Create a backend for `endpoint` with a per-request timeout
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New backend instance
    /// * `Err(TranslateError)` - If the endpoint is empty or the HTTP client cannot be built
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> TranslateResult<Self> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(TranslateError::ConfigurationError(
                "Translation endpoint cannot be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                TranslateError::ConfigurationError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Pull the prediction out of a decoded body
    ///
    /// `predictions` must be a non-empty string; an empty one counts as missing.
    fn extract_prediction(body: PredictResponse) -> TranslateResult<String> {
        match body.predictions {
            Some(serde_json::Value::String(text)) if !text.is_empty() => Ok(text),
            Some(serde_json::Value::String(_)) => Err(TranslateError::ProtocolError(
                "Invalid response format: 'predictions' is empty".to_string(),
            )),
            Some(other) => Err(TranslateError::ProtocolError(format!(
                "Invalid response format: 'predictions' is not a string: {}",
                other
            ))),
            None => Err(TranslateError::ProtocolError(
                "Invalid response format: missing 'predictions' field".to_string(),
            )),
        }
    }
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl TranslationBackend for HttpBackend {
    async fn predict(&self, text: &str) -> TranslateResult<String> {
        debug!(endpoint = %self.endpoint, chars = text.chars().count(), "Posting prediction request");

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&PredictRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranslateError::UpstreamError {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let body: PredictResponse = serde_json::from_slice(&bytes).map_err(|e| {
            TranslateError::ProtocolError(format!("Failed to parse response: {}", e))
        })?;

        Self::extract_prediction(body)
    }

    fn backend_name(&self) -> &str {
        "HTTP prediction service"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> TranslateResult<String> {
        let body: PredictResponse = serde_json::from_value(value).unwrap();
        HttpBackend::extract_prediction(body)
    }

    #[test]
    fn test_new_with_empty_endpoint() {
        let result = HttpBackend::new("  ", Duration::from_secs(1));
        match result {
            Err(TranslateError::ConfigurationError(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected ConfigurationError"),
        }
    }

    #[test]
    fn test_new_with_valid_endpoint() {
        let backend = HttpBackend::new("http://127.0.0.1:8000/predict", Duration::from_secs(1))
            .unwrap();
        assert_eq!(backend.endpoint(), "http://127.0.0.1:8000/predict");
        assert_eq!(backend.backend_name(), "HTTP prediction service");
    }

    #[test]
    fn test_extract_prediction_success() {
        assert_eq!(parse(json!({"predictions": "world"})).unwrap(), "world");
    }

    #[test]
    fn test_extract_prediction_ignores_extra_fields() {
        let result = parse(json!({"predictions": "world", "model": "t5"}));
        assert_eq!(result.unwrap(), "world");
    }

    #[test]
    fn test_extract_prediction_missing_field() {
        match parse(json!({})) {
            Err(TranslateError::ProtocolError(msg)) => assert!(msg.contains("missing")),
            _ => panic!("Expected ProtocolError"),
        }
    }

    #[test]
    fn test_extract_prediction_null_field() {
        assert!(matches!(
            parse(json!({"predictions": null})),
            Err(TranslateError::ProtocolError(_))
        ));
    }

    #[test]
    fn test_extract_prediction_empty_string() {
        assert!(matches!(
            parse(json!({"predictions": ""})),
            Err(TranslateError::ProtocolError(_))
        ));
    }

    #[test]
    fn test_extract_prediction_wrong_type() {
        assert!(matches!(
            parse(json!({"predictions": ["a", "b"]})),
            Err(TranslateError::ProtocolError(_))
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(PredictRequest { text: "ZZ" }).unwrap();
        assert_eq!(body, json!({"text": "ZZ"}));
    }

    #[test]
    fn test_debug_output() {
        let backend = HttpBackend::new("http://localhost:1/x", Duration::from_secs(3)).unwrap();
        let debug_str = format!("{:?}", backend);
        assert!(debug_str.contains("http://localhost:1/x"));
        assert!(debug_str.contains("3s"));
    }
}
