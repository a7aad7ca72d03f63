//! Mock prediction backend for testing
//!
//! Deterministic and network-free. Every call is recorded so tests can
//! assert how many remote requests the orchestrator made, and with what.
//!
//! # Example
//!
//! ```ignore
//! use cuneiform_translator::backend::{MockBackend, MockMode, TranslationBackend};
//!
//! #[tokio::test]
//! async fn test_prediction() {
//!     let mock = MockBackend::new(MockMode::Echo);
//!     assert_eq!(mock.predict("ZZ").await.unwrap(), "[predicted] ZZ");
//!     assert_eq!(mock.calls(), vec!["ZZ"]);
//! }
//! ```

use crate::backend::TranslationBackend;
use crate::error::{TranslateError, TranslateResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock prediction modes for different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Prefix the input: "ZZ" → "[predicted] ZZ"
    Echo,

    /// Use predefined mappings, falling back to `Echo` for unknown input
    Mappings(HashMap<String, String>),

    /// Fail every call with the given error
    Error(TranslateError),

    /// Answer without a usable `predictions` field
    Malformed,
}

/// Mock backend that simulates the prediction service
#[derive(Debug, Clone)]
pub struct MockBackend {
    mode: MockMode,
    /// Simulated latency applied to every call
    delay: Duration,
    /// Extra latency for specific inputs, replacing `delay`
    delays: HashMap<String, Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            delay: Duration::ZERO,
            delays: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Mock with a simulated network delay on every call
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            ..Self::new(mode)
        }
    }

    /// Override the delay for one particular input
    pub fn delay_for(mut self, input: impl Into<String>, delay_ms: u64) -> Self {
        self.delays
            .insert(input.into(), Duration::from_millis(delay_ms));
        self
    }

    /// Payloads of every call made so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    fn record(&self, text: &str) {
        let mut calls = self
            .calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        calls.push(text.to_string());
    }

    fn apply_prediction(&self, text: &str) -> TranslateResult<String> {
        match &self.mode {
            MockMode::Echo => Ok(format!("[predicted] {}", text)),
            MockMode::Mappings(map) => Ok(map
                .get(text)
                .cloned()
                .unwrap_or_else(|| format!("[predicted] {}", text))),
            MockMode::Error(err) => Err(err.clone()),
            MockMode::Malformed => Err(TranslateError::ProtocolError(
                "Invalid response format: missing 'predictions' field".to_string(),
            )),
        }
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    async fn predict(&self, text: &str) -> TranslateResult<String> {
        self.record(text);

        let delay = self.delays.get(text).copied().unwrap_or(self.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.apply_prediction(text)
    }

    fn backend_name(&self) -> &str {
        "Mock backend"
    }
}
