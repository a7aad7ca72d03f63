//! Remote translation backends
//!
//! `TranslationBackend` abstracts the model endpoint the orchestrator falls
//! back to when the phrase table has no entry. `HttpBackend` talks to the
//! real prediction service; `MockBackend` answers deterministically without
//! network access.
//!
//! # Example
//!
//! ```ignore
//! use cuneiform_translator::backend::{HttpBackend, TranslationBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = HttpBackend::new("http://127.0.0.1:8000/project/bulk-predict", Duration::from_secs(20))?;
//!     let prediction = backend.predict("𒈗𒆠𒂗𒁺").await?;
//!     println!("{}", prediction);
//!     Ok(())
//! }
//! ```

pub mod http;
pub mod mock;

pub use http::HttpBackend;
pub use mock::{MockBackend, MockMode};

use crate::error::TranslateResult;
use async_trait::async_trait;

/// A service that turns source text into a predicted translation
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Request a prediction for `text`
    ///
    /// Exactly one request is made per call; implementations never retry.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The predicted translation
    /// * `Err(TranslateError)` - Network, upstream or protocol failure
    async fn predict(&self, text: &str) -> TranslateResult<String>;

    /// Name used in logs to identify the backend
    fn backend_name(&self) -> &str;
}
