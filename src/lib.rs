//! Translation orchestrator for the Cuneiform Translation Project demo
//!
//! The demo page offers one interactive widget: type a cuneiform snippet and
//! get a translation. This crate holds the logic behind it:
//!
//! 1. **Lookup Table** - Known phrases answered locally, without a network call
//! 2. **Backends** - The remote prediction service, plus a mock for tests
//! 3. **Orchestrator** - One cycle per submission: thinking delay, lookup,
//!    remote fallback, settlement and a transient notification
//!
//! Rendering is left to the caller, which observes [`TranslatorView`].
//!
//! # Example
//!
//! ```ignore
//! use cuneiform_translator::{LookupTable, Orchestrator, OrchestratorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OrchestratorConfig::default();
//!     let orchestrator = Orchestrator::from_config(LookupTable::builtin(), &config)?;
//!
//!     orchestrator.submit("𒈗𒁺𒌑").await?;
//!     println!("{}", orchestrator.view().output_text); // "The king has arrived"
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod lookup;
pub mod notification;
pub mod orchestrator;

#[cfg(test)]
mod integration_tests;

pub use backend::{HttpBackend, MockBackend, MockMode, TranslationBackend};
pub use config::OrchestratorConfig;
pub use error::{ErrorKind, TranslateError, TranslateResult};
pub use lookup::{Direction, LookupEntry, LookupTable, is_cuneiform};
pub use notification::{Notification, NotificationSlot, TRANSLATION_COMPLETE, TRANSLATION_FAILED};
pub use orchestrator::{
    Orchestrator, OrchestratorEvent, OrchestratorState, TranslationRequest, TranslationResult,
    TranslatorView,
};
