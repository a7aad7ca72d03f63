//! Translation request orchestrator
//!
//! Turns a submitted string into a displayed translation. Each submission
//! starts a cycle: an artificial "thinking" pause, a phrase-table lookup, and
//! on a miss one bounded call to the remote backend. The outcome is published
//! as a single [`TranslatorView`] through a `watch` channel, and applied
//! transitions are broadcast as [`OrchestratorEvent`]s.
//!
//! The most recent submission always wins. Every submit bumps a generation
//! counter inside the same view update that enters `Loading`; a cycle may
//! only settle while its generation is still current, so a slow, superseded
//! cycle can never overwrite the output of a newer one.
//!
//! # Example
//!
//! ```ignore
//! use cuneiform_translator::{LookupTable, Orchestrator, OrchestratorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OrchestratorConfig::from_env()?;
//!     let orchestrator = Orchestrator::from_config(LookupTable::builtin(), &config)?;
//!
//!     orchestrator.submit("𒂍𒃲").await?;
//!     let view = orchestrator.view();
//!     println!("{} ({:?})", view.output_text, view.notification.message());
//!     Ok(())
//! }
//! ```

use crate::backend::{HttpBackend, TranslationBackend};
use crate::config::OrchestratorConfig;
use crate::error::{ErrorKind, TranslateError, TranslateResult};
use crate::lookup::LookupTable;
use crate::notification::{NotificationSlot, TRANSLATION_COMPLETE, TRANSLATION_FAILED};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

const EVENT_CAPACITY: usize = 64;

/// How a cycle resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationResult {
    /// Found in the phrase table; no remote call was made
    Hit(String),
    /// Predicted by the remote backend
    RemoteSuccess(String),
    /// The remote call failed; the kind is kept for diagnostics
    RemoteFailure(ErrorKind),
}

impl TranslationResult {
    /// Text to display; empty on failure
    pub fn output_text(&self) -> &str {
        match self {
            TranslationResult::Hit(text) | TranslationResult::RemoteSuccess(text) => text,
            TranslationResult::RemoteFailure(_) => "",
        }
    }

    pub fn notification_message(&self) -> &'static str {
        if self.is_success() {
            TRANSLATION_COMPLETE
        } else {
            TRANSLATION_FAILED
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, TranslationResult::RemoteFailure(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OrchestratorState {
    #[default]
    Idle,
    Loading,
    Settled(TranslationResult),
}

/// One submission, alive for the duration of its cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub input_text: String,
    pub submitted_at: Instant,
    pub generation: u64,
}

/// Everything the UI needs to render the translator widget
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslatorView {
    /// Generation of the newest submission; 0 before the first one
    pub generation: u64,
    pub state: OrchestratorState,
    pub request: Option<TranslationRequest>,
    pub output_text: String,
    pub notification: NotificationSlot,
}

impl TranslatorView {
    pub fn is_loading(&self) -> bool {
        self.state == OrchestratorState::Loading
    }

    pub fn result(&self) -> Option<&TranslationResult> {
        match &self.state {
            OrchestratorState::Settled(result) => Some(result),
            _ => None,
        }
    }
}

/// Transitions that were applied to the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorEvent {
    Loading { generation: u64, input_text: String },
    Settled { generation: u64, result: TranslationResult },
    NotificationDismissed { id: u64 },
}

/// Coordinates translation cycles and publishes their state
///
/// Cheap to clone; clones share the same state and channels.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    table: Arc<LookupTable>,
    backend: Arc<dyn TranslationBackend>,
    thinking_delay: Duration,
    request_timeout: Duration,
    notification_duration: Duration,
    view: watch::Sender<TranslatorView>,
    events: broadcast::Sender<OrchestratorEvent>,
}

impl Orchestrator {
    pub fn new(
        table: Arc<LookupTable>,
        backend: Arc<dyn TranslationBackend>,
        config: &OrchestratorConfig,
    ) -> Self {
        let (view, _) = watch::channel(TranslatorView::default());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            inner: Arc::new(Inner {
                table,
                backend,
                thinking_delay: config.thinking_delay,
                request_timeout: config.request_timeout,
                notification_duration: config.notification_duration,
                view,
                events,
            }),
        }
    }

    /// Orchestrator backed by the HTTP endpoint named in `config`
    pub fn from_config(table: LookupTable, config: &OrchestratorConfig) -> TranslateResult<Self> {
        config.validate()?;
        let backend = HttpBackend::new(config.endpoint.clone(), config.request_timeout)?;
        Ok(Self::new(Arc::new(table), Arc::new(backend), config))
    }

    /// Start a new translation cycle for `input_text`
    ///
    /// Enters `Loading` immediately, clearing any previous output and
    /// notification, and supersedes any cycle still in flight. Empty input is
    /// not rejected. The returned handle completes once the cycle has
    /// settled or been discarded; awaiting it is optional.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, input_text: impl Into<String>) -> JoinHandle<()> {
        let input_text = input_text.into();
        let submitted_at = Instant::now();
        let mut generation = 0;

        self.inner.view.send_modify(|view| {
            view.generation += 1;
            generation = view.generation;
            view.state = OrchestratorState::Loading;
            view.request = Some(TranslationRequest {
                input_text: input_text.clone(),
                submitted_at,
                generation,
            });
            view.output_text.clear();
            view.notification.dismiss();
        });

        info!(generation, chars = input_text.chars().count(), "Translation submitted");
        self.inner.emit(OrchestratorEvent::Loading {
            generation,
            input_text: input_text.clone(),
        });

        let request = TranslationRequest {
            input_text,
            submitted_at,
            generation,
        };
        let inner = Arc::clone(&self.inner);
        tokio::spawn(inner.run_cycle(request))
    }

    /// Snapshot of the current view
    pub fn view(&self) -> TranslatorView {
        self.inner.view.borrow().clone()
    }

    /// Receiver that observes every view change
    pub fn subscribe(&self) -> watch::Receiver<TranslatorView> {
        self.inner.view.subscribe()
    }

    /// Receiver for applied lifecycle transitions
    pub fn events(&self) -> broadcast::Receiver<OrchestratorEvent> {
        self.inner.events.subscribe()
    }

    /// User dismissal of the notification; false if nothing was showing
    pub fn dismiss_notification(&self) -> bool {
        let mut dismissed = None;
        self.inner.view.send_if_modified(|view| {
            dismissed = view.notification.dismiss();
            dismissed.is_some()
        });
        match dismissed {
            Some(id) => {
                self.inner
                    .emit(OrchestratorEvent::NotificationDismissed { id });
                true
            }
            None => false,
        }
    }

    pub fn table(&self) -> &LookupTable {
        &self.inner.table
    }

    pub fn backend_name(&self) -> &str {
        self.inner.backend.backend_name()
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("backend", &self.inner.backend.backend_name())
            .field("table_len", &self.inner.table.len())
            .field("thinking_delay", &self.inner.thinking_delay)
            .field("request_timeout", &self.inner.request_timeout)
            .finish()
    }
}

impl Inner {
    fn emit(&self, event: OrchestratorEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    async fn run_cycle(self: Arc<Self>, request: TranslationRequest) {
        // Resolve on a separate task so a panic still settles the cycle.
        let resolver = Arc::clone(&self);
        let input_text = request.input_text.clone();
        let result = match tokio::spawn(async move { resolver.resolve(&input_text).await }).await {
            Ok(result) => result,
            Err(err) => {
                error!(generation = request.generation, error = %err, "Resolution task failed");
                TranslationResult::RemoteFailure(ErrorKind::Internal)
            }
        };

        self.settle(&request, result);
    }

    async fn resolve(&self, input_text: &str) -> TranslationResult {
        tokio::time::sleep(self.thinking_delay).await;

        if let Some(target) = self.table.lookup(input_text) {
            debug!("Phrase table hit");
            return TranslationResult::Hit(target.to_string());
        }

        debug!(backend = self.backend.backend_name(), "Phrase table miss, asking backend");
        match self.predict(input_text).await {
            Ok(prediction) => TranslationResult::RemoteSuccess(prediction),
            Err(err) => {
                warn!(kind = %err.kind(), error = %err, "Remote translation failed");
                TranslationResult::RemoteFailure(err.kind())
            }
        }
    }

    async fn predict(&self, input_text: &str) -> TranslateResult<String> {
        match tokio::time::timeout(self.request_timeout, self.backend.predict(input_text)).await {
            Ok(result) => result,
            Err(_) => Err(TranslateError::NetworkError(format!(
                "No response within {:?}",
                self.request_timeout
            ))),
        }
    }

    fn settle(self: &Arc<Self>, request: &TranslationRequest, result: TranslationResult) {
        let mut notification_id = None;
        let applied = self.view.send_if_modified(|view| {
            if view.generation != request.generation {
                return false;
            }
            view.output_text = result.output_text().to_string();
            notification_id = Some(view.notification.show(result.notification_message()));
            view.state = OrchestratorState::Settled(result.clone());
            true
        });

        if !applied {
            debug!(
                generation = request.generation,
                "Discarding result of superseded translation"
            );
            return;
        }

        info!(
            generation = request.generation,
            success = result.is_success(),
            elapsed_ms = request.submitted_at.elapsed().as_millis() as u64,
            "Translation settled"
        );
        self.emit(OrchestratorEvent::Settled {
            generation: request.generation,
            result,
        });

        if let Some(id) = notification_id {
            self.schedule_dismiss(id);
        }
    }

    fn schedule_dismiss(self: &Arc<Self>, id: u64) {
        let weak: Weak<Self> = Arc::downgrade(self);
        let duration = self.notification_duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if inner.view.send_if_modified(|view| view.notification.expire(id)) {
                debug!(id, "Notification expired");
                inner.emit(OrchestratorEvent::NotificationDismissed { id });
            }
        });
    }
}
