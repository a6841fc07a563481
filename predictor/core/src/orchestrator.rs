//! Request Orchestrator
//!
//! Owns the prediction mode and the request lifecycle, and talks to the
//! prediction service.
//!
//! # State Machine
//!
//! ```text
//!            submit                success
//!   Idle ─────────────▶ Loading ─────────────▶ Succeeded
//!     ▲                   │  ▲                    │
//!     │                   │  └──── submit ────────┤
//!     │                   │ failure               │
//!     │                   ▼                       │
//!     │                 Failed ◀──────────────────┘ (via Loading)
//!     │
//!     └──── mode change / abandon (from any state)
//! ```
//!
//! # Superseded Requests
//!
//! Every submission gets a fresh [`RequestId`]. The network call runs as a
//! spawned task that reports back through a channel; when the orchestrator
//! applies a completion it compares ids, and anything that is not the active
//! request is dropped. Response arrival order never matters.
//!
//! Completions are applied by [`RequestOrchestrator::poll_completions`]
//! (non-blocking, call once per frame) or
//! [`RequestOrchestrator::wait_for_completion`].
//!
//! Submitting spawns onto the current tokio runtime and must be called from
//! within one.

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::mpsc;

use crate::backend::PredictionService;
use crate::error::{PredictionError, MISSING_DATE_MESSAGE};
use crate::mode::PredictionMode;
use crate::parameters::ParameterSet;
use crate::state::{PredictionResult, RequestId, RequestState};

/// A finished network call, tagged with the request it belongs to
#[derive(Debug)]
struct Completion {
    id: RequestId,
    outcome: Result<PredictionResult, PredictionError>,
}

/// What happened to a completion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The response belonged to the active request and updated the state
    Applied(RequestId),
    /// The response arrived after a newer submission, mode change or abandon
    Superseded(RequestId),
}

/// Drives one logical request at a time
pub struct RequestOrchestrator<S: PredictionService> {
    /// Prediction service
    service: Arc<S>,
    /// Active prediction mode
    mode: PredictionMode,
    /// Current lifecycle state
    state: RequestState,
    /// Last issued sequence number
    last_seq: u64,
    /// Request whose response may still change the state
    active: Option<RequestId>,
    /// Spawned calls that have not reported back yet
    outstanding: usize,
    /// Completion channel (sender cloned into each spawned call)
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
}

impl<S: PredictionService + 'static> RequestOrchestrator<S> {
    /// Create an orchestrator in date mode
    pub fn new(service: S) -> Self {
        Self::with_mode(service, PredictionMode::default())
    }

    /// Create an orchestrator in the given mode
    pub fn with_mode(service: S, mode: PredictionMode) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            service: Arc::new(service),
            mode,
            state: RequestState::Idle,
            last_seq: 0,
            active: None,
            outstanding: 0,
            completion_tx,
            completion_rx,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Active prediction mode
    pub fn mode(&self) -> PredictionMode {
        self.mode
    }

    /// Request whose response is still awaited
    pub fn active_request(&self) -> Option<RequestId> {
        self.active
    }

    /// Spawned calls not yet reported back, including superseded ones
    pub fn in_flight(&self) -> usize {
        self.outstanding
    }

    /// Prediction service
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Switch mode
    ///
    /// A real change discards any result or error, abandons the in-flight
    /// request and returns `true`. Re-selecting the current mode does nothing.
    pub fn set_mode(&mut self, mode: PredictionMode) -> bool {
        if self.mode == mode {
            return false;
        }
        tracing::debug!(from = %self.mode, to = %mode, "Prediction mode changed");
        self.mode = mode;
        self.reset();
        true
    }

    /// Stop applying effects of the in-flight request (e.g. navigating away)
    ///
    /// The network call itself keeps running; its response is dropped.
    pub fn abandon(&mut self) {
        tracing::debug!(active = ?self.active, "Abandoning request");
        self.reset();
    }

    fn reset(&mut self) {
        self.active = None;
        self.state = RequestState::Idle;
    }

    /// Whether a surface should enable its submit control
    ///
    /// Date mode needs a date; nothing is enabled while loading.
    pub fn can_submit(&self, date: Option<NaiveDate>) -> bool {
        if self.state.is_loading() {
            return false;
        }
        match self.mode {
            PredictionMode::Date => date.is_some(),
            PredictionMode::Parameters => true,
        }
    }

    /// Request a weather classification for `date`
    ///
    /// Switches to date mode if needed. A missing date fails validation:
    /// the state becomes `Failed` and no request is sent. Otherwise the state
    /// becomes `Loading` and the id of the new request is returned.
    pub fn submit_date_request(&mut self, date: Option<NaiveDate>) -> Option<RequestId> {
        self.set_mode(PredictionMode::Date);

        let Some(date) = date else {
            let err = PredictionError::Validation(MISSING_DATE_MESSAGE.to_string());
            tracing::warn!(error = %err, "Date request rejected");
            self.active = None;
            self.state = RequestState::Failed(err.user_message());
            return None;
        };

        let id = self.begin();
        tracing::info!(request = %id, %date, service = self.service.name(), "Submitting date prediction");
        self.spawn(id, move |service| async move { service.predict_by_date(date).await });
        Some(id)
    }

    /// Request an air quality classification for `params`
    ///
    /// Switches to parameter mode if needed. `params` is expected to come
    /// from a `ParameterInputModel`, which keeps every reading in bounds.
    pub fn submit_parameter_request(&mut self, params: ParameterSet) -> RequestId {
        self.set_mode(PredictionMode::Parameters);
        debug_assert!(params.is_within_bounds(), "parameters escaped their domain");

        let id = self.begin();
        tracing::info!(request = %id, ?params, service = self.service.name(), "Submitting parameter prediction");
        self.spawn(id, move |service| async move {
            service.predict_by_parameters(&params).await
        });
        id
    }

    /// Issue a new id, supersede the previous one, enter `Loading`
    fn begin(&mut self) -> RequestId {
        self.last_seq += 1;
        let id = RequestId::new(self.last_seq);
        if let Some(previous) = self.active.replace(id) {
            tracing::debug!(superseded = %previous, by = %id, "Request superseded");
        }
        self.state = RequestState::Loading;
        id
    }

    fn spawn<F, Fut>(&mut self, id: RequestId, call: F)
    where
        F: FnOnce(Arc<S>) -> Fut,
        Fut: Future<Output = Result<PredictionResult, PredictionError>> + Send + 'static,
    {
        let fut = call(Arc::clone(&self.service));
        let tx = self.completion_tx.clone();
        self.outstanding += 1;

        tokio::spawn(async move {
            // A panicking call still has to settle its request
            let outcome = match tokio::spawn(fut).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(%id, error = %e, "Prediction task failed");
                    Err(PredictionError::Transport(format!("prediction task failed: {e}")))
                }
            };
            // Receiver gone means the orchestrator was dropped
            let _ = tx.send(Completion { id, outcome });
        });
    }

    /// Apply every completion that has already arrived
    pub fn poll_completions(&mut self) -> Vec<CompletionOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(completion) = self.completion_rx.try_recv() {
            outcomes.push(self.apply(completion));
        }
        outcomes
    }

    /// Wait for the next completion and apply it
    ///
    /// Returns `None` immediately when nothing is in flight. A hung request
    /// keeps this pending; there is no timeout beyond the transport's.
    pub async fn wait_for_completion(&mut self) -> Option<CompletionOutcome> {
        if self.outstanding == 0 {
            return None;
        }
        let completion = self.completion_rx.recv().await?;
        Some(self.apply(completion))
    }

    /// Wait until the active request (if any) settles
    ///
    /// Superseded responses arriving in the meantime are dropped.
    pub async fn settle(&mut self) -> &RequestState {
        while self.active.is_some() {
            if self.wait_for_completion().await.is_none() {
                break;
            }
        }
        &self.state
    }

    fn apply(&mut self, completion: Completion) -> CompletionOutcome {
        self.outstanding = self.outstanding.saturating_sub(1);
        let Completion { id, outcome } = completion;

        if self.active != Some(id) {
            tracing::debug!(request = %id, active = ?self.active, "Dropping superseded response");
            return CompletionOutcome::Superseded(id);
        }
        self.active = None;

        match outcome {
            Ok(result) => {
                tracing::info!(request = %id, category = %result.category, tier = %result.tier(), "Prediction received");
                self.state = RequestState::Succeeded(result);
            }
            Err(err) => {
                tracing::warn!(request = %id, error = %err, "Prediction failed");
                self.state = RequestState::Failed(err.user_message());
            }
        }
        CompletionOutcome::Applied(id)
    }
}
