//! Beer list controller: owns the fetch lifecycle and the filtered view.
//!
//! One controller lives for one mounted view. `activate` starts the single
//! gateway call, `resolve`/`poll_resolution` apply its outcome, and
//! `set_search_term` re-derives the filtered view synchronously. After
//! `teardown` no outcome is applied and no event is emitted.

use std::sync::Arc;

use shared::domain::Beer;
use tokio::{
    sync::{broadcast, oneshot},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{filter_beers, BeerGateway, GatewayError};

pub const FETCH_ERROR_MESSAGE: &str = "An error occurred while loading the beers.";

const EVENT_CHANNEL_CAPACITY: usize = 64;

type FetchOutcome = Result<Vec<Beer>, GatewayError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus {
    Loading,
    Error,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    Loading,
    Ready { total: usize, visible: usize },
    Failed { message: String },
    Filtered { term: String, visible: usize },
}

struct PendingFetch {
    generation: u64,
    outcome: oneshot::Receiver<FetchOutcome>,
    task: JoinHandle<()>,
}

pub struct ListController {
    gateway: Arc<dyn BeerGateway>,
    status: ListStatus,
    beers: Option<Vec<Beer>>,
    filtered: Vec<Beer>,
    search_term: String,
    error_message: Option<String>,
    live: bool,
    generation: u64,
    pending: Option<PendingFetch>,
    events: broadcast::Sender<ListEvent>,
}

impl ListController {
    pub fn new(gateway: Arc<dyn BeerGateway>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            gateway,
            status: ListStatus::Loading,
            beers: None,
            filtered: Vec::new(),
            search_term: String::new(),
            error_message: None,
            live: true,
            generation: 0,
            pending: None,
            events,
        }
    }

    /// Enters `Loading` and starts exactly one gateway call on the current
    /// tokio runtime. Calling it again supersedes the outstanding call.
    ///
    /// Must be called from within a tokio runtime.
    pub fn activate(&mut self) {
        if !self.live {
            warn!("activate called on a torn-down list controller");
            return;
        }

        if let Some(stale) = self.pending.take() {
            debug!(
                generation = stale.generation,
                "superseding outstanding beer fetch"
            );
            stale.task.abort();
        }

        self.generation += 1;
        self.status = ListStatus::Loading;
        self.beers = None;
        self.filtered.clear();
        self.error_message = None;

        let (tx, rx) = oneshot::channel();
        let gateway = Arc::clone(&self.gateway);
        let task = tokio::spawn(async move {
            let outcome = gateway.fetch_beers().await;
            let _ = tx.send(outcome);
        });

        self.pending = Some(PendingFetch {
            generation: self.generation,
            outcome: rx,
            task,
        });
        debug!(generation = self.generation, "beer fetch started");
        self.emit(ListEvent::Loading);
    }

    /// Waits for the outstanding fetch and applies it. Returns whether the
    /// visible state changed; `false` when nothing was outstanding or the
    /// outcome was discarded.
    ///
    /// Cancel safe: dropping the future keeps the fetch outstanding.
    pub async fn resolve(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };

        let outcome = (&mut pending.outcome).await.unwrap_or_else(|_| {
            Err(GatewayError::Transport(
                "fetch task ended without a result".to_string(),
            ))
        });
        let generation = pending.generation;
        self.pending = None;
        self.apply(generation, outcome)
    }

    /// Non-blocking counterpart of [`ListController::resolve`] for callers
    /// that poll once per frame or tick.
    pub fn poll_resolution(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };

        let outcome = match pending.outcome.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return false,
            Err(oneshot::error::TryRecvError::Closed) => Err(GatewayError::Transport(
                "fetch task ended without a result".to_string(),
            )),
        };
        let generation = pending.generation;
        self.pending = None;
        self.apply(generation, outcome)
    }

    fn apply(&mut self, generation: u64, outcome: FetchOutcome) -> bool {
        if !self.live {
            debug!(generation, "discarding beer fetch outcome after teardown");
            return false;
        }
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "discarding stale beer fetch outcome"
            );
            return false;
        }

        match outcome {
            Ok(beers) => {
                self.filtered = filter_beers(&beers, &self.search_term);
                let total = beers.len();
                let visible = self.filtered.len();
                self.beers = Some(beers);
                self.error_message = None;
                self.status = ListStatus::Ready;
                info!(total, visible, "beer list ready");
                self.emit(ListEvent::Ready { total, visible });
            }
            Err(err) => {
                warn!(error = %err, kind = ?err.kind(), "failed to fetch beers");
                self.beers = None;
                self.filtered.clear();
                self.error_message = Some(FETCH_ERROR_MESSAGE.to_string());
                self.status = ListStatus::Error;
                self.emit(ListEvent::Failed {
                    message: FETCH_ERROR_MESSAGE.to_string(),
                });
            }
        }
        true
    }

    /// Stores `term` and re-derives the filtered view from the held
    /// collection. Without a collection the view stays empty.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.filtered = match &self.beers {
            Some(beers) => filter_beers(beers, &self.search_term),
            None => Vec::new(),
        };

        debug!(
            term = %self.search_term,
            visible = self.filtered.len(),
            "search term updated"
        );
        self.emit(ListEvent::Filtered {
            term: self.search_term.clone(),
            visible: self.filtered.len(),
        });
    }

    /// Detaches the controller from its view. The outstanding call, if any,
    /// is aborted and whatever it produces is ignored.
    pub fn teardown(&mut self) {
        if !self.live {
            return;
        }
        self.live = false;
        if let Some(pending) = &self.pending {
            pending.task.abort();
        }
        debug!(generation = self.generation, "list controller torn down");
    }

    pub fn status(&self) -> ListStatus {
        self.status
    }

    /// Only meaningful when the status is `Ready`.
    pub fn filtered_view(&self) -> &[Beer] {
        &self.filtered
    }

    /// Only meaningful when the status is `Error`.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn has_outstanding_fetch(&self) -> bool {
        self.pending.is_some()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ListEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: ListEvent) {
        if self.live {
            let _ = self.events.send(event);
        }
    }
}

impl Drop for ListController {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/list_controller_tests.rs"]
mod tests;
