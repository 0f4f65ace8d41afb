//! Reorder state machine: optimistic apply, debounced persistence,
//! latest-wins reconciliation and rollback.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use admissions_client::DirectoryApi;
use admissions_core::AppResult;
use admissions_core::error::AppError;
use admissions_core::traits::Notifier;
use admissions_core::types::{DirectoryId, Notice};
use admissions_entity::field::{DirectoryField, ReorderFieldsRequest};

use crate::store::FieldStore;

use super::coordinator::{LatestWins, OperationToken};
use super::failure::ReorderFailure;
use super::payload::{ReorderPayloadError, move_field, validate_ordering};
use super::transaction::ReorderTransaction;

/// Capacity of the completion event channel.
const EVENT_CAPACITY: usize = 32;

/// Terminal outcome of a persisted reorder, published to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum ReorderEvent {
    /// The server confirmed the order now shown.
    Committed {
        /// Operation that was persisted.
        token: OperationToken,
        /// Server-confirmed list.
        fields: Vec<DirectoryField>,
    },
    /// Persistence failed and the pre-drag order was restored.
    RolledBack {
        /// Operation that failed.
        token: OperationToken,
        /// Classification of the failure.
        failure: ReorderFailure,
        /// Message shown to the user.
        message: String,
    },
    /// A response arrived for a superseded operation and was ignored.
    Discarded {
        /// The stale operation.
        token: OperationToken,
    },
}

/// A drop that could not be accepted.
#[derive(Debug, Error)]
pub enum ReorderError {
    /// A reorder request is already on its way to the server.
    #[error("A field reorder is already being saved")]
    Busy,
    /// The candidate order is invalid.
    #[error(transparent)]
    Payload(#[from] ReorderPayloadError),
    /// The owning view is gone.
    #[error("Field reordering has been shut down")]
    ShutDown,
}

impl From<ReorderError> for AppError {
    fn from(err: ReorderError) -> Self {
        match err {
            ReorderError::Busy => AppError::busy(err.to_string()),
            ReorderError::Payload(payload) => payload.into(),
            ReorderError::ShutDown => AppError::conflict(err.to_string()),
        }
    }
}

/// What happened to an accepted drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Source and target were the same; nothing changed.
    Unchanged,
    /// The new order is shown and will be persisted after the debounce window.
    Scheduled(OperationToken),
}

/// Coarse state, for views that show a saving indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderPhase {
    /// Nothing pending.
    Idle,
    /// An optimistic order waits for the debounce window to close.
    Scheduled,
    /// The reorder request is on its way.
    InFlight,
}

#[derive(Debug)]
enum Phase {
    Idle,
    Scheduled(ReorderTransaction),
    InFlight(ReorderTransaction),
}

#[derive(Debug)]
struct Inner {
    phase: Phase,
    timer: Option<JoinHandle<()>>,
    shut_down: bool,
}

/// Drives drag-and-drop reordering for one directory's field list.
#[derive(Debug, Clone)]
pub struct ReorderController {
    /// Directory being edited.
    directory_id: DirectoryId,
    /// Backend access.
    api: Arc<dyn DirectoryApi>,
    /// Displayed field list.
    store: FieldStore,
    /// User-facing notices.
    notifier: Arc<dyn Notifier>,
    /// Operation identity.
    tokens: Arc<LatestWins>,
    /// Phase and debounce timer.
    inner: Arc<Mutex<Inner>>,
    /// Debounce window.
    debounce: Duration,
    /// Completion observers.
    events: broadcast::Sender<ReorderEvent>,
}

impl ReorderController {
    /// Create a controller over `store`.
    pub fn new(
        api: Arc<dyn DirectoryApi>,
        store: FieldStore,
        notifier: Arc<dyn Notifier>,
        debounce: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            directory_id: store.directory_id(),
            api,
            store,
            notifier,
            tokens: Arc::new(LatestWins::new()),
            inner: Arc::new(Mutex::new(Inner {
                phase: Phase::Idle,
                timer: None,
                shut_down: false,
            })),
            debounce,
            events,
        }
    }

    /// Observe terminal outcomes.
    pub fn subscribe(&self) -> broadcast::Receiver<ReorderEvent> {
        self.events.subscribe()
    }

    /// Current coarse phase.
    pub async fn phase(&self) -> ReorderPhase {
        match self.inner.lock().await.phase {
            Phase::Idle => ReorderPhase::Idle,
            Phase::Scheduled(_) => ReorderPhase::Scheduled,
            Phase::InFlight(_) => ReorderPhase::InFlight,
        }
    }

    /// Handle a completed drag from index `from` to index `to`.
    ///
    /// On success the new order is already visible in the store when this
    /// returns. Drops arriving inside the debounce window are folded into
    /// the pending transaction; drops arriving while the request is in
    /// flight are rejected with [`ReorderError::Busy`].
    pub async fn on_drop(&self, from: usize, to: usize) -> Result<DropOutcome, ReorderError> {
        let mut inner = self.inner.lock().await;

        if inner.shut_down {
            return Err(ReorderError::ShutDown);
        }
        if matches!(inner.phase, Phase::InFlight(_)) {
            warn!(directory_id = %self.directory_id, "Reorder rejected: request already in flight");
            return Err(ReorderError::Busy);
        }
        if from == to {
            return Ok(DropOutcome::Unchanged);
        }

        let current = self.store.snapshot();
        let candidate = move_field(&current, from, to)
            .and_then(|candidate| {
                validate_ordering(&candidate, self.directory_id).map(|_| candidate)
            })
            .inspect_err(|e| {
                warn!(directory_id = %self.directory_id, error = %e, "Reorder payload rejected");
                self.notifier.notify(Notice::error(e.to_string()));
            })?;

        self.store.replace(candidate);

        let token = self.tokens.issue();
        if let Phase::Scheduled(tx) = &mut inner.phase {
            tx.supersede(token);
        } else {
            inner.phase = Phase::Scheduled(ReorderTransaction::begin(current, token));
        }

        if let Some(timer) = inner.timer.take() {
            timer.abort();
        }
        let this = self.clone();
        let debounce = self.debounce;
        inner.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            this.flush(token).await;
        }));

        debug!(directory_id = %self.directory_id, %token, from, to, "Reorder scheduled");
        Ok(DropOutcome::Scheduled(token))
    }

    /// Replace the list with freshly fetched fields, abandoning any pending
    /// or in-flight reorder. A late response for it will be discarded.
    pub async fn reset(&self, fields: Vec<DirectoryField>) {
        let mut inner = self.inner.lock().await;
        self.cancel_pending(&mut inner);
        self.store.replace(fields);
    }

    /// Tear down: stop the debounce timer and refuse further drops.
    pub async fn shutdown(&self) {
        let mut inner = self.inner.lock().await;
        self.cancel_pending(&mut inner);
        inner.shut_down = true;
    }

    fn cancel_pending(&self, inner: &mut Inner) {
        if let Some(timer) = inner.timer.take() {
            timer.abort();
        }
        self.tokens.invalidate();
        inner.phase = Phase::Idle;
    }

    /// Send the pending order if `token` still names it.
    async fn flush(&self, token: OperationToken) {
        let request = {
            let mut inner = self.inner.lock().await;
            let phase = std::mem::replace(&mut inner.phase, Phase::Idle);
            let tx = match phase {
                Phase::Scheduled(tx) if tx.token() == token && self.tokens.is_current(token) => tx,
                other => {
                    debug!(%token, "Debounce fired for a superseded reorder");
                    inner.phase = other;
                    return;
                }
            };
            // The request must outlive a reset, so the handle is released here.
            inner.timer = None;
            inner.phase = Phase::InFlight(tx);
            ReorderFieldsRequest::from_fields(&self.store.snapshot())
        };

        info!(
            directory_id = %self.directory_id,
            %token,
            fields = request.fields.len(),
            "Persisting field order"
        );
        let result = self.api.reorder_fields(self.directory_id, &request).await;
        self.complete(token, result).await;
    }

    async fn complete(&self, token: OperationToken, result: AppResult<Vec<DirectoryField>>) {
        let mut inner = self.inner.lock().await;

        if !self.tokens.is_current(token) {
            debug!(%token, "Discarding stale reorder response");
            if matches!(&inner.phase, Phase::InFlight(tx) if tx.token() == token) {
                inner.phase = Phase::Idle;
            }
            let _ = self.events.send(ReorderEvent::Discarded { token });
            return;
        }

        let mut tx = match std::mem::replace(&mut inner.phase, Phase::Idle) {
            Phase::InFlight(tx) if tx.token() == token => tx,
            other => {
                inner.phase = other;
                return;
            }
        };

        let event = match result {
            Ok(confirmed) => {
                // An empty answer carries no order; keep the one already shown.
                let fields = if confirmed.is_empty() {
                    tx.commit(self.store.snapshot())
                } else {
                    tx.commit(confirmed)
                };
                self.store.replace(fields.clone());
                info!(directory_id = %self.directory_id, %token, "Field order saved");
                self.notifier.notify(Notice::success("Field order saved"));
                ReorderEvent::Committed { token, fields }
            }
            Err(err) => {
                let failure = ReorderFailure::classify(&err);
                let message = failure.user_message(&err);
                warn!(
                    directory_id = %self.directory_id,
                    %token,
                    ?failure,
                    error = %err,
                    "Field order rejected, rolling back"
                );
                self.store.replace(tx.rollback());
                self.notifier.notify(Notice::error(message.clone()));
                ReorderEvent::RolledBack {
                    token,
                    failure,
                    message,
                }
            }
        };

        let _ = self.events.send(event);
    }
}
