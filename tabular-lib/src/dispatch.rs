//! Bulk-action dispatch

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use async_trait::async_trait;

use crate::model::RowId;

/// Error returned by a [`BulkHandler`] when an action fails.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct BulkActionError {
    message: String,
}

impl BulkActionError {
    /// Creates a handler error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error type for bulk dispatch.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DispatchError {
    /// A bulk action is already running against this table.
    #[error("a bulk action is already in flight")]
    InFlight,

    /// No [`BulkHandler`] has been configured for this table.
    #[error("no bulk action handler is configured")]
    NoHandler,

    /// The handler rejected the action. Recoverable: the selection is
    /// preserved so the user can retry without re-selecting.
    #[error("bulk action '{action}' failed: {source}")]
    Handler {
        action: String,
        #[source]
        source: BulkActionError,
    },
}

/// Caller-supplied executor for bulk actions (delete, activate, ...).
///
/// The engine hands over the action key and the selected identifiers;
/// what happens on the backend is entirely the host's concern.
#[async_trait]
pub trait BulkHandler: Send + Sync {
    /// Runs `action` against the given row identifiers.
    async fn run(&self, action: &str, ids: &[RowId]) -> Result<(), BulkActionError>;
}

/// Dispatches bulk actions to a [`BulkHandler`], one at a time.
///
/// A busy flag is held for the duration of the handler call so the UI
/// can disable further bulk triggers; a second dispatch while busy fails
/// with [`DispatchError::InFlight`] without invoking the handler.
/// Clearing the selection after a successful action is the engine's
/// responsibility, not the dispatcher's.
#[derive(Clone)]
pub struct BulkActionDispatcher {
    handler: Arc<dyn BulkHandler>,
    busy: Arc<AtomicBool>,
}

impl BulkActionDispatcher {
    /// Creates a dispatcher delegating to the given handler.
    pub fn new(handler: Arc<dyn BulkHandler>) -> Self {
        Self {
            handler,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns `true` while a bulk action is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Runs `action` against `ids` through the handler.
    pub async fn dispatch(&self, action: &str, ids: &[RowId]) -> Result<(), DispatchError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(DispatchError::InFlight);
        }

        log::debug!("dispatching bulk action '{}' for {} rows", action, ids.len());
        let result = self.handler.run(action, ids).await;
        self.busy.store(false, Ordering::SeqCst);

        result.map_err(|source| {
            log::warn!("bulk action '{}' failed: {}", action, source);
            DispatchError::Handler {
                action: action.to_string(),
                source,
            }
        })
    }
}

impl std::fmt::Debug for BulkActionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkActionDispatcher")
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}
