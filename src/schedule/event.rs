//! Resolution-complete event handed to observers after every pass

use crate::update::{ActiveRelease, ResolvedUpdate, UpdateResult};

/// Fired once per pass after the result is final and before notifications
/// are dispatched. Cancelling it suppresses notifications for that pass
/// only; the resolved state is kept either way.
#[derive(Debug, Clone)]
pub struct UpdateCompleteEvent {
    result: UpdateResult,
    active: Option<ActiveRelease>,
    is_async: bool,
    cancelled: bool,
}

impl UpdateCompleteEvent {
    pub(crate) fn new(state: &ResolvedUpdate, is_async: bool) -> Self {
        Self {
            result: state.result(),
            active: state.active().cloned(),
            is_async,
            cancelled: false,
        }
    }

    pub fn result(&self) -> UpdateResult {
        self.result
    }

    pub fn active(&self) -> Option<&ActiveRelease> {
        self.active.as_ref()
    }

    /// Whether the pass ran on a background worker
    pub fn is_async(&self) -> bool {
        self.is_async
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Receives [`UpdateCompleteEvent`]s in registration order
pub trait CompletionObserver: Send + Sync {
    fn on_complete(&self, event: &mut UpdateCompleteEvent);
}

impl<F> CompletionObserver for F
where
    F: Fn(&mut UpdateCompleteEvent) + Send + Sync,
{
    fn on_complete(&self, event: &mut UpdateCompleteEvent) {
        self(event)
    }
}
