//! Scheduling of resolution passes
//!
//! # Modules
//!
//! - [`interval`]: `<number><unit>` interval grammar and tick conversion
//! - [`event`]: The cancellable [`UpdateCompleteEvent`] and its observers
//! - [`scheduler`]: [`Updater`], which runs passes once or periodically

pub mod event;
pub mod interval;
pub mod scheduler;

pub use event::{CompletionObserver, UpdateCompleteEvent};
pub use interval::{Interval, parse_interval};
pub use scheduler::{ExecutionMode, ScheduleHandle, Updater, UpdaterBuilder};
