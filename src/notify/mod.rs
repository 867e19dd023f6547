//! Update notifications
//!
//! The console always receives a summary of each pass. Subscribers receive
//! a shorter message, but only while they are online and hold the
//! configured permission; membership is evaluated at send time.
//!
//! # Modules
//!
//! - [`messages`]: Default message catalog and placeholder rendering
//! - [`notifier`]: Sinks, subscriber traits and the [`Notifier`] fan-out

pub mod messages;
pub mod notifier;

pub use messages::{MessageCatalog, MessageContext, Notification, Severity};
pub use notifier::{Audience, NotificationSink, Notifier, Subscriber, TracingConsole};
