//! Fan-out of update notifications to the console and the audience

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::notify::messages::{MessageCatalog, MessageContext, Notification, Severity};
use crate::schedule::event::UpdateCompleteEvent;
use crate::update::{ResolvedUpdate, UpdateResult};

/// Receives console notifications
pub trait NotificationSink: Send + Sync {
    fn send(&self, notification: &Notification);
}

/// Console sink that writes every line through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingConsole;

impl NotificationSink for TracingConsole {
    fn send(&self, notification: &Notification) {
        for line in &notification.lines {
            match notification.severity {
                Severity::Info => info!(target: "release_radar::console", "{}", line),
                Severity::Warning => warn!(target: "release_radar::console", "{}", line),
            }
        }
    }
}

/// A potential notification recipient known to the host
pub trait Subscriber: Send + Sync {
    fn id(&self) -> &str;
    fn is_online(&self) -> bool;
    fn has_permission(&self, permission: &str) -> bool;
    fn send(&self, lines: &[String]);
}

/// Enumerates the host's subscribers. Queried again on every dispatch.
pub trait Audience: Send + Sync {
    fn subscribers(&self) -> Vec<Arc<dyn Subscriber>>;
}

/// Routes rendered messages to the console and to permitted subscribers
pub struct Notifier {
    app_name: String,
    console: Arc<dyn NotificationSink>,
    audience: Option<Arc<dyn Audience>>,
    permission: Option<String>,
    catalog: MessageCatalog,
}

impl Notifier {
    pub fn new(app_name: impl Into<String>, console: Arc<dyn NotificationSink>) -> Self {
        Self {
            app_name: app_name.into(),
            console,
            audience: None,
            permission: None,
            catalog: MessageCatalog::default(),
        }
    }

    pub fn with_audience(mut self, audience: Arc<dyn Audience>) -> Self {
        self.audience = Some(audience);
        self
    }

    /// Permission subscribers need. Blank permissions admit every online subscriber.
    pub fn with_permission(mut self, permission: Option<String>) -> Self {
        self.permission = permission.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn with_catalog(mut self, catalog: MessageCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    /// Online subscribers holding the permission, evaluated now
    pub fn audience(&self) -> Vec<Arc<dyn Subscriber>> {
        self.audience
            .as_ref()
            .map(|audience| audience.subscribers())
            .unwrap_or_default()
            .into_iter()
            .filter(|subscriber| self.is_audience_member(subscriber.as_ref()))
            .collect()
    }

    pub fn is_audience_member(&self, subscriber: &dyn Subscriber) -> bool {
        subscriber.is_online()
            && self
                .permission
                .as_deref()
                .is_none_or(|permission| subscriber.has_permission(permission))
    }

    /// Tell the console and the current audience that a pass is starting
    pub fn announce_check(&self) {
        let line = vec![self.catalog.checking().to_string()];

        self.console.send(&Notification {
            severity: Severity::Info,
            lines: line.clone(),
        });
        for subscriber in self.audience() {
            subscriber.send(&line);
        }
    }

    /// Send the result of a completed pass to the console and the audience
    pub fn dispatch(&self, event: &UpdateCompleteEvent) {
        let context = MessageContext::new(&self.app_name, event.active());

        self.console.send(&self.catalog.console(event.result(), &context));

        let message = self.catalog.subscriber(event.result(), &context);
        let audience = self.audience();
        debug!("Notifying {} audience members", audience.len());

        for subscriber in audience {
            subscriber.send(&message.lines);
        }
    }

    /// Greet a subscriber that just joined when an update is waiting.
    ///
    /// Returns true when a message was sent.
    pub fn notify_subscriber(&self, subscriber: &dyn Subscriber, state: &ResolvedUpdate) -> bool {
        if state.result() != UpdateResult::UpdateAvailable || !self.is_audience_member(subscriber) {
            return false;
        }

        let context = MessageContext::new(&self.app_name, state.active());
        let message = self.catalog.subscriber(state.result(), &context);
        debug!("Sending update notice to {}", subscriber.id());
        subscriber.send(&message.lines);
        true
    }
}
