//! Notification test utilities

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use release_radar::notify::{Audience, Notification, NotificationSink, Subscriber};

/// Console sink that keeps every notification it receives
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// All received lines, flattened in arrival order
    pub fn lines(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .flat_map(|n| n.lines.clone())
            .collect()
    }
}

impl NotificationSink for RecordingSink {
    fn send(&self, notification: &Notification) {
        self.sent.lock().unwrap().push(notification.clone());
    }
}

pub struct StubSubscriber {
    id: &'static str,
    online: AtomicBool,
    permissions: Vec<&'static str>,
    received: Mutex<Vec<String>>,
}

impl StubSubscriber {
    pub fn new(id: &'static str, permissions: &[&'static str]) -> Arc<Self> {
        Arc::new(Self {
            id,
            online: AtomicBool::new(true),
            permissions: permissions.to_vec(),
            received: Mutex::new(Vec::new()),
        })
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.received.lock().unwrap().clear();
    }
}

impl Subscriber for StubSubscriber {
    fn id(&self) -> &str {
        self.id
    }

    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(&permission)
    }

    fn send(&self, lines: &[String]) {
        self.received.lock().unwrap().extend_from_slice(lines);
    }
}

/// Audience over a fixed list of subscribers
pub struct StubAudience {
    subscribers: Vec<Arc<StubSubscriber>>,
}

impl StubAudience {
    pub fn new(subscribers: &[Arc<StubSubscriber>]) -> Arc<Self> {
        Arc::new(Self {
            subscribers: subscribers.to_vec(),
        })
    }
}

impl Audience for StubAudience {
    fn subscribers(&self) -> Vec<Arc<dyn Subscriber>> {
        self.subscribers
            .iter()
            .map(|s| Arc::clone(s) as Arc<dyn Subscriber>)
            .collect()
    }
}
