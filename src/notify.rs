//! Notification and navigation adapters
//!
//! Console implementations back the CLI; recording implementations capture
//! everything the workflow emits so embedders and tests can inspect it.

use chrono::{DateTime, Utc};
use std::sync::Mutex;

use crate::workflow::traits::{Navigator, NotificationKind, NotificationSink};

/// Prints notifications for a terminal user and mirrors them into the log
#[derive(Debug, Default)]
pub struct ConsoleNotificationSink;

impl NotificationSink for ConsoleNotificationSink {
    fn notify(&self, kind: NotificationKind, title: &str, detail: &str) {
        match kind {
            NotificationKind::Info => {
                tracing::info!(%title, %detail, "Notification");
                println!("✅ {title}: {detail}");
            }
            NotificationKind::Warning => {
                tracing::warn!(%title, %detail, "Notification");
                println!("⚠️  {title}: {detail}");
            }
            NotificationKind::Error => {
                tracing::error!(%title, %detail, "Notification");
                eprintln!("❌ {title}: {detail}");
            }
        }
    }
}

/// Navigation for the CLI: there is nowhere to go, so it reports the route
#[derive(Debug, Default)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn go_to(&self, route: &str) {
        tracing::info!(%route, "Navigating");
        println!("➡️  {route}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub detail: String,
    pub emitted_at: DateTime<Utc>,
}

/// Keeps every notification in emission order
#[derive(Debug, Default)]
pub struct RecordingNotificationSink {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        match self.notifications.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count_of(&self, kind: NotificationKind) -> usize {
        self.notifications()
            .iter()
            .filter(|n| n.kind == kind)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications().is_empty()
    }
}

impl NotificationSink for RecordingNotificationSink {
    fn notify(&self, kind: NotificationKind, title: &str, detail: &str) {
        let notification = Notification {
            kind,
            title: title.to_string(),
            detail: detail.to_string(),
            emitted_at: Utc::now(),
        };
        match self.notifications.lock() {
            Ok(mut guard) => guard.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}

/// Keeps every requested route
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<String> {
        match self.routes.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Navigator for RecordingNavigator {
    fn go_to(&self, route: &str) {
        match self.routes.lock() {
            Ok(mut guard) => guard.push(route.to_string()),
            Err(poisoned) => poisoned.into_inner().push(route.to_string()),
        }
    }
}
