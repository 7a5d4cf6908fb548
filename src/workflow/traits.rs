// Collaborator interfaces - injected into the workflow for testability

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use crate::workflow::errors::StoreError;
use crate::workflow::types::{ReferenceEntry, TargetRecord};

/// Backing store for the edited records
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch a record by identifier
    async fn fetch_by_id(&self, id: &str) -> Result<TargetRecord, StoreError>;

    /// Persist a full record
    async fn update(&self, record: &TargetRecord) -> Result<(), StoreError>;
}

/// Source of the active reference entries (branches)
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    /// List active entries. An empty list is a valid answer.
    async fn list_active(&self) -> Result<Vec<ReferenceEntry>, StoreError>;
}

/// Severity of a user notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::Info => write!(f, "info"),
            NotificationKind::Warning => write!(f, "warning"),
            NotificationKind::Error => write!(f, "error"),
        }
    }
}

/// Fire-and-forget user notifications
pub trait NotificationSink: Send + Sync {
    fn notify(&self, kind: NotificationKind, title: &str, detail: &str);
}

/// Route changes out of the workflow
pub trait Navigator: Send + Sync {
    fn go_to(&self, route: &str);
}
