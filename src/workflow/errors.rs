use thiserror::Error;

/// Shown when a record fetch reports `NotFound`
pub const RECORD_NOT_FOUND_MESSAGE: &str = "Record not found";

/// Errors reported by the record and reference stores
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Record not found: {id}")]
    NotFound { id: String },
    /// The store produced a message that is safe to show the user
    #[error("{message}")]
    Rejected { message: String },
    /// Internal failure; the message is logged, never shown
    #[error("Store backend error: {message}")]
    Backend { message: String },
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        StoreError::Backend {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        StoreError::Rejected {
            message: message.into(),
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound { id: id.into() }
    }

    /// Message to surface to the user. Backend details are replaced by `generic`.
    pub fn user_message(&self, generic: &str) -> String {
        match self {
            StoreError::NotFound { .. } => RECORD_NOT_FOUND_MESSAGE.to_string(),
            StoreError::Rejected { message } => message.clone(),
            StoreError::Backend { .. } => generic.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
