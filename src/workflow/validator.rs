use crate::workflow::types::{RecordEdit, ReferenceSet};

pub const UNKNOWN_REFERENCE_REASON: &str = "selected reference does not exist";

/// Result of checking an edit against the loaded reference data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Rejected { reason: String },
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }
}

/// Referential integrity check for submitted edits.
///
/// Field shape (non-empty name, date format) belongs to the form; this only
/// checks that the chosen branch is one the workflow actually loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmissionValidator;

impl SubmissionValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, edit: &RecordEdit, references: &ReferenceSet) -> Validation {
        if references.contains(&edit.branch_id) {
            Validation::Valid
        } else {
            tracing::debug!(
                branch_id = %edit.branch_id,
                known = references.len(),
                "Submitted branch is not in the loaded reference set"
            );
            Validation::Rejected {
                reason: UNKNOWN_REFERENCE_REASON.to_string(),
            }
        }
    }
}
