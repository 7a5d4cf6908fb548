// Core types for the record edit workflow

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The record being edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRecord {
    pub id: String,
    pub name: String,
    /// ISO date (`YYYY-MM-DD`), kept as a string end to end
    pub date_of_birth: String,
    /// May reference a branch that is no longer active
    pub branch_id: String,
    /// Store-owned attributes the form never edits
    #[serde(flatten, default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// The fields a user is permitted to change through the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordEdit {
    pub name: String,
    pub date_of_birth: String,
    pub branch_id: String,
}

impl TargetRecord {
    /// Build the record to persist: identity and store-owned attributes from
    /// `self`, editable fields from `edit`.
    pub fn merged_with(&self, edit: &RecordEdit) -> TargetRecord {
        TargetRecord {
            id: self.id.clone(),
            name: edit.name.clone(),
            date_of_birth: edit.date_of_birth.clone(),
            branch_id: edit.branch_id.clone(),
            extra: self.extra.clone(),
        }
    }

    /// Form prefill: the edit that would leave the record unchanged
    pub fn as_edit(&self) -> RecordEdit {
        RecordEdit {
            name: self.name.clone(),
            date_of_birth: self.date_of_birth.clone(),
            branch_id: self.branch_id.clone(),
        }
    }
}

/// A selectable branch
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub id: String,
    pub name: String,
}

impl ReferenceEntry {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// Ordered set of reference entries, unique by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReferenceSet {
    entries: Vec<ReferenceEntry>,
}

impl ReferenceSet {
    /// Keeps the first entry for each id
    pub fn new(entries: Vec<ReferenceEntry>) -> Self {
        let mut unique: Vec<ReferenceEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            if unique.iter().any(|kept| kept.id == entry.id) {
                tracing::warn!(
                    branch_id = %entry.id,
                    branch_name = %entry.name,
                    "Dropping duplicate reference entry"
                );
                continue;
            }
            unique.push(entry);
        }
        Self { entries: unique }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&ReferenceEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.get(id).map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }
}

impl From<Vec<ReferenceEntry>> for ReferenceSet {
    fn from(entries: Vec<ReferenceEntry>) -> Self {
        Self::new(entries)
    }
}

/// User-visible workflow state. Exactly one holds at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    /// Fetches are in flight
    Loading,
    /// Load failed; the only way out is navigating away
    Error { message: String },
    /// Record and branches loaded, form is interactive
    Ready {
        record: TargetRecord,
        references: ReferenceSet,
    },
    /// An update is in flight
    Submitting {
        record: TargetRecord,
        references: ReferenceSet,
    },
    /// Update persisted; the instance has ended
    Completed { record: TargetRecord },
}

impl WorkflowState {
    pub fn record(&self) -> Option<&TargetRecord> {
        match self {
            WorkflowState::Ready { record, .. } => Some(record),
            WorkflowState::Submitting { record, .. } => Some(record),
            WorkflowState::Completed { record } => Some(record),
            _ => None,
        }
    }

    pub fn references(&self) -> Option<&ReferenceSet> {
        match self {
            WorkflowState::Ready { references, .. } => Some(references),
            WorkflowState::Submitting { references, .. } => Some(references),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            WorkflowState::Error { message } => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, WorkflowState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, WorkflowState::Ready { .. })
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, WorkflowState::Submitting { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, WorkflowState::Error { .. })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, WorkflowState::Completed { .. })
    }
}
