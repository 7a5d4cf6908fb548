// Joins the record fetch and the reference fetch into one outcome

use std::sync::Arc;
use tracing::{info, warn};

use crate::workflow::errors::StoreError;
use crate::workflow::fallback::ReferenceFallbackResolver;
use crate::workflow::traits::{RecordStore, ReferenceStore};
use crate::workflow::types::{ReferenceSet, TargetRecord};

pub const RECORD_LOAD_FAILED_MESSAGE: &str = "Failed to load record";
pub const REFERENCE_LOAD_FAILED_MESSAGE: &str = "Failed to load branches";

/// Result of loading everything the form needs
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded {
        record: TargetRecord,
        references: ReferenceSet,
        /// The store returned no active entries and the defaults were used
        fallback_used: bool,
    },
    Failed {
        message: String,
    },
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }
}

pub struct WorkflowDataLoader {
    records: Arc<dyn RecordStore>,
    references: Arc<dyn ReferenceStore>,
    fallback: ReferenceFallbackResolver,
}

impl WorkflowDataLoader {
    pub fn new(records: Arc<dyn RecordStore>, references: Arc<dyn ReferenceStore>) -> Self {
        Self {
            records,
            references,
            fallback: ReferenceFallbackResolver::new(),
        }
    }

    pub fn fallback(&self) -> &ReferenceFallbackResolver {
        &self.fallback
    }

    /// Fetch the record and the active references concurrently.
    ///
    /// The record is mandatory: its failure decides the outcome whatever the
    /// reference fetch did. A failed reference fetch is also fatal; only an
    /// empty (successful) one falls back to the default set.
    pub async fn load(&self, id: &str) -> LoadOutcome {
        let (record_result, reference_result) =
            tokio::join!(self.records.fetch_by_id(id), self.references.list_active());

        let record = match record_result {
            Ok(record) => record,
            Err(e) => {
                log_store_failure("record", id, &e);
                return LoadOutcome::Failed {
                    message: e.user_message(RECORD_LOAD_FAILED_MESSAGE),
                };
            }
        };

        let entries = match reference_result {
            Ok(entries) => entries,
            Err(e) => {
                log_store_failure("reference", id, &e);
                return LoadOutcome::Failed {
                    message: match e {
                        StoreError::Rejected { message } => message,
                        _ => REFERENCE_LOAD_FAILED_MESSAGE.to_string(),
                    },
                };
            }
        };

        let live = ReferenceSet::new(entries);
        let (references, fallback_used) = if live.is_empty() {
            warn!(
                record_id = %id,
                "Reference store returned no active entries, using default set"
            );
            (self.fallback.resolve(), true)
        } else {
            (live, false)
        };

        info!(
            record_id = %id,
            branch_id = %record.branch_id,
            references = references.len(),
            fallback_used,
            "Workflow data loaded"
        );

        LoadOutcome::Loaded {
            record,
            references,
            fallback_used,
        }
    }
}

fn log_store_failure(fetch: &str, id: &str, error: &StoreError) {
    if error.is_not_found() {
        warn!(record_id = %id, fetch, error = %error, "Fetch found nothing");
    } else {
        tracing::error!(record_id = %id, fetch, error = %error, "Fetch failed");
    }
}
