// Record Edit Workflow - load, reconcile, edit, submit
//
// The controller drives a statig state machine; stores, notifications and
// navigation are injected so every transition can be tested without I/O.

pub mod types;
pub mod errors;
pub mod traits;
pub mod fallback;
pub mod loader;
pub mod validator;
pub mod state_machine;
pub mod controller;

#[cfg(test)]
pub mod mocks;


pub use types::{RecordEdit, ReferenceEntry, ReferenceSet, TargetRecord, WorkflowState};
pub use errors::StoreError;
pub use traits::{Navigator, NotificationKind, NotificationSink, RecordStore, ReferenceStore};
pub use fallback::ReferenceFallbackResolver;
pub use loader::{LoadOutcome, WorkflowDataLoader};
pub use validator::{SubmissionValidator, Validation};
pub use state_machine::{WorkflowEvent, WorkflowMachine};
pub use controller::{Collaborators, SubmitOutcome, WorkflowController, WorkflowSettings};
