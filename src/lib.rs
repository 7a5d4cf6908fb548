// Record Workflow Library - load, reconcile, edit, submit
// This exposes the core components for testing and integration

pub mod workflow;
pub mod stores;
pub mod notify;
pub mod telemetry;
pub mod config;

// Re-export key types for easy access
pub use workflow::{
    Collaborators,
    LoadOutcome,
    Navigator,
    NotificationKind,
    NotificationSink,
    RecordEdit,
    RecordStore,
    ReferenceEntry,
    ReferenceFallbackResolver,
    ReferenceSet,
    ReferenceStore,
    StoreError,
    SubmissionValidator,
    SubmitOutcome,
    TargetRecord,
    Validation,
    WorkflowController,
    WorkflowDataLoader,
    WorkflowSettings,
    WorkflowState,
};
pub use stores::{Fixture, MemoryRecordStore, MemoryReferenceStore};
pub use notify::{
    ConsoleNavigator, ConsoleNotificationSink, RecordingNavigator, RecordingNotificationSink,
};
pub use telemetry::{init_telemetry, generate_correlation_id, create_workflow_span};
pub use config::{RecordWorkflowConfig, config};
