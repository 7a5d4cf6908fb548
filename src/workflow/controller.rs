// Workflow controller - owns the state machine and every user-visible side effect

use serde::{Deserialize, Serialize};
use statig::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, Instrument};

use crate::telemetry::{create_workflow_span, generate_correlation_id};
use crate::workflow::loader::{LoadOutcome, WorkflowDataLoader};
use crate::workflow::state_machine::{WorkflowEvent, WorkflowMachine};
use crate::workflow::traits::{
    Navigator, NotificationKind, NotificationSink, RecordStore, ReferenceStore,
};
use crate::workflow::types::{RecordEdit, WorkflowState};
use crate::workflow::validator::{SubmissionValidator, Validation};

pub const SAVE_FAILED_MESSAGE: &str = "Failed to save changes";

const FALLBACK_TITLE: &str = "No active branches";
const REJECTED_TITLE: &str = "Invalid branch";
const UPDATE_FAILED_TITLE: &str = "Update failed";
const UPDATED_TITLE: &str = "Record updated";

/// Routes the controller navigates to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSettings {
    /// Where to go after a successful update
    pub success_route: String,
    /// Where to go when the user leaves without saving
    pub cancel_route: String,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            success_route: "/members".to_string(),
            cancel_route: "/members".to_string(),
        }
    }
}

/// External capabilities the workflow depends on
#[derive(Clone)]
pub struct Collaborators {
    pub records: Arc<dyn RecordStore>,
    pub references: Arc<dyn ReferenceStore>,
    pub notifications: Arc<dyn NotificationSink>,
    pub navigator: Arc<dyn Navigator>,
}

/// What happened to one submit request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Persisted; the instance has navigated away
    Completed,
    /// Failed referential validation, nothing was persisted
    Rejected { reason: String },
    /// The store refused or failed the update
    Failed { message: String },
    /// Not in `Ready` (already submitting, still loading, terminal)
    Ignored,
    /// The store answered after the instance was disposed
    Discarded,
}

struct ControllerInner {
    record_id: String,
    correlation_id: String,
    settings: WorkflowSettings,
    loader: WorkflowDataLoader,
    validator: SubmissionValidator,
    records: Arc<dyn RecordStore>,
    notifications: Arc<dyn NotificationSink>,
    navigator: Arc<dyn Navigator>,
    load_started: AtomicBool,
    machine: Mutex<StateMachine<WorkflowMachine>>,
}

/// One load, edit, submit run for a single record.
///
/// Cheap to clone; all clones drive the same instance. The machine lock is
/// never held across a store call, and notifications fire under the lock so
/// they cannot race `dispose`.
#[derive(Clone)]
pub struct WorkflowController {
    inner: Arc<ControllerInner>,
}

impl WorkflowController {
    /// Create an instance in `Loading`. Nothing is fetched until [`load`](Self::load).
    pub fn new(record_id: &str, collaborators: Collaborators, settings: WorkflowSettings) -> Self {
        let Collaborators {
            records,
            references,
            notifications,
            navigator,
        } = collaborators;

        Self {
            inner: Arc::new(ControllerInner {
                record_id: record_id.to_string(),
                correlation_id: generate_correlation_id(),
                settings,
                loader: WorkflowDataLoader::new(records.clone(), references),
                validator: SubmissionValidator::new(),
                records,
                notifications,
                navigator,
                load_started: AtomicBool::new(false),
                machine: Mutex::new(WorkflowMachine::new(record_id.to_string()).state_machine()),
            }),
        }
    }

    /// Create an instance and start loading it on the current runtime
    pub fn enter(
        record_id: &str,
        collaborators: Collaborators,
        settings: WorkflowSettings,
    ) -> (Self, JoinHandle<()>) {
        let controller = Self::new(record_id, collaborators, settings);
        let loading = controller.clone();
        let handle = tokio::spawn(async move { loading.load().await });
        (controller, handle)
    }

    pub fn record_id(&self) -> &str {
        &self.inner.record_id
    }

    pub fn correlation_id(&self) -> &str {
        &self.inner.correlation_id
    }

    pub async fn state(&self) -> WorkflowState {
        self.inner.machine.lock().await.inner().state().clone()
    }

    pub async fn is_disposed(&self) -> bool {
        self.inner.machine.lock().await.inner().is_disposed()
    }

    /// Run both fetches and settle into `Ready` or `Error`. Runs at most once.
    pub async fn load(&self) {
        if self.inner.load_started.swap(true, Ordering::SeqCst) {
            debug!(record_id = %self.inner.record_id, "Load already started");
            return;
        }

        let span = create_workflow_span("load", &self.inner.record_id, &self.inner.correlation_id);
        async {
            let outcome = self.inner.loader.load(&self.inner.record_id).await;

            let mut machine = self.inner.machine.lock().await;
            if machine.inner().is_disposed() {
                debug!(
                    record_id = %self.inner.record_id,
                    "Dropping load result for disposed workflow"
                );
                return;
            }

            match outcome {
                LoadOutcome::Loaded {
                    record,
                    references,
                    fallback_used,
                } => {
                    machine.handle(&WorkflowEvent::LoadSucceeded { record, references });
                    if fallback_used {
                        let detail = format!(
                            "No active branches were found. Using defaults: {}",
                            self.inner.loader.fallback().describe()
                        );
                        self.inner
                            .notifications
                            .notify(NotificationKind::Warning, FALLBACK_TITLE, &detail);
                    }
                }
                LoadOutcome::Failed { message } => {
                    machine.handle(&WorkflowEvent::LoadFailed { message });
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Validate and persist an edit. Only acts from `Ready`.
    pub async fn submit(&self, edit: RecordEdit) -> SubmitOutcome {
        let span = create_workflow_span(
            "submit",
            &self.inner.record_id,
            &self.inner.correlation_id,
        );
        async {
            let merged = {
                let mut machine = self.inner.machine.lock().await;
                let (validation, merged) = match machine.inner().state() {
                    WorkflowState::Ready { record, references }
                        if !machine.inner().is_disposed() =>
                    {
                        (
                            self.inner.validator.validate(&edit, references),
                            record.merged_with(&edit),
                        )
                    }
                    state => {
                        debug!(
                            record_id = %self.inner.record_id,
                            ?state,
                            "Submit ignored outside Ready"
                        );
                        return SubmitOutcome::Ignored;
                    }
                };

                machine.handle(&WorkflowEvent::SubmitRequested { edit });

                if let Validation::Rejected { reason } = validation {
                    machine.handle(&WorkflowEvent::SubmitRejected {
                        reason: reason.clone(),
                    });
                    self.inner
                        .notifications
                        .notify(NotificationKind::Error, REJECTED_TITLE, &reason);
                    return SubmitOutcome::Rejected { reason };
                }

                merged
            };

            let result = self.inner.records.update(&merged).await;

            let mut machine = self.inner.machine.lock().await;
            if machine.inner().is_disposed() {
                debug!(
                    record_id = %self.inner.record_id,
                    "Dropping update result for disposed workflow"
                );
                return SubmitOutcome::Discarded;
            }

            match result {
                Ok(()) => {
                    machine.handle(&WorkflowEvent::SubmitSucceeded);
                    let detail = format!("{} was saved", merged.name);
                    self.inner
                        .notifications
                        .notify(NotificationKind::Info, UPDATED_TITLE, &detail);
                    info!(
                        record_id = %self.inner.record_id,
                        route = %self.inner.settings.success_route,
                        "Record updated, leaving workflow"
                    );
                    self.inner.navigator.go_to(&self.inner.settings.success_route);
                    SubmitOutcome::Completed
                }
                Err(e) => {
                    tracing::error!(record_id = %self.inner.record_id, error = %e, "Update failed");
                    let message = e.user_message(SAVE_FAILED_MESSAGE);
                    machine.handle(&WorkflowEvent::SubmitFailed {
                        message: message.clone(),
                    });
                    self.inner
                        .notifications
                        .notify(NotificationKind::Error, UPDATE_FAILED_TITLE, &message);
                    SubmitOutcome::Failed { message }
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Leave without saving: navigate to the cancel route and dispose.
    /// Returns false once the instance has ended (disposed or completed).
    pub async fn cancel(&self) -> bool {
        let mut machine = self.inner.machine.lock().await;
        if machine.inner().is_disposed() || machine.inner().state().is_completed() {
            debug!(record_id = %self.inner.record_id, "Cancel ignored, workflow has ended");
            return false;
        }
        info!(
            record_id = %self.inner.record_id,
            route = %self.inner.settings.cancel_route,
            "Leaving workflow without saving"
        );
        self.inner.navigator.go_to(&self.inner.settings.cancel_route);
        machine.handle(&WorkflowEvent::Dispose);
        true
    }

    /// Tear down the instance. Results that arrive afterwards change nothing.
    pub async fn dispose(&self) {
        self.inner.machine.lock().await.handle(&WorkflowEvent::Dispose);
    }
}

impl std::fmt::Debug for WorkflowController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowController")
            .field("record_id", &self.inner.record_id)
            .field("correlation_id", &self.inner.correlation_id)
            .field("settings", &self.inner.settings)
            .finish_non_exhaustive()
    }
}
