use statig::prelude::*;

use crate::workflow::types::{RecordEdit, ReferenceSet, TargetRecord, WorkflowState};

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    LoadSucceeded {
        record: TargetRecord,
        references: ReferenceSet,
    },
    LoadFailed {
        message: String,
    },
    SubmitRequested {
        edit: RecordEdit,
    },
    SubmitRejected {
        reason: String,
    },
    SubmitFailed {
        message: String,
    },
    SubmitSucceeded,
    Dispose,
}

/// Context for one workflow instance.
///
/// `state` is the user-visible projection; the statig states below decide
/// which events are accepted.
pub struct WorkflowMachine {
    pub record_id: String,
    state: WorkflowState,
    pending: Option<TargetRecord>,
    disposed: bool,
}

impl WorkflowMachine {
    pub fn new(record_id: String) -> Self {
        Self {
            record_id,
            state: WorkflowState::Loading,
            pending: None,
            disposed: false,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Merged record awaiting persistence, set only while submitting
    pub fn pending_record(&self) -> Option<&TargetRecord> {
        self.pending.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Back to Ready with the originally loaded record
    fn restore_ready(&mut self) {
        self.pending = None;
        let state = std::mem::replace(&mut self.state, WorkflowState::Loading);
        self.state = match state {
            WorkflowState::Submitting { record, references } => {
                WorkflowState::Ready { record, references }
            }
            other => other,
        };
    }

    fn mark_disposed(&mut self) {
        self.pending = None;
        self.disposed = true;
        tracing::debug!(record_id = %self.record_id, "Workflow instance disposed");
    }
}

#[state_machine(initial = "State::loading()")]
impl WorkflowMachine {
    #[state]
    fn loading(&mut self, event: &WorkflowEvent) -> Outcome<State> {
        match event {
            WorkflowEvent::LoadSucceeded { record, references } => {
                self.state = WorkflowState::Ready {
                    record: record.clone(),
                    references: references.clone(),
                };
                tracing::info!(record_id = %self.record_id, "Workflow ready");
                Transition(State::ready())
            }
            WorkflowEvent::LoadFailed { message } => {
                self.state = WorkflowState::Error {
                    message: message.clone(),
                };
                tracing::warn!(record_id = %self.record_id, %message, "Workflow failed to load");
                Transition(State::failed())
            }
            WorkflowEvent::Dispose => {
                self.mark_disposed();
                Transition(State::disposed())
            }
            _ => Handled,
        }
    }

    #[state]
    fn ready(&mut self, event: &WorkflowEvent) -> Outcome<State> {
        match event {
            WorkflowEvent::SubmitRequested { edit } => {
                let state = std::mem::replace(&mut self.state, WorkflowState::Loading);
                match state {
                    WorkflowState::Ready { record, references } => {
                        self.pending = Some(record.merged_with(edit));
                        self.state = WorkflowState::Submitting { record, references };
                        tracing::info!(
                            record_id = %self.record_id,
                            branch_id = %edit.branch_id,
                            "Submission started"
                        );
                        Transition(State::submitting())
                    }
                    other => {
                        self.state = other;
                        Handled
                    }
                }
            }
            WorkflowEvent::Dispose => {
                self.mark_disposed();
                Transition(State::disposed())
            }
            _ => Handled,
        }
    }

    #[state]
    fn submitting(&mut self, event: &WorkflowEvent) -> Outcome<State> {
        match event {
            WorkflowEvent::SubmitRejected { reason } => {
                self.restore_ready();
                tracing::info!(record_id = %self.record_id, %reason, "Submission rejected");
                Transition(State::ready())
            }
            WorkflowEvent::SubmitFailed { message } => {
                self.restore_ready();
                tracing::warn!(record_id = %self.record_id, %message, "Submission failed");
                Transition(State::ready())
            }
            WorkflowEvent::SubmitSucceeded => match self.pending.take() {
                Some(record) => {
                    tracing::info!(record_id = %self.record_id, "Submission persisted");
                    self.state = WorkflowState::Completed { record };
                    Transition(State::completed())
                }
                None => Handled,
            },
            WorkflowEvent::SubmitRequested { .. } => {
                tracing::debug!(
                    record_id = %self.record_id,
                    "Ignoring submit while another is in flight"
                );
                Handled
            }
            WorkflowEvent::Dispose => {
                self.mark_disposed();
                Transition(State::disposed())
            }
            _ => Handled,
        }
    }

    #[state]
    fn failed(&mut self, event: &WorkflowEvent) -> Outcome<State> {
        match event {
            WorkflowEvent::Dispose => {
                self.mark_disposed();
                Transition(State::disposed())
            }
            _ => Handled,
        }
    }

    #[state]
    fn completed(&mut self, event: &WorkflowEvent) -> Outcome<State> {
        match event {
            WorkflowEvent::Dispose => {
                self.mark_disposed();
                Transition(State::disposed())
            }
            _ => Handled,
        }
    }

    #[state]
    fn disposed(&mut self, event: &WorkflowEvent) -> Outcome<State> {
        tracing::debug!(
            record_id = %self.record_id,
            event = ?event,
            "Event ignored on disposed workflow"
        );
        Handled
    }
}
