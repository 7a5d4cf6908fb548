// Mock stores for controller tests - scripted results, optional gating

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, Semaphore};

use crate::notify::{RecordingNavigator, RecordingNotificationSink};
use crate::workflow::controller::{Collaborators, WorkflowController, WorkflowSettings};
use crate::workflow::errors::StoreError;
use crate::workflow::traits::{RecordStore, ReferenceStore};
use crate::workflow::types::{RecordEdit, ReferenceEntry, TargetRecord};

/// Holds a store call until the test opens it
#[derive(Debug)]
pub struct Gate {
    entered: Notify,
    release: Semaphore,
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

impl Gate {
    pub fn new() -> Self {
        Self {
            entered: Notify::new(),
            release: Semaphore::new(0),
        }
    }

    async fn pass(&self) {
        self.entered.notify_one();
        if let Ok(permit) = self.release.acquire().await {
            permit.forget();
        }
    }

    /// Wait until a call is parked at the gate
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// Let one parked call through
    pub fn open(&self) {
        self.release.add_permits(1);
    }
}

#[derive(Debug)]
pub struct MockRecordStore {
    pub fetch_result: Result<TargetRecord, StoreError>,
    pub update_results: Mutex<Vec<Result<(), StoreError>>>,
    pub fetch_gate: Option<Arc<Gate>>,
    pub update_gate: Option<Arc<Gate>>,
    pub fetch_calls: AtomicUsize,
    pub updated: Mutex<Vec<TargetRecord>>,
}

impl MockRecordStore {
    pub fn returning(record: TargetRecord) -> Self {
        Self {
            fetch_result: Ok(record),
            update_results: Mutex::new(Vec::new()),
            fetch_gate: None,
            update_gate: None,
            fetch_calls: AtomicUsize::new(0),
            updated: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: StoreError) -> Self {
        Self {
            fetch_result: Err(error),
            ..Self::returning(record("unused", "1"))
        }
    }

    /// Queue update results; once drained, updates succeed
    pub fn with_update_results(self, results: Vec<Result<(), StoreError>>) -> Self {
        *self.update_results.lock().unwrap() = results;
        self
    }

    pub fn with_fetch_gate(mut self, gate: Arc<Gate>) -> Self {
        self.fetch_gate = Some(gate);
        self
    }

    pub fn with_update_gate(mut self, gate: Arc<Gate>) -> Self {
        self.update_gate = Some(gate);
        self
    }

    pub fn update_calls(&self) -> usize {
        self.updated.lock().unwrap().len()
    }

    pub fn updated_records(&self) -> Vec<TargetRecord> {
        self.updated.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn fetch_by_id(&self, _id: &str) -> Result<TargetRecord, StoreError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.fetch_gate {
            gate.pass().await;
        }
        self.fetch_result.clone()
    }

    async fn update(&self, record: &TargetRecord) -> Result<(), StoreError> {
        self.updated.lock().unwrap().push(record.clone());
        if let Some(gate) = &self.update_gate {
            gate.pass().await;
        }
        let mut results = self.update_results.lock().unwrap();
        if results.is_empty() {
            Ok(())
        } else {
            results.remove(0)
        }
    }
}

#[derive(Debug)]
pub struct MockReferenceStore {
    pub result: Result<Vec<ReferenceEntry>, StoreError>,
    pub gate: Option<Arc<Gate>>,
    pub calls: AtomicUsize,
}

impl MockReferenceStore {
    pub fn returning(entries: Vec<ReferenceEntry>) -> Self {
        Self {
            result: Ok(entries),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: StoreError) -> Self {
        Self {
            result: Err(error),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_gate(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl ReferenceStore for MockReferenceStore {
    async fn list_active(&self) -> Result<Vec<ReferenceEntry>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        self.result.clone()
    }
}

/// Everything a controller test needs to inspect afterwards
pub struct Harness {
    pub controller: WorkflowController,
    pub records: Arc<MockRecordStore>,
    pub references: Arc<MockReferenceStore>,
    pub notifications: Arc<RecordingNotificationSink>,
    pub navigator: Arc<RecordingNavigator>,
}

impl Harness {
    pub fn new(id: &str, records: MockRecordStore, references: MockReferenceStore) -> Self {
        let records = Arc::new(records);
        let references = Arc::new(references);
        let notifications = Arc::new(RecordingNotificationSink::new());
        let navigator = Arc::new(RecordingNavigator::new());

        let controller = WorkflowController::new(
            id,
            Collaborators {
                records: records.clone(),
                references: references.clone(),
                notifications: notifications.clone(),
                navigator: navigator.clone(),
            },
            WorkflowSettings::default(),
        );

        Self {
            controller,
            records,
            references,
            notifications,
            navigator,
        }
    }
}

pub fn record(id: &str, branch_id: &str) -> TargetRecord {
    let mut extra = BTreeMap::new();
    extra.insert("memberNumber".to_string(), serde_json::json!(1042));
    TargetRecord {
        id: id.to_string(),
        name: "Grace Hopper".to_string(),
        date_of_birth: "1906-12-09".to_string(),
        branch_id: branch_id.to_string(),
        extra,
    }
}

pub fn branches() -> Vec<ReferenceEntry> {
    vec![
        ReferenceEntry::new("1", "Main Branch"),
        ReferenceEntry::new("2", "Harbour Branch"),
    ]
}

pub fn edit(branch_id: &str) -> RecordEdit {
    RecordEdit {
        name: "Rear Admiral Grace Hopper".to_string(),
        date_of_birth: "1906-12-09".to_string(),
        branch_id: branch_id.to_string(),
    }
}
