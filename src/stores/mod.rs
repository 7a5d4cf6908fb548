//! In-memory store implementations and the JSON fixture that seeds them
//!
//! The CLI reads a fixture file into these stores, runs the workflow, and
//! writes the records back when an update succeeds.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;

use crate::workflow::errors::StoreError;
use crate::workflow::traits::{RecordStore, ReferenceStore};
use crate::workflow::types::{ReferenceEntry, TargetRecord};

/// Records keyed by id
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<String, TargetRecord>>,
}

impl MemoryRecordStore {
    pub fn new(records: Vec<TargetRecord>) -> Self {
        Self {
            records: RwLock::new(
                records
                    .into_iter()
                    .map(|record| (record.id.clone(), record))
                    .collect(),
            ),
        }
    }

    /// All records, sorted by id
    pub async fn snapshot(&self) -> Vec<TargetRecord> {
        let mut records: Vec<TargetRecord> = self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }

    pub async fn get(&self, id: &str) -> Option<TargetRecord> {
        self.records.read().await.get(id).cloned()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn fetch_by_id(&self, id: &str) -> Result<TargetRecord, StoreError> {
        self.records
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    async fn update(&self, record: &TargetRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        match records.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                tracing::debug!(record_id = %record.id, "Record stored");
                Ok(())
            }
            None => Err(StoreError::not_found(record.id.clone())),
        }
    }
}

/// Fixed list of active branches
#[derive(Debug, Default)]
pub struct MemoryReferenceStore {
    entries: Vec<ReferenceEntry>,
}

impl MemoryReferenceStore {
    pub fn new(entries: Vec<ReferenceEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl ReferenceStore for MemoryReferenceStore {
    async fn list_active(&self) -> Result<Vec<ReferenceEntry>, StoreError> {
        Ok(self.entries.clone())
    }
}

/// On-disk seed data: `{ "records": [...], "branches": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub records: Vec<TargetRecord>,
    #[serde(default)]
    pub branches: Vec<ReferenceEntry>,
}

impl Fixture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        let fixture = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse fixture {}", path.display()))?;
        Ok(fixture)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write fixture {}", path.display()))?;
        Ok(())
    }

    pub fn into_stores(self) -> (MemoryRecordStore, MemoryReferenceStore) {
        (
            MemoryRecordStore::new(self.records),
            MemoryReferenceStore::new(self.branches),
        )
    }
}
