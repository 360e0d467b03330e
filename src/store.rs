//! Dataset persistence collaborator
//!
//! The pipeline produces plain data; durably storing it is someone else's
//! job. This module defines the [`DatasetStore`] trait the service talks to,
//! so any backend can implement it, plus the in-memory implementation the
//! server runs with. The store assigns dataset ids and upload timestamps;
//! the core never manages transactions, indexes, or connections.
//!
//! Store failures surface as `UtilstatError::Persistence` and are never
//! retried here; the caller decides whether to retry the whole upload.

use crate::error::Result;
use crate::summary::AnalysisResult;
use crate::types::{DatasetMetadata, Domain, UsageRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A stored dataset: the upload's records and analysis plus ownership data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Store-assigned identifier
    pub id: Uuid,
    /// Original upload filename
    pub filename: String,
    /// Store-assigned upload time
    pub uploaded_at: DateTime<Utc>,
    /// Usage domain of the upload
    pub domain: Domain,
    /// Normalized records in upload order
    pub records: Vec<UsageRecord>,
    /// Derived analysis
    pub analysis: AnalysisResult,
    /// Upload-level metadata
    pub metadata: DatasetMetadata,
    /// Opaque owner identifier from the identity provider
    pub owner_id: String,
}

/// Dataset fields supplied by the caller; id and upload time are assigned by
/// the store
#[derive(Debug, Clone)]
pub struct NewDataset {
    /// Opaque owner identifier
    pub owner_id: String,
    /// Original upload filename
    pub filename: String,
    /// Usage domain
    pub domain: Domain,
    /// Normalized records
    pub records: Vec<UsageRecord>,
    /// Derived analysis
    pub analysis: AnalysisResult,
    /// Upload-level metadata
    pub metadata: DatasetMetadata,
}

/// Listing view of a dataset, without the record and analysis payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    /// Store-assigned identifier
    pub id: Uuid,
    /// Original upload filename
    pub filename: String,
    /// Store-assigned upload time
    pub uploaded_at: DateTime<Utc>,
    /// Usage domain of the upload
    pub domain: Domain,
    /// Upload-level metadata
    pub metadata: DatasetMetadata,
}

impl From<&Dataset> for DatasetSummary {
    fn from(dataset: &Dataset) -> Self {
        Self {
            id: dataset.id,
            filename: dataset.filename.clone(),
            uploaded_at: dataset.uploaded_at,
            domain: dataset.domain,
            metadata: dataset.metadata.clone(),
        }
    }
}

/// Persistence interface for datasets
///
/// All access is owner-scoped: a dataset is only visible to the owner id it
/// was stored under.
#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// Store a new dataset, assigning its id and upload time
    async fn insert(&self, dataset: NewDataset) -> Result<Dataset>;

    /// List one owner's datasets, newest first
    async fn list(&self, owner_id: &str) -> Result<Vec<DatasetSummary>>;

    /// Fetch one dataset by id, or `None` when it does not exist or belongs
    /// to a different owner
    async fn fetch(&self, owner_id: &str, id: Uuid) -> Result<Option<Dataset>>;
}

/// In-memory dataset store
///
/// Backs the server by default and keeps tests hermetic. Contents live for
/// the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    datasets: RwLock<HashMap<Uuid, Dataset>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DatasetStore for MemoryStore {
    async fn insert(&self, dataset: NewDataset) -> Result<Dataset> {
        let dataset = Dataset {
            id: Uuid::new_v4(),
            filename: dataset.filename,
            uploaded_at: Utc::now(),
            domain: dataset.domain,
            records: dataset.records,
            analysis: dataset.analysis,
            metadata: dataset.metadata,
            owner_id: dataset.owner_id,
        };

        let mut datasets = self.datasets.write().await;
        datasets.insert(dataset.id, dataset.clone());
        Ok(dataset)
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<DatasetSummary>> {
        let datasets = self.datasets.read().await;
        let mut summaries: Vec<DatasetSummary> = datasets
            .values()
            .filter(|d| d.owner_id == owner_id)
            .map(DatasetSummary::from)
            .collect();
        summaries.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(summaries)
    }

    async fn fetch(&self, owner_id: &str, id: Uuid) -> Result<Option<Dataset>> {
        let datasets = self.datasets.read().await;
        Ok(datasets
            .get(&id)
            .filter(|d| d.owner_id == owner_id)
            .cloned())
    }
}
