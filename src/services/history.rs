//! Prediction history storage
//!
//! Postgres when a database is configured, otherwise an in-process store
//! that lives as long as the server does.

use async_trait::async_trait;
use sqlx::PgPool;
use std::fmt;
use std::sync::RwLock;
use uuid::Uuid;

use crate::domain::predictions;
use crate::models::{PredictionRecord, StoredPrediction};
use crate::policy::Verdict;

#[derive(Debug)]
pub enum StoreError {
    Database(sqlx::Error),
    /// Stored row could not be turned back into a record
    InvalidRow(String),
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Database(e) => write!(f, "database error: {e}"),
            StoreError::InvalidRow(msg) => write!(f, "invalid stored prediction: {msg}"),
            StoreError::Backend(msg) => write!(f, "storage backend error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e)
    }
}

/// Append-only store of completed predictions
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persist one record and return the id the store assigned to it
    async fn append(&self, record: &PredictionRecord) -> Result<String, StoreError>;

    /// Every stored record, in no particular order
    async fn list_all(&self) -> Result<Vec<StoredPrediction>, StoreError>;
}

pub struct PgHistoryStore {
    db: PgPool,
}

impl PgHistoryStore {
    /// Wrap the pool, creating the predictions table on first use
    pub async fn new(db: PgPool) -> Result<Self, StoreError> {
        predictions::ensure_table(&db).await?;
        Ok(Self { db })
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn append(&self, record: &PredictionRecord) -> Result<String, StoreError> {
        let storage_id = predictions::insert_prediction(
            &self.db,
            record.id,
            record.result.as_str(),
            &record.suggestion,
            record.created_at,
        )
        .await?;

        Ok(storage_id.to_string())
    }

    async fn list_all(&self) -> Result<Vec<StoredPrediction>, StoreError> {
        predictions::list_predictions(&self.db)
            .await?
            .into_iter()
            .map(|row| -> Result<StoredPrediction, StoreError> {
                let result = row.result.parse::<Verdict>().map_err(StoreError::InvalidRow)?;
                Ok(StoredPrediction {
                    id: row.storage_id.to_string(),
                    history: PredictionRecord {
                        id: row.prediction_id,
                        result,
                        suggestion: row.suggestion,
                        created_at: row.created_at,
                    },
                })
            })
            .collect()
    }
}

/// In-process store; ids are random UUIDs, independent of the record ids
#[derive(Default)]
pub struct MemoryHistoryStore {
    entries: RwLock<Vec<StoredPrediction>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, record: &PredictionRecord) -> Result<String, StoreError> {
        let storage_id = Uuid::new_v4().to_string();
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        entries.push(StoredPrediction {
            id: storage_id.clone(),
            history: record.clone(),
        });

        Ok(storage_id)
    }

    async fn list_all(&self) -> Result<Vec<StoredPrediction>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::decide;

    #[tokio::test]
    async fn test_memory_store_starts_empty() {
        let store = MemoryHistoryStore::new();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryHistoryStore::new();
        let cancer = PredictionRecord::new(decide(0.9));
        let clear = PredictionRecord::new(decide(0.1));

        let cancer_storage_id = store.append(&cancer).await.unwrap();
        let clear_storage_id = store.append(&clear).await.unwrap();
        assert_ne!(cancer_storage_id, clear_storage_id);
        assert_ne!(cancer_storage_id, cancer.id.to_string());

        let listed = store.list_all().await.unwrap();
        assert_eq!(listed.len(), 2);

        let stored = listed
            .iter()
            .find(|entry| entry.id == cancer_storage_id)
            .expect("appended record is listed");
        assert_eq!(stored.history, cancer);
        assert!(listed.iter().any(|entry| entry.id == clear_storage_id && entry.history == clear));
    }

    #[test]
    fn test_stored_prediction_serializes_as_history_entry() {
        let record = PredictionRecord::new(decide(0.2));
        let entry = StoredPrediction {
            id: "42".to_string(),
            history: record.clone(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], "42");
        assert_eq!(json["history"]["id"], record.id.to_string());
        assert_eq!(json["history"]["result"], "Non-cancer");
        assert!(json["history"]["createdAt"].is_string());
    }
}
