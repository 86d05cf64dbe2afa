//! Pool lookup history.
//!
//! An ordered, append-only list of successful pool lookups. Duplicates are
//! kept; nothing is ever removed.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::{
    error::{AppError, Result},
    types::PoolRecord,
};

/// Storage for pool lookup history.
#[async_trait]
pub trait PoolHistoryStore: Send + Sync {
    /// Append a record to the end of the history.
    async fn append(&self, record: PoolRecord) -> Result<()>;
    /// All records in insertion order.
    async fn list(&self) -> Result<Vec<PoolRecord>>;
}

/// History kept as a JSON array in a file.
///
/// Writers inside this process are serialized; a concurrent writer in another
/// process can still overwrite an append (last write wins).
pub struct JsonFileHistory {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<PoolRecord>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::Storage(format!("corrupt pool history {}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl PoolHistoryStore for JsonFileHistory {
    async fn append(&self, record: PoolRecord) -> Result<()> {
        let _guard = self.lock.lock().await;

        let mut records = self.read().await?;
        records.push(record);

        let json = serde_json::to_vec_pretty(&records)?;
        tokio::fs::write(&self.path, json).await?;

        tracing::debug!(
            path = %self.path.display(),
            entries = records.len(),
            "Pool history updated"
        );
        Ok(())
    }

    async fn list(&self) -> Result<Vec<PoolRecord>> {
        let _guard = self.lock.lock().await;
        self.read().await
    }
}

/// History kept in memory only.
#[derive(Default)]
pub struct MemoryHistory {
    records: Mutex<Vec<PoolRecord>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PoolHistoryStore for MemoryHistory {
    async fn append(&self, record: PoolRecord) -> Result<()> {
        self.records.lock().await.push(record);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<PoolRecord>> {
        Ok(self.records.lock().await.clone())
    }
}
