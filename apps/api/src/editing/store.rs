//! Snapshot persistence port for the edit session.
//!
//! One fixed key holds the full serialized session; it is overwritten on every
//! edit and deleted on reset. Backends: Redis when `REDIS_URL` is configured,
//! a JSON file otherwise, and an in-memory store for tests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use redis::AsyncCommands;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

/// The single key every backend stores the session under.
pub const SNAPSHOT_KEY: &str = "editableResumeData";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load/save/clear interface injected into the edit session.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn load(&self) -> Result<Option<String>, StoreError>;
    async fn save(&self, serialized: &str) -> Result<(), StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Redis
// ────────────────────────────────────────────────────────────────────────────

pub struct RedisSnapshotStore {
    client: redis::Client,
}

impl RedisSnapshotStore {
    pub fn open(redis_url: &str) -> Result<Self, StoreError> {
        Ok(Self {
            client: redis::Client::open(redis_url)?,
        })
    }
}

#[async_trait]
impl SnapshotStore for RedisSnapshotStore {
    async fn load(&self) -> Result<Option<String>, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(SNAPSHOT_KEY).await?;
        Ok(value)
    }

    async fn save(&self, serialized: &str) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(SNAPSHOT_KEY, serialized).await?;
        debug!(bytes = serialized.len(), "Snapshot written to redis");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(SNAPSHOT_KEY).await?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// File
// ────────────────────────────────────────────────────────────────────────────

/// Stores the snapshot as `<dir>/editableResumeData.json`.
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{SNAPSHOT_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load(&self) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, serialized: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        // The snapshot on disk is only ever replaced whole.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serialized).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Memory
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemorySnapshotStore {
    value: Mutex<Option<String>>,
}

impl MemorySnapshotStore {
    pub fn with_value(serialized: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(serialized.into())),
        }
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.value.lock().await.clone())
    }

    async fn save(&self, serialized: &str) -> Result<(), StoreError> {
        *self.value.lock().await = Some(serialized.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.value.lock().await = None;
        Ok(())
    }
}
