//! Document storage for tasks.
//!
//! Tasks live as JSON documents under `task:{uuid}` keys. [`TaskStore`] is
//! the seam between the handlers and the storage layer: [`RedisTaskStore`]
//! is the production implementation, [`MemoryTaskStore`] backs the API tests
//! and redis-less development runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use shared::Task;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Failures below the handler layer: connectivity and undecodable documents.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A stored document no longer parses as a task.
    #[error("corrupt task document: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Async CRUD over the task collection.
///
/// `put` upserts: creating and rewriting a task are both a single document
/// write, matching redis `SET` semantics.
#[async_trait]
pub trait TaskStore: Send + Sync + 'static {
    async fn put(&self, task: &Task) -> Result<(), StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<Task>, StoreError>;
    async fn list(&self) -> Result<Vec<Task>, StoreError>;
    /// Remove a task, returning its last state when it existed.
    async fn remove(&self, id: Uuid) -> Result<Option<Task>, StoreError>;
}

/// Store handle shared across handlers.
pub type DynTaskStore = Arc<dyn TaskStore>;

fn task_key(id: Uuid) -> String {
    format!("task:{id}")
}

/// Redis-backed store: one JSON string per task.
#[derive(Clone)]
pub struct RedisTaskStore {
    client: Client,
}

impl RedisTaskStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TaskStore for RedisTaskStore {
    async fn put(&self, task: &Task) -> Result<(), StoreError> {
        let mut conn = self.client.get_async_connection().await?;
        let doc = serde_json::to_string(task)?;
        let _: () = conn.set(task_key(task.id), doc).await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let mut conn = self.client.get_async_connection().await?;
        let doc: Option<String> = conn.get(task_key(id)).await?;
        match doc {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        let mut conn = self.client.get_async_connection().await?;
        let keys: Vec<String> = conn.keys("task:*").await?;
        let mut tasks = Vec::with_capacity(keys.len());
        for key in keys {
            // A key can vanish between KEYS and GET; skip it instead of failing
            // the whole listing.
            let doc: Option<String> = conn.get(&key).await?;
            if let Some(doc) = doc {
                tasks.push(serde_json::from_str(&doc)?);
            }
        }
        Ok(tasks)
    }

    async fn remove(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let mut conn = self.client.get_async_connection().await?;
        let key = task_key(id);
        let doc: Option<String> = conn.get(&key).await?;
        let Some(doc) = doc else {
            return Ok(None);
        };
        let task: Task = serde_json::from_str(&doc)?;
        let _: () = conn.del(key).await?;
        Ok(Some(task))
    }
}

/// In-memory store for tests and for running without redis.
#[derive(Clone, Default)]
pub struct MemoryTaskStore {
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn put(&self, task: &Task) -> Result<(), StoreError> {
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.tasks.read().await.values().cloned().collect())
    }

    async fn remove(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.write().await.remove(&id))
    }
}
