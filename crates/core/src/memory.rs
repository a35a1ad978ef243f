//! In-memory backend
//!
//! Implements the task, user and file traits over process memory. Used for
//! local runs and tests; every successful mutation is appended to a journal.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tokio::sync::RwLock;

use crate::task::{TaskRecord, TaskRepository};
use crate::user::{FileStorage, User, UserDirectory};
use crate::{Error, Result};

/// A mutating call made against the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    UpdateOrder { id: String, order: i64 },
    DeleteTask { id: String },
    DeleteFile { bucket_id: String, file_id: String },
    DeleteUser { id: String },
}

/// Initial contents, as loaded from a JSON seed file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySeed {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    #[serde(default)]
    pub files: Vec<StoredFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub bucket_id: String,
    pub file_id: String,
}

#[derive(Default)]
struct MemoryState {
    tasks: Vec<TaskRecord>,
    users: HashMap<String, User>,
    files: BTreeSet<StoredFile>,
    journal: Vec<BackendCall>,
}

#[derive(Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: MemorySeed) -> Self {
        Self {
            state: RwLock::new(MemoryState {
                tasks: seed.tasks,
                users: seed.users.into_iter().map(|u| (u.id.clone(), u)).collect(),
                files: seed.files.into_iter().collect(),
                journal: Vec::new(),
            }),
        }
    }

    /// Load a seed file; a missing file yields an empty backend
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = tokio::fs::read_to_string(path).await?;
        let seed: MemorySeed = serde_json::from_str(&content)?;
        Ok(Self::from_seed(seed))
    }

    pub async fn insert_task(&self, task: TaskRecord) {
        self.state.write().await.tasks.push(task);
    }

    pub async fn insert_user(&self, user: User) {
        self.state.write().await.users.insert(user.id.clone(), user);
    }

    pub async fn insert_file(&self, bucket_id: impl Into<String>, file_id: impl Into<String>) {
        self.state.write().await.files.insert(StoredFile {
            bucket_id: bucket_id.into(),
            file_id: file_id.into(),
        });
    }

    pub async fn task(&self, id: &str) -> Option<TaskRecord> {
        let state = self.state.read().await;
        state.tasks.iter().find(|t| t.id == id).cloned()
    }

    pub async fn task_count(&self) -> usize {
        self.state.read().await.tasks.len()
    }

    pub async fn has_user(&self, id: &str) -> bool {
        self.state.read().await.users.contains_key(id)
    }

    pub async fn has_file(&self, bucket_id: &str, file_id: &str) -> bool {
        let state = self.state.read().await;
        state.files.iter().any(|f| f.bucket_id == bucket_id && f.file_id == file_id)
    }

    /// Mutating calls in the order they succeeded
    pub async fn journal(&self) -> Vec<BackendCall> {
        self.state.read().await.journal.clone()
    }
}

#[async_trait]
impl TaskRepository for MemoryBackend {
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<TaskRecord>> {
        let state = self.state.read().await;
        let mut tasks: Vec<TaskRecord> = state
            .tasks
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.order);
        Ok(tasks)
    }

    async fn update_order(&self, id: &str, order: i64) -> Result<TaskRecord> {
        let mut state = self.state.write().await;
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("task {}", id)))?;
        task.order = order;
        let updated = task.clone();
        state.journal.push(BackendCall::UpdateOrder {
            id: id.to_string(),
            order,
        });
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != id);
        if state.tasks.len() == before {
            return Err(Error::NotFound(format!("task {}", id)));
        }
        state.journal.push(BackendCall::DeleteTask { id: id.to_string() });
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for MemoryBackend {
    async fn get(&self, user_id: &str) -> Result<User> {
        let state = self.state.read().await;
        state
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("user {}", user_id)))
    }

    async fn delete(&self, user_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if state.users.remove(user_id).is_none() {
            return Err(Error::NotFound(format!("user {}", user_id)));
        }
        state.journal.push(BackendCall::DeleteUser {
            id: user_id.to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl FileStorage for MemoryBackend {
    async fn delete_file(&self, bucket_id: &str, file_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let key = StoredFile {
            bucket_id: bucket_id.to_string(),
            file_id: file_id.to_string(),
        };
        if !state.files.remove(&key) {
            return Err(Error::NotFound(format!("file {} in bucket {}", file_id, bucket_id)));
        }
        state.journal.push(BackendCall::DeleteFile {
            bucket_id: key.bucket_id,
            file_id: key.file_id,
        });
        Ok(())
    }
}
