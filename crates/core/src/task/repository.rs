//! Task repository trait
//!
//! Defines the interface for task storage operations.

use async_trait::async_trait;

use super::model::TaskRecord;
use crate::Result;

/// Repository interface over the backend task collection
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// List every record owned by `user_id`, ascending by order value
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<TaskRecord>>;

    /// Persist a new order value and return the record as stored
    async fn update_order(&self, id: &str, order: i64) -> Result<TaskRecord>;

    /// Delete a record by ID
    async fn delete(&self, id: &str) -> Result<()>;
}
