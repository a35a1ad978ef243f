//! User and file storage traits

use async_trait::async_trait;

use super::model::User;
use crate::Result;

/// Access to user accounts
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Get a user by ID
    async fn get(&self, user_id: &str) -> Result<User>;

    /// Delete a user account
    async fn delete(&self, user_id: &str) -> Result<()>;
}

/// Access to stored files
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Delete a file from a bucket
    async fn delete_file(&self, bucket_id: &str, file_id: &str) -> Result<()>;
}
