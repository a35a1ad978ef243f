//! Account purge: avatar, tasks, then the user record

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::task::TaskRepository;
use crate::user::{FileStorage, UserDirectory};
use crate::{Error, Result};

/// Action requested of the account endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountAction {
    ReassignOrder,
    DeleteUser,
}

impl AccountAction {
    /// Parse the query-string value; matching is exact
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "reassignOrder" => Some(Self::ReassignOrder),
            "deleteUser" => Some(Self::DeleteUser),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReassignOrder => "reassignOrder",
            Self::DeleteUser => "deleteUser",
        }
    }
}

/// What a completed purge removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeReport {
    pub avatar_deleted: bool,
    pub tasks_deleted: usize,
}

/// Delete a user's avatar file, every task they own and finally the account.
///
/// `bucket_id` is only required when the user has an avatar reference.
pub async fn purge_account(
    users: &dyn UserDirectory,
    files: &dyn FileStorage,
    tasks: &dyn TaskRepository,
    bucket_id: Option<&str>,
    user_id: &str,
) -> Result<PurgeReport> {
    let mut report = PurgeReport::default();
    let user = users.get(user_id).await?;

    if let Some(file_id) = user.avatar_file_id() {
        let bucket_id = bucket_id
            .ok_or_else(|| Error::Config("storage bucket ID is not configured".into()))?;
        debug!("Deleting avatar {} from bucket {}", file_id, bucket_id);
        files.delete_file(bucket_id, file_id).await?;
        report.avatar_deleted = true;
    }

    for task in tasks.list_for_user(user_id).await? {
        debug!("Deleting task {}", task.id);
        tasks.delete(&task.id).await?;
        report.tasks_deleted += 1;
    }

    users.delete(user_id).await?;

    info!(
        "Purged user {:?}: avatar_deleted={}, tasks_deleted={}",
        user_id, report.avatar_deleted, report.tasks_deleted
    );
    Ok(report)
}
