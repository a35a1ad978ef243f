//! Reassign order values for a user's tasks

use tracing::{debug, info};

use crate::task::{reorder, TaskRecord, TaskRepository, UnknownStatusPolicy, DEFAULT_ORDER_OFFSET};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderOptions {
    pub offset: i64,
    pub unknown_status: UnknownStatusPolicy,
}

impl Default for ReorderOptions {
    fn default() -> Self {
        Self {
            offset: DEFAULT_ORDER_OFFSET,
            unknown_status: UnknownStatusPolicy::default(),
        }
    }
}

/// Fetch the user's tasks, reindex them and write each new order back.
///
/// Returns the records as the backend reported them after each update, in
/// write order.
pub async fn reassign_order(
    tasks: &dyn TaskRepository,
    user_id: &str,
    options: ReorderOptions,
) -> Result<Vec<TaskRecord>> {
    if options.offset <= 0 {
        return Err(Error::InvalidInput(format!(
            "order offset must be positive, got {}",
            options.offset
        )));
    }

    let fetched = tasks.list_for_user(user_id).await?;
    let fetched_count = fetched.len();
    let reordered = reorder(fetched, options.offset, options.unknown_status)?;

    info!(
        "Reassigning order for user {:?}: {} fetched, {} to update",
        user_id,
        fetched_count,
        reordered.len()
    );

    let mut updated = Vec::with_capacity(reordered.len());
    for record in reordered {
        debug!("Setting order of task {} to {}", record.id, record.order);
        updated.push(tasks.update_order(&record.id, record.order).await?);
    }

    Ok(updated)
}
