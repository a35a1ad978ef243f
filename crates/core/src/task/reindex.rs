//! Status-grouped reindexing of task records
//!
//! Records are partitioned by [`TaskStatus`], concatenated in the fixed
//! category order and then renumbered in steps of a fixed offset.

use super::model::{TaskRecord, TaskStatus};
use crate::{Error, Result};

/// Increment between consecutive order values
pub const DEFAULT_ORDER_OFFSET: i64 = 100;

/// What to do with records whose status is not one of the known categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownStatusPolicy {
    /// Exclude them from the output
    #[default]
    Drop,
    /// Keep them, in input order, after the completed records
    Trailing,
}

/// Records partitioned by status category, each group in input order
#[derive(Debug, Clone, Default)]
pub struct StatusGroups {
    groups: [Vec<TaskRecord>; 4],
    unknown: Vec<TaskRecord>,
    policy: UnknownStatusPolicy,
}

impl StatusGroups {
    /// Records in the given category
    pub fn get(&self, status: TaskStatus) -> &[TaskRecord] {
        &self.groups[status.index()]
    }

    /// Records with an unrecognized status, kept only under
    /// [`UnknownStatusPolicy::Trailing`]
    pub fn unknown(&self) -> &[TaskRecord] {
        &self.unknown
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum::<usize>() + self.unknown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenate the groups: todo, doing, review, completed, then unknown
    pub fn flatten(self) -> Vec<TaskRecord> {
        let mut out = Vec::with_capacity(self.len());
        let mut groups = self.groups;
        for status in TaskStatus::ORDERED {
            out.append(&mut groups[status.index()]);
        }
        if self.policy == UnknownStatusPolicy::Trailing {
            out.extend(self.unknown);
        }
        out
    }
}

/// Partition records by status, preserving relative input order
pub fn group_by_status(
    records: impl IntoIterator<Item = TaskRecord>,
    policy: UnknownStatusPolicy,
) -> StatusGroups {
    let mut groups = StatusGroups {
        policy,
        ..Default::default()
    };

    for record in records {
        match record.category() {
            Some(status) => groups.groups[status.index()].push(record),
            None if policy == UnknownStatusPolicy::Trailing => groups.unknown.push(record),
            None => {
                tracing::debug!(
                    "Dropping task {} with unrecognized status {:?}",
                    record.id,
                    record.status
                );
            }
        }
    }

    groups
}

/// Assign `(i + 1) * offset` to the record at position `i`.
///
/// Fails without touching any record when the largest order value would not
/// fit in an `i64`.
pub fn reindex(
    records: impl IntoIterator<Item = TaskRecord>,
    offset: i64,
) -> Result<Vec<TaskRecord>> {
    let records: Vec<TaskRecord> = records.into_iter().collect();
    let count = i64::try_from(records.len()).unwrap_or(i64::MAX);
    if count > 0 && count.checked_mul(offset).is_none() {
        return Err(Error::InvalidInput(format!(
            "order offset {} overflows for {} records",
            offset, count
        )));
    }

    Ok(records
        .into_iter()
        .zip(1..)
        .map(|(mut record, position)| {
            record.order = position * offset;
            record
        })
        .collect())
}

/// Group by status, concatenate in category order and reindex.
///
/// `records` are expected in ascending order of their current order value,
/// as the repository returns them.
pub fn reorder(
    records: impl IntoIterator<Item = TaskRecord>,
    offset: i64,
    policy: UnknownStatusPolicy,
) -> Result<Vec<TaskRecord>> {
    reindex(group_by_status(records, policy).flatten(), offset)
}
