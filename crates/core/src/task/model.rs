//! Task model definitions

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Status category of a task record.
///
/// Declaration order is the order categories appear in after reindexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Todo,
    Doing,
    Review,
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Todo
    }
}

impl TaskStatus {
    /// All categories in their fixed declaration order
    pub const ORDERED: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::Doing,
        TaskStatus::Review,
        TaskStatus::Completed,
    ];

    /// Parse a stored status, ignoring case and surrounding whitespace
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "todo" => Some(Self::Todo),
            "doing" => Some(Self::Doing),
            "review" => Some(Self::Review),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Review => "review",
            Self::Completed => "completed",
        }
    }

    /// Position of this category in [`TaskStatus::ORDERED`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// A task record as stored in the backend collection.
///
/// Only the fields the reorder logic needs are typed; every other attribute
/// the backend returns is carried in `attributes` so responses echo the
/// record unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub order: i64,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Unset integer attributes come back as `null`
fn null_as_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or_default())
}

impl TaskRecord {
    /// Create a new record owned by `user_id`
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            status: TaskStatus::default().as_str().to_string(),
            order: 0,
            attributes: Map::new(),
        }
    }

    /// Set the raw status string
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Set the order value
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    /// Set an additional backend attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The status category, or `None` when the stored status is not recognized
    pub fn category(&self) -> Option<TaskStatus> {
        TaskStatus::parse(&self.status)
    }
}
