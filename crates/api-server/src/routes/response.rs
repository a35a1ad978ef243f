//! JSON body shared by the function endpoints

use serde::Serialize;
use todo_core::ops::PurgeReport;
use todo_core::task::TaskRecord;

/// `success` carries the outcome; backend failures still answer 200.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_todos: Option<Vec<TaskRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<PurgeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FunctionResponse {
    fn new(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
            updated_todos: None,
            deleted: None,
            error: None,
        }
    }

    pub fn reordered(updated: Vec<TaskRecord>) -> Self {
        Self {
            updated_todos: Some(updated),
            ..Self::new(true, "Order fields updated successfully")
        }
    }

    pub fn purged(report: PurgeReport) -> Self {
        Self {
            deleted: Some(report),
            ..Self::new(true, "User deleted successfully")
        }
    }

    pub fn failure(message: impl Into<String>, error: &todo_core::Error) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(false, message)
        }
    }

    pub fn unsupported_action(action: Option<&str>) -> Self {
        let error = match action {
            Some(action) => format!(
                "Unknown action {:?}; expected reassignOrder or deleteUser",
                action
            ),
            None => "Missing action; expected reassignOrder or deleteUser".to_string(),
        };
        Self {
            error: Some(error),
            ..Self::new(false, "Unsupported action")
        }
    }
}
