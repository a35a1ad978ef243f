//! User model definitions

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Preference key holding the avatar file reference
pub const AVATAR_PREF_KEY: &str = "avatar";

/// A user account as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub prefs: Map<String, Value>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            prefs: Map::new(),
        }
    }

    /// Set a preference value
    pub fn with_pref(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.prefs.insert(key.into(), value.into());
        self
    }

    /// Set the avatar file reference
    pub fn with_avatar(self, file_id: impl Into<String>) -> Self {
        self.with_pref(AVATAR_PREF_KEY, file_id.into())
    }

    /// The avatar file ID stored in preferences, if any
    pub fn avatar_file_id(&self) -> Option<&str> {
        self.prefs
            .get(AVATAR_PREF_KEY)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}
