//! List queries in the backend's JSON query syntax

use serde_json::{json, Value};

/// A single list filter, sort or pagination query
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Equal { attribute: String, values: Vec<Value> },
    OrderAsc(String),
    Limit(usize),
    CursorAfter(String),
}

impl Query {
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equal {
            attribute: attribute.into(),
            values: vec![value.into()],
        }
    }

    pub fn order_asc(attribute: impl Into<String>) -> Self {
        Self::OrderAsc(attribute.into())
    }

    pub fn limit(limit: usize) -> Self {
        Self::Limit(limit)
    }

    pub fn cursor_after(document_id: impl Into<String>) -> Self {
        Self::CursorAfter(document_id.into())
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Equal { attribute, values } => json!({
                "method": "equal",
                "attribute": attribute,
                "values": values,
            }),
            Self::OrderAsc(attribute) => json!({
                "method": "orderAsc",
                "attribute": attribute,
            }),
            Self::Limit(limit) => json!({
                "method": "limit",
                "values": [limit],
            }),
            Self::CursorAfter(id) => json!({
                "method": "cursorAfter",
                "values": [id],
            }),
        }
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_value())
    }
}
