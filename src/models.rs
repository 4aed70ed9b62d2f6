//! Frontend Models
//!
//! Data structures matching backend entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque store-assigned id
pub type TodoId = String;

/// Todo data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub todo: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
impl Todo {
    pub fn new(id: impl Into<TodoId>, todo: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            todo: todo.into(),
            is_completed: false,
            created_at: None,
            updated_at: None,
        }
    }
}
