//! Todo Entity
//!
//! A single short text entry with a completion flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::Entity;

/// Opaque identifier assigned by the store on creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TodoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TodoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored todo item.
///
/// `created_at` is stamped once by the store. Every write, including a bare
/// completion toggle, refreshes `updated_at` instead, so ordering by creation
/// time stays stable across edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub todo: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Build a freshly inserted todo from its draft
    pub fn from_draft(id: TodoId, draft: TodoDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            todo: draft.todo,
            is_completed: draft.is_completed,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the mutable fields, keeping id and creation stamp
    pub fn overwrite(&mut self, draft: TodoDraft, now: DateTime<Utc>) {
        self.todo = draft.todo;
        self.is_completed = draft.is_completed;
        self.updated_at = now;
    }
}

impl Entity for Todo {
    type Id = TodoId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Caller-supplied fields for a create or a full overwrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub todo: String,
    pub is_completed: bool,
}

impl TodoDraft {
    pub fn new(todo: impl Into<String>) -> Self {
        Self {
            todo: normalize_text(&todo.into()).to_string(),
            is_completed: false,
        }
    }

    pub fn completed(mut self, is_completed: bool) -> Self {
        self.is_completed = is_completed;
        self
    }
}

/// Stored text is always trimmed
pub fn normalize_text(text: &str) -> &str {
    text.trim()
}
