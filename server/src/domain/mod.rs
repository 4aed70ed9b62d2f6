//! Domain Layer
//!
//! Contains the todo entity and core abstractions.
//! Nothing here knows about HTTP.

mod entity;
mod todo;

pub use entity::{DomainError, DomainResult, Entity};
pub use todo::{normalize_text, Todo, TodoDraft, TodoId};
