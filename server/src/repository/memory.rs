//! In-memory todo store.
//!
//! Same contract as the SQLite store; used with `--store memory` and as the
//! fake backend in gateway tests.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{watch, Mutex};

use super::live::SnapshotPublisher;
use super::traits::{LiveQuery, Repository};
use crate::domain::{DomainError, DomainResult, Todo, TodoDraft, TodoId};

pub struct InMemoryTodoRepository {
    /// Insertion order
    todos: Mutex<Vec<Todo>>,
    publisher: SnapshotPublisher<Todo>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self {
            todos: Mutex::new(Vec::new()),
            publisher: SnapshotPublisher::new(Vec::new()),
        }
    }
}

impl Default for InMemoryTodoRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Newest first; equal stamps fall back to reverse insertion order
fn ordered(todos: &[Todo]) -> Vec<Todo> {
    let mut snapshot: Vec<Todo> = todos.iter().rev().cloned().collect();
    snapshot.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    snapshot
}

#[async_trait]
impl Repository<Todo> for InMemoryTodoRepository {
    type Draft = TodoDraft;

    async fn create(&self, draft: TodoDraft) -> DomainResult<Todo> {
        let mut todos = self.todos.lock().await;
        let todo = Todo::from_draft(TodoId::generate(), draft, Utc::now());
        todos.push(todo.clone());
        self.publisher.publish(ordered(&todos));
        Ok(todo)
    }

    async fn find_by_id(&self, id: &TodoId) -> DomainResult<Option<Todo>> {
        let todos = self.todos.lock().await;
        Ok(todos.iter().find(|t| &t.id == id).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<Todo>> {
        let todos = self.todos.lock().await;
        Ok(ordered(&todos))
    }

    async fn update(&self, id: &TodoId, draft: TodoDraft) -> DomainResult<Todo> {
        let mut todos = self.todos.lock().await;
        let todo = todos
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("todo {}", id)))?;
        todo.overwrite(draft, Utc::now());
        let updated = todo.clone();
        self.publisher.publish(ordered(&todos));
        Ok(updated)
    }

    async fn delete(&self, id: &TodoId) -> DomainResult<()> {
        let mut todos = self.todos.lock().await;
        let before = todos.len();
        todos.retain(|t| &t.id != id);
        if todos.len() != before {
            self.publisher.publish(ordered(&todos));
        }
        Ok(())
    }
}

impl LiveQuery<Todo> for InMemoryTodoRepository {
    fn subscribe(&self) -> watch::Receiver<Vec<Todo>> {
        self.publisher.subscribe()
    }
}
