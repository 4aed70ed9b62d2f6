//! Todo Repository Implementation
//!
//! SQLite-backed implementation of Repository<Todo> with a live snapshot feed.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

use super::live::SnapshotPublisher;
use super::traits::{LiveQuery, Repository};
use crate::domain::{DomainError, DomainResult, Todo, TodoDraft, TodoId};

const SELECT_COLUMNS: &str = "SELECT id, todo, is_completed, created_at, updated_at FROM todos";

/// SQLite implementation of the todo store
pub struct SqliteTodoRepository {
    conn: Arc<Mutex<Connection>>,
    publisher: SnapshotPublisher<Todo>,
}

impl SqliteTodoRepository {
    /// Wrap a migrated connection and seed the live feed with its contents
    pub async fn new(conn: Arc<Mutex<Connection>>) -> DomainResult<Self> {
        let initial = {
            let guard = conn.lock().await;
            query_all(&guard)?
        };
        Ok(Self {
            conn,
            publisher: SnapshotPublisher::new(initial),
        })
    }

    /// Push the post-write state to subscribers
    fn publish_from(&self, conn: &Connection) {
        match query_all(conn) {
            Ok(snapshot) => self.publisher.publish(snapshot),
            Err(e) => tracing::warn!(error = %e, "failed to refresh live snapshot"),
        }
    }
}

#[async_trait]
impl Repository<Todo> for SqliteTodoRepository {
    type Draft = TodoDraft;

    async fn create(&self, draft: TodoDraft) -> DomainResult<Todo> {
        let conn = self.conn.lock().await;

        // Column precision is microseconds
        let now = Utc::now().trunc_subsecs(6);
        let todo = Todo::from_draft(TodoId::generate(), draft, now);
        conn.execute(
            "INSERT INTO todos (id, todo, is_completed, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                todo.id.as_str(),
                todo.todo,
                todo.is_completed,
                todo.created_at.timestamp_micros(),
                todo.updated_at.timestamp_micros(),
            ],
        )?;

        self.publish_from(&conn);
        Ok(todo)
    }

    async fn find_by_id(&self, id: &TodoId) -> DomainResult<Option<Todo>> {
        let conn = self.conn.lock().await;
        find_row(&conn, id)
    }

    async fn list(&self) -> DomainResult<Vec<Todo>> {
        let conn = self.conn.lock().await;
        query_all(&conn)
    }

    async fn update(&self, id: &TodoId, draft: TodoDraft) -> DomainResult<Todo> {
        let conn = self.conn.lock().await;

        let changed = conn.execute(
            "UPDATE todos SET todo = ?1, is_completed = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                draft.todo,
                draft.is_completed,
                Utc::now().timestamp_micros(),
                id.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("todo {}", id)));
        }

        let updated = find_row(&conn, id)?
            .ok_or_else(|| DomainError::NotFound(format!("todo {}", id)))?;
        self.publish_from(&conn);
        Ok(updated)
    }

    async fn delete(&self, id: &TodoId) -> DomainResult<()> {
        let conn = self.conn.lock().await;

        let changed = conn.execute("DELETE FROM todos WHERE id = ?1", params![id.as_str()])?;
        if changed > 0 {
            self.publish_from(&conn);
        }
        Ok(())
    }
}

impl LiveQuery<Todo> for SqliteTodoRepository {
    fn subscribe(&self) -> watch::Receiver<Vec<Todo>> {
        self.publisher.subscribe()
    }
}

fn find_row(conn: &Connection, id: &TodoId) -> DomainResult<Option<Todo>> {
    let row = conn
        .query_row(
            &format!("{} WHERE id = ?1", SELECT_COLUMNS),
            params![id.as_str()],
            read_row,
        )
        .optional()?;
    row.transpose()
}

/// Whole collection, newest first
fn query_all(conn: &Connection) -> DomainResult<Vec<Todo>> {
    let mut stmt = conn.prepare(&format!(
        "{} ORDER BY created_at DESC, seq DESC",
        SELECT_COLUMNS
    ))?;
    let rows = stmt.query_map([], read_row)?;

    let mut todos = Vec::new();
    for row in rows {
        todos.push(row??);
    }
    Ok(todos)
}

/// Timestamp decoding can fail independently of the SQL read
fn read_row(row: &Row<'_>) -> rusqlite::Result<DomainResult<Todo>> {
    let id: String = row.get(0)?;
    let todo: String = row.get(1)?;
    let is_completed: bool = row.get(2)?;
    let created_at: i64 = row.get(3)?;
    let updated_at: i64 = row.get(4)?;

    Ok(build_todo(id, todo, is_completed, created_at, updated_at))
}

fn build_todo(
    id: String,
    todo: String,
    is_completed: bool,
    created_at: i64,
    updated_at: i64,
) -> DomainResult<Todo> {
    Ok(Todo {
        id: TodoId::from(id),
        todo,
        is_completed,
        created_at: from_micros(created_at)?,
        updated_at: from_micros(updated_at)?,
    })
}

fn from_micros(micros: i64) -> DomainResult<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| DomainError::Internal(format!("timestamp out of range: {}", micros)))
}
