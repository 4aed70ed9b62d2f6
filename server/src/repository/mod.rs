//! Repository Layer
//!
//! Data access abstractions and implementations.

mod db;
mod live;
mod memory;
mod todo_repo;
mod traits;

#[cfg(test)]
mod tests;

pub use db::{init_db, DbState, MEMORY_PATH};
pub use live::SnapshotPublisher;
pub use memory::InMemoryTodoRepository;
pub use todo_repo::SqliteTodoRepository;
pub use traits::{LiveQuery, Repository, TodoStore};
