//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::{DomainResult, Entity, Todo, TodoDraft};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Caller-supplied fields for create and overwrite
    type Draft: Send + Sync + 'static;

    /// Insert a new entity; the store assigns id and timestamps
    async fn create(&self, draft: Self::Draft) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: &T::Id) -> DomainResult<Option<T>>;

    /// List all entities, newest first
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Overwrite an existing entity. Fails with `NotFound` if the id is absent.
    async fn update(&self, id: &T::Id, draft: Self::Draft) -> DomainResult<T>;

    /// Delete entity by ID. Deleting an absent id is not an error.
    async fn delete(&self, id: &T::Id) -> DomainResult<()>;
}

/// Live query over the whole collection.
///
/// Receivers always observe the full current snapshot; dropping the receiver
/// cancels the subscription.
pub trait LiveQuery<T>: Send + Sync {
    fn subscribe(&self) -> watch::Receiver<Vec<T>>;
}

/// Everything the gateway needs from a todo backend
pub trait TodoStore: Repository<Todo, Draft = TodoDraft> + LiveQuery<Todo> {}

impl<S> TodoStore for S where S: Repository<Todo, Draft = TodoDraft> + LiveQuery<Todo> {}
