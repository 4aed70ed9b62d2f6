//! Repository Integration Tests
//!
//! The same contract checks run against the SQLite (in-memory database) and
//! the in-memory store.

#[cfg(test)]
mod tests {
    use crate::domain::{DomainError, TodoDraft, TodoId};
    use crate::repository::{
        init_db, InMemoryTodoRepository, LiveQuery, Repository, SqliteTodoRepository, TodoStore,
    };
    use std::path::PathBuf;
    use std::time::Duration;

    async fn setup_sqlite() -> SqliteTodoRepository {
        // Use in-memory database for tests
        let db_state = init_db(&PathBuf::from(":memory:")).expect("Failed to init test DB");
        SqliteTodoRepository::new(db_state.connection())
            .await
            .expect("Failed to open repository")
    }

    async fn check_create_and_list(repo: &dyn TodoStore) {
        let created = repo.create(TodoDraft::new("  Test  ")).await.expect("Failed to create");
        assert_eq!(created.todo, "Test");
        assert!(!created.is_completed);
        assert_eq!(created.created_at, created.updated_at);

        let todos = repo.list().await.expect("List failed");
        assert_eq!(todos, vec![created]);
    }

    async fn check_newest_first(repo: &dyn TodoStore) {
        let first = repo.create(TodoDraft::new("First")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
        let second = repo.create(TodoDraft::new("Second")).await.unwrap();

        let ids: Vec<TodoId> = repo.list().await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    async fn check_update_keeps_order(repo: &dyn TodoStore) {
        let older = repo.create(TodoDraft::new("Older")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
        let newer = repo.create(TodoDraft::new("Newer")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;

        let updated = repo
            .update(&older.id, TodoDraft::new("Older, edited").completed(true))
            .await
            .expect("Update failed");
        assert_eq!(updated.todo, "Older, edited");
        assert!(updated.is_completed);
        assert_eq!(updated.created_at, older.created_at);
        assert!(updated.updated_at > older.updated_at);

        let ids: Vec<TodoId> = repo.list().await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    async fn check_update_missing(repo: &dyn TodoStore) {
        let result = repo.update(&TodoId::from("nope"), TodoDraft::new("x")).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    async fn check_delete(repo: &dyn TodoStore) {
        let created = repo.create(TodoDraft::new("To delete")).await.unwrap();

        repo.delete(&created.id).await.expect("Delete failed");
        assert!(repo.find_by_id(&created.id).await.unwrap().is_none());

        // absent ids are a no-op
        repo.delete(&created.id).await.expect("Second delete failed");
    }

    async fn check_live_snapshots(repo: &dyn TodoStore) {
        let mut rx = repo.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        let created = repo.create(TodoDraft::new("Live")).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), vec![created.clone()]);

        repo.update(&created.id, TodoDraft::new("Live").completed(true)).await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update()[0].is_completed);

        repo.delete(&created.id).await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_create_and_list() {
        check_create_and_list(&setup_sqlite().await).await;
    }

    #[tokio::test]
    async fn test_sqlite_newest_first() {
        check_newest_first(&setup_sqlite().await).await;
    }

    #[tokio::test]
    async fn test_sqlite_update_keeps_order() {
        check_update_keeps_order(&setup_sqlite().await).await;
    }

    #[tokio::test]
    async fn test_sqlite_update_missing() {
        check_update_missing(&setup_sqlite().await).await;
    }

    #[tokio::test]
    async fn test_sqlite_delete() {
        check_delete(&setup_sqlite().await).await;
    }

    #[tokio::test]
    async fn test_sqlite_live_snapshots() {
        check_live_snapshots(&setup_sqlite().await).await;
    }

    #[tokio::test]
    async fn test_sqlite_reopen_seeds_feed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.db");
        {
            let db = init_db(&path).unwrap();
            let repo = SqliteTodoRepository::new(db.connection()).await.unwrap();
            repo.create(TodoDraft::new("Persisted")).await.unwrap();
        }

        let db = init_db(&path).unwrap();
        let repo = SqliteTodoRepository::new(db.connection()).await.unwrap();
        let rx = repo.subscribe();
        assert_eq!(rx.borrow()[0].todo, "Persisted");
    }

    #[tokio::test]
    async fn test_memory_create_and_list() {
        check_create_and_list(&InMemoryTodoRepository::new()).await;
    }

    #[tokio::test]
    async fn test_memory_newest_first() {
        check_newest_first(&InMemoryTodoRepository::new()).await;
    }

    #[tokio::test]
    async fn test_memory_update_keeps_order() {
        check_update_keeps_order(&InMemoryTodoRepository::new()).await;
    }

    #[tokio::test]
    async fn test_memory_update_missing() {
        check_update_missing(&InMemoryTodoRepository::new()).await;
    }

    #[tokio::test]
    async fn test_memory_delete() {
        check_delete(&InMemoryTodoRepository::new()).await;
    }

    #[tokio::test]
    async fn test_memory_live_snapshots() {
        check_live_snapshots(&InMemoryTodoRepository::new()).await;
    }
}
