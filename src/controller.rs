//! List View Controller
//!
//! Pure transitions over [`TodoListState`]. Nothing here touches the network:
//! each user action either changes local state or plans a [`Mutation`] for the
//! gateway, and [`TodoListState::settle`] runs once the gateway accepted it.
//! The item list itself only ever changes through [`TodoListState::apply_snapshot`].

use crate::models::{Todo, TodoId};
use crate::store::{TodoListState, Warning};

/// A write planned by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create {
        todo: String,
    },
    /// Submit while editing
    Edit {
        id: TodoId,
        todo: String,
        is_completed: bool,
    },
    Toggle {
        id: TodoId,
        todo: String,
        is_completed: bool,
    },
    Delete {
        id: TodoId,
    },
}

impl Mutation {
    /// Short name for log lines
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::Create { .. } => "create",
            Mutation::Edit { .. } => "edit",
            Mutation::Toggle { .. } => "toggle",
            Mutation::Delete { .. } => "delete",
        }
    }
}

fn same_text(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

impl TodoListState {
    /// Replace the cached list with a pushed snapshot
    pub fn apply_snapshot(&mut self, items: Vec<Todo>) {
        self.items = items;
    }

    /// Typing clears any warning
    pub fn set_input(&mut self, value: String) {
        self.input = value;
        self.warning = None;
    }

    /// Validate the composer and plan a create or edit.
    ///
    /// On rejection only the warning changes.
    pub fn plan_submit(&mut self) -> Option<Mutation> {
        self.warning = None;
        let text = self.input.trim();

        if text.is_empty() {
            self.warning = Some(Warning::EmptyTodo);
            return None;
        }
        if self.is_duplicate(text) {
            self.warning = Some(Warning::DuplicateTodo);
            return None;
        }

        let todo = text.to_string();
        Some(match &self.editing_id {
            Some(id) => Mutation::Edit {
                id: id.clone(),
                is_completed: self
                    .items
                    .iter()
                    .find(|t| &t.id == id)
                    .map(|t| t.is_completed)
                    .unwrap_or(false),
                todo,
            },
            None => Mutation::Create { todo },
        })
    }

    /// Matches another item's text, ignoring the one being edited
    pub fn is_duplicate(&self, text: &str) -> bool {
        self.items
            .iter()
            .any(|t| same_text(&t.todo, text) && self.editing_id.as_ref() != Some(&t.id))
    }

    pub fn start_edit(&mut self, item: &Todo) {
        self.editing_id = Some(item.id.clone());
        self.input = item.todo.clone();
        self.warning = None;
    }

    pub fn plan_toggle(&self, item: &Todo) -> Mutation {
        Mutation::Toggle {
            id: item.id.clone(),
            todo: item.todo.clone(),
            is_completed: !item.is_completed,
        }
    }

    pub fn plan_delete(&self, id: &TodoId) -> Mutation {
        Mutation::Delete { id: id.clone() }
    }

    /// Local follow-up once the gateway accepted `mutation`
    pub fn settle(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::Create { .. } => {
                self.input.clear();
            }
            Mutation::Edit { .. } => {
                self.editing_id = None;
                self.input.clear();
            }
            Mutation::Delete { id } => {
                // the edit target is gone
                if self.editing_id.as_ref() == Some(id) {
                    self.editing_id = None;
                    self.input.clear();
                }
            }
            Mutation::Toggle { .. } => {}
        }
    }

    /// Items shown under the current input, used as a substring filter
    pub fn visible_items(&self) -> Vec<Todo> {
        let needle = self.input.trim().to_lowercase();
        if needle.is_empty() {
            return self.items.clone();
        }
        self.items
            .iter()
            .filter(|t| t.todo.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::TodoGateway;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};
    use std::cell::{Cell, RefCell};

    fn state_with(items: &[(&str, &str)]) -> TodoListState {
        TodoListState {
            items: items.iter().map(|(id, text)| Todo::new(*id, *text)).collect(),
            ..Default::default()
        }
    }

    fn typed(mut state: TodoListState, input: &str) -> TodoListState {
        state.set_input(input.to_string());
        state
    }

    #[test]
    fn test_blank_input_is_rejected() {
        for input in ["", "   ", "\t\n"] {
            let mut state = typed(state_with(&[("1", "Buy milk")]), input);
            let before = state.items.clone();

            assert_eq!(state.plan_submit(), None);
            assert_eq!(state.warning, Some(Warning::EmptyTodo));
            assert_eq!(state.items, before);
            assert_eq!(state.input, input);
        }
    }

    #[test]
    fn test_duplicate_ignores_case_and_whitespace() {
        let mut state = typed(state_with(&[("1", "Buy milk")]), "  bUY MILK ");

        assert_eq!(state.plan_submit(), None);
        assert_eq!(state.warning, Some(Warning::DuplicateTodo));
        assert_eq!(state.warning.unwrap().message(), "Duplicate todo not allowed");
    }

    #[test]
    fn test_edit_may_keep_its_own_text() {
        let mut state = state_with(&[("1", "Buy milk"), ("2", "Walk dog")]);
        let item = state.items[0].clone();
        state.start_edit(&item);
        state.set_input("buy milk".to_string());

        assert_eq!(
            state.plan_submit(),
            Some(Mutation::Edit {
                id: "1".into(),
                todo: "buy milk".into(),
                is_completed: false,
            })
        );
    }

    #[test]
    fn test_edit_cannot_take_another_items_text() {
        let mut state = state_with(&[("1", "Buy milk"), ("2", "Walk dog")]);
        let item = state.items[0].clone();
        state.start_edit(&item);
        state.set_input("Walk Dog".to_string());

        assert_eq!(state.plan_submit(), None);
        assert_eq!(state.warning, Some(Warning::DuplicateTodo));
        assert_eq!(state.editing_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_edit_preserves_completion_flag() {
        let mut state = state_with(&[("1", "Buy milk")]);
        state.items[0].is_completed = true;
        let item = state.items[0].clone();
        state.start_edit(&item);
        state.set_input("Buy oat milk".to_string());

        match state.plan_submit() {
            Some(Mutation::Edit { is_completed, todo, .. }) => {
                assert!(is_completed);
                assert_eq!(todo, "Buy oat milk");
            }
            other => panic!("expected edit, got {:?}", other),
        }
    }

    #[test]
    fn test_submit_plans_trimmed_create() {
        let mut state = typed(state_with(&[]), "  Walk dog ");
        state.warning = Some(Warning::EmptyTodo);

        assert_eq!(
            state.plan_submit(),
            Some(Mutation::Create {
                todo: "Walk dog".into()
            })
        );
        assert_eq!(state.warning, None);
        // input is only cleared once the store accepted the write
        assert_eq!(state.input, "  Walk dog ");
    }

    #[test]
    fn test_settle_after_create_and_edit() {
        let mut state = typed(state_with(&[]), "Walk dog");
        let create = state.plan_submit().unwrap();
        state.settle(&create);
        assert_eq!(state.input, "");

        let mut state = state_with(&[("1", "Walk dog")]);
        let item = state.items[0].clone();
        state.start_edit(&item);
        let edit = state.plan_submit().unwrap();
        state.settle(&edit);
        assert_eq!(state.editing_id, None);
        assert_eq!(state.input, "");
    }

    #[test]
    fn test_start_edit_loads_text_and_clears_warning() {
        let mut state = state_with(&[("1", "Buy milk")]);
        state.warning = Some(Warning::DuplicateTodo);
        let item = state.items[0].clone();

        state.start_edit(&item);

        assert_eq!(state.editing_id.as_deref(), Some("1"));
        assert_eq!(state.input, "Buy milk");
        assert_eq!(state.warning, None);
        assert!(state.is_editing());
    }

    #[test]
    fn test_deleting_edit_target_leaves_edit_mode() {
        let mut state = state_with(&[("1", "Buy milk"), ("2", "Walk dog")]);
        let item = state.items[0].clone();
        state.start_edit(&item);

        let other = state.plan_delete(&"2".to_string());
        state.settle(&other);
        assert_eq!(state.editing_id.as_deref(), Some("1"));
        assert_eq!(state.input, "Buy milk");

        let target = state.plan_delete(&"1".to_string());
        state.settle(&target);
        assert_eq!(state.editing_id, None);
        assert_eq!(state.input, "");
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let state = typed(state_with(&[("1", "Buy milk"), ("2", "Walk dog")]), "buy");
        let visible: Vec<String> = state.visible_items().into_iter().map(|t| t.todo).collect();
        assert_eq!(visible, vec!["Buy milk".to_string()]);

        let state = typed(state_with(&[("1", "Buy milk"), ("2", "Walk dog")]), "");
        assert_eq!(state.visible_items(), state.items);

        let state = typed(state_with(&[("1", "Buy milk"), ("2", "Walk dog")]), "  DOG ");
        assert_eq!(state.visible_items().len(), 1);
    }

    #[test]
    fn test_snapshot_replaces_list() {
        let mut state = state_with(&[("1", "Buy milk"), ("2", "Walk dog")]);
        state.apply_snapshot(vec![Todo::new("3", "Read book")]);
        assert_eq!(state.items, vec![Todo::new("3", "Read book")]);
    }

    /// In-memory gateway that stamps writes with a strictly advancing clock
    #[derive(Default)]
    struct FakeGateway {
        todos: RefCell<Vec<Todo>>,
        next_id: Cell<u32>,
        tick: Cell<i64>,
        offline: Cell<bool>,
    }

    impl FakeGateway {
        fn now(&self) -> DateTime<Utc> {
            self.tick.set(self.tick.get() + 1);
            DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(self.tick.get())
        }

        fn check_online(&self) -> Result<(), String> {
            if self.offline.get() {
                Err("store offline".to_string())
            } else {
                Ok(())
            }
        }

        fn snapshot(&self) -> Vec<Todo> {
            let mut items = self.todos.borrow().clone();
            items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            items
        }
    }

    #[async_trait(?Send)]
    impl TodoGateway for FakeGateway {
        async fn list_todos(&self) -> Result<Vec<Todo>, String> {
            self.check_online()?;
            Ok(self.snapshot())
        }

        async fn create_todo(&self, todo: &str) -> Result<(), String> {
            self.check_online()?;
            self.next_id.set(self.next_id.get() + 1);
            let now = self.now();
            let mut item = Todo::new(self.next_id.get().to_string(), todo);
            item.created_at = Some(now);
            item.updated_at = Some(now);
            self.todos.borrow_mut().push(item);
            Ok(())
        }

        async fn update_todo(&self, id: &str, todo: &str, is_completed: bool) -> Result<(), String> {
            self.check_online()?;
            let now = self.now();
            let mut todos = self.todos.borrow_mut();
            let item = todos
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| "Failed to update todo".to_string())?;
            item.todo = todo.to_string();
            item.is_completed = is_completed;
            item.updated_at = Some(now);
            Ok(())
        }

        async fn delete_todo(&self, id: &str) -> Result<(), String> {
            self.check_online()?;
            self.todos.borrow_mut().retain(|t| t.id != id);
            Ok(())
        }
    }

    /// Dispatch like the component does, then deliver the next push
    async fn run(state: &mut TodoListState, gateway: &FakeGateway, mutation: Mutation) {
        if gateway.apply(&mutation).await.is_ok() {
            state.settle(&mutation);
        }
        if let Ok(snapshot) = gateway.list_todos().await {
            state.apply_snapshot(snapshot);
        }
    }

    #[tokio::test]
    async fn test_double_toggle_restores_flag() {
        let gateway = FakeGateway::default();
        let mut state = TodoListState::default();

        state.set_input("Buy milk".to_string());
        let create = state.plan_submit().unwrap();
        run(&mut state, &gateway, create).await;
        let original = state.items[0].clone();

        let first = state.plan_toggle(&state.items[0].clone());
        run(&mut state, &gateway, first).await;
        assert!(state.items[0].is_completed);

        let second = state.plan_toggle(&state.items[0].clone());
        run(&mut state, &gateway, second).await;

        let after = &state.items[0];
        assert_eq!(after.is_completed, original.is_completed);
        assert_eq!(after.todo, original.todo);
        assert_ne!(after.updated_at, original.updated_at);
        assert_eq!(after.created_at, original.created_at);
    }

    #[tokio::test]
    async fn test_create_then_edit_through_gateway() {
        let gateway = FakeGateway::default();
        let mut state = TodoListState::default();

        state.set_input("Walk dog".to_string());
        let create = state.plan_submit().unwrap();
        run(&mut state, &gateway, create).await;
        assert_eq!(state.input, "");
        assert_eq!(state.items.len(), 1);

        let item = state.items[0].clone();
        state.start_edit(&item);
        state.set_input("Walk the dog".to_string());
        let edit = state.plan_submit().unwrap();
        run(&mut state, &gateway, edit).await;

        assert_eq!(state.items[0].todo, "Walk the dog");
        assert_eq!(state.editing_id, None);
        assert_eq!(state.input, "");
    }

    #[tokio::test]
    async fn test_remote_failure_keeps_local_state() {
        let gateway = FakeGateway::default();
        let mut state = TodoListState::default();
        state.set_input("Read book".to_string());
        let create = state.plan_submit().unwrap();

        gateway.offline.set(true);
        run(&mut state, &gateway, create).await;

        assert_eq!(state.input, "Read book");
        assert!(state.items.is_empty());
        assert_eq!(state.warning, None);
    }
}
