//! Todo List State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The transitions
//! live in `controller`.

use reactive_stores::Store;

use crate::models::{Todo, TodoId};

/// Local validation failure shown above the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    EmptyTodo,
    DuplicateTodo,
}

impl Warning {
    pub fn message(&self) -> &'static str {
        match self {
            Warning::EmptyTodo => "Todo cannot be empty",
            Warning::DuplicateTodo => "Duplicate todo not allowed",
        }
    }
}

/// Everything the list view owns
#[derive(Clone, Debug, Default, Store)]
pub struct TodoListState {
    /// Last pushed snapshot, newest first
    pub items: Vec<Todo>,
    /// Composer text, doubling as the live filter
    pub input: String,
    /// Item being edited; `None` means submit creates
    pub editing_id: Option<TodoId>,
    pub warning: Option<Warning>,
}

/// Type alias for the store
pub type TodoStore = Store<TodoListState>;
