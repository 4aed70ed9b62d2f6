//! UI Components
//!
//! Reusable Leptos components.

mod todo_list;
mod todo_row;

pub use todo_list::TodoList;
pub use todo_row::TodoRow;
