//! Todo Row Component
//!
//! One list entry with its Done/Undo, Edit and Remove actions.

use leptos::prelude::*;

use crate::models::{Todo, TodoId};

#[component]
pub fn TodoRow(
    item: Todo,
    #[prop(into)] on_toggle: Callback<Todo>,
    #[prop(into)] on_edit: Callback<Todo>,
    #[prop(into)] on_remove: Callback<TodoId>,
) -> impl IntoView {
    let completed = item.is_completed;
    let text = item.todo.clone();
    let id = item.id.clone();
    let toggle_target = item.clone();

    view! {
        <li class="todo-item">
            <span class={if completed { "todo-text completed" } else { "todo-text" }}>
                {text}
            </span>

            <div class="todo-actions">
                <button
                    type="button"
                    class="action-btn complete-btn"
                    title={if completed { "Mark as Incomplete" } else { "Mark as Complete" }}
                    on:click=move |_| on_toggle.run(toggle_target.clone())
                >
                    {if completed { "Undo" } else { "Done" }}
                </button>
                <button
                    type="button"
                    class="action-btn edit-btn"
                    on:click=move |_| on_edit.run(item.clone())
                >
                    "Edit"
                </button>
                <button
                    type="button"
                    class="action-btn remove-btn"
                    on:click=move |_| on_remove.run(id.clone())
                >
                    "Remove"
                </button>
            </div>
        </li>
    }
}
