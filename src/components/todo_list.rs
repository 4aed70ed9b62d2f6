//! Todo List Component
//!
//! Composer form, warning line and the filtered list. All writes go through
//! the gateway; the list only changes when the live feed pushes a snapshot.

use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::commands::{HttpGateway, TodoGateway};
use crate::components::TodoRow;
use crate::controller::Mutation;
use crate::live_feed::LiveFeed;
use crate::models::{Todo, TodoId};
use crate::store::{TodoListState, TodoListStateStoreFields, TodoStore};

fn log_error(message: String) {
    web_sys::console::error_1(&message.into());
}

/// Send `mutation`; settle local state only once the store accepted it
fn dispatch(store: TodoStore, gateway: HttpGateway, mutation: Mutation) {
    spawn_local(async move {
        match gateway.apply(&mutation).await {
            Ok(()) => {
                store.try_update(|state| state.settle(&mutation));
            }
            Err(e) => log_error(format!("[TODO] Error on {}: {}", mutation.label(), e)),
        }
    });
}

#[component]
pub fn TodoList(#[prop(into)] api_base: String) -> impl IntoView {
    let store: TodoStore = Store::new(TodoListState::default());
    let gateway = HttpGateway::new(api_base);
    let input_ref = NodeRef::<html::Input>::new();

    let feed = match LiveFeed::open(&gateway.events_url(), move |items| {
        store.try_update(|state| state.apply_snapshot(items));
    }) {
        Ok(feed) => Some(feed),
        Err(e) => {
            log_error(format!("[TODO] Live updates unavailable: {}", e));
            // One-off load so the page is not empty
            let fallback = gateway.clone();
            spawn_local(async move {
                match fallback.list_todos().await {
                    Ok(items) => {
                        store.try_update(|state| state.apply_snapshot(items));
                    }
                    Err(e) => log_error(format!("[TODO] Error loading todos: {}", e)),
                }
            });
            None
        }
    };
    let feed = StoredValue::new_local(feed);
    on_cleanup(move || feed.dispose());

    let gateway = StoredValue::new_local(gateway);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if let Some(Some(mutation)) = store.try_update(|state| state.plan_submit()) {
            dispatch(store, gateway.get_value(), mutation);
        }
    };

    let on_toggle = Callback::new(move |item: Todo| {
        let mutation = store.with(|state| state.plan_toggle(&item));
        dispatch(store, gateway.get_value(), mutation);
    });

    let on_edit = Callback::new(move |item: Todo| {
        store.update(|state| state.start_edit(&item));
        if let Some(input) = input_ref.get() {
            let _ = input.focus();
        }
    });

    let on_remove = Callback::new(move |id: TodoId| {
        let mutation = store.with(|state| state.plan_delete(&id));
        dispatch(store, gateway.get_value(), mutation);
    });

    let editing = move || store.with(|state| state.is_editing());

    view! {
        <div class="container">
            <h2 class="title">"My Todo List"</h2>

            <form class="form" on:submit=on_submit>
                <input
                    type="text"
                    class="input"
                    autocomplete="off"
                    node_ref=input_ref
                    placeholder=move || {
                        if editing() { "Edit your todo and hit Enter" } else { "Add new todo" }
                    }
                    prop:value=move || store.input().get()
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        store.update(|state| state.set_input(value));
                    }
                />
                <button type="submit" class="add-btn">
                    {move || if editing() { "Save" } else { "Add" }}
                </button>
            </form>

            {move || {
                store
                    .warning()
                    .get()
                    .map(|warning| view! { <p class="warning">{warning.message()}</p> })
            }}

            {move || {
                let visible = store.with(|state| state.visible_items());
                if visible.is_empty() {
                    view! { <p class="no-result">"No result. Create a new one instead!"</p> }
                        .into_any()
                } else {
                    view! {
                        <ul class="todo-list">
                            {visible
                                .into_iter()
                                .map(|item| {
                                    view! {
                                        <TodoRow
                                            item=item
                                            on_toggle=on_toggle
                                            on_edit=on_edit
                                            on_remove=on_remove
                                        />
                                    }
                                })
                                .collect_view()}
                        </ul>
                    }
                        .into_any()
                }
            }}
        </div>
    }
}
