//! Todo List Frontend App

use leptos::prelude::*;

use crate::components::TodoList;

#[component]
pub fn App() -> impl IntoView {
    // The UI is served by the gateway itself
    let api_base = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default();

    view! {
        <main>
            <TodoList api_base=api_base />
        </main>
    }
}
