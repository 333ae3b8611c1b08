//! App Root Component
//!
//! Provides the UI state and controller, then runs the startup sequence.

use leptos::*;

use crate::api;
use crate::components::{AuthPanel, PlantPanel};
use crate::platform::create_controller;
use crate::state::provide_ui_state;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let state = provide_ui_state();
    let controller = create_controller(state);
    provide_context(controller.clone());

    web_sys::console::log_1(&format!("PlantWatch API base: {:?}", api::get_api_base()).into());

    // Restore the cached session and load plants if it is still valid
    wasm_bindgen_futures::spawn_local(async move {
        controller.init().await;
    });

    view! {
        <div class="min-h-screen bg-gray-900 text-white">
            <header class="bg-gray-800 border-b border-gray-700 py-4 px-4">
                <h1 class="container mx-auto text-2xl font-bold">"PlantWatch"</h1>
            </header>
            <main class="container mx-auto px-4 py-8">
                {move || if state.auth_visible.get() {
                    view! { <AuthPanel /> }.into_view()
                } else {
                    view! { <PlantPanel /> }.into_view()
                }}
            </main>
        </div>
    }
}
