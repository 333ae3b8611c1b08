//! Plant Panel
//!
//! Header with the signed-in user, the add-plant form and the plant list.

use leptos::*;

use plantwatch::controller::view::NO_PLANTS;
use plantwatch::{Form, PlantId};

use super::auth::NoticeLine;
use super::plant_card::PlantCard;
use crate::platform::Controller;
use crate::state::{PlantList, UiState};

#[component]
pub fn PlantPanel() -> impl IntoView {
    view! {
        <div class="space-y-6">
            <Header />
            <AddPlantForm />
            <PlantListView />
        </div>
    }
}

#[component]
fn Header() -> impl IntoView {
    let state = use_context::<UiState>().expect("UiState not found");
    let controller = use_context::<Controller>().expect("Controller not found");

    view! {
        <div class="flex items-center justify-between">
            <span class="text-gray-300">
                "Logged in as "
                <strong>{move || state.email.get().unwrap_or_default()}</strong>
            </span>
            <button
                on:click=move |_| controller.logout()
                class="px-4 py-2 rounded-lg bg-gray-700 hover:bg-gray-600 text-sm"
            >
                "Logout"
            </button>
        </div>
    }
}

#[component]
fn AddPlantForm() -> impl IntoView {
    let state = use_context::<UiState>().expect("UiState not found");
    let controller = use_context::<Controller>().expect("Controller not found");

    let (name, set_name) = create_signal(String::new());
    let (plant_id, set_plant_id) = create_signal(String::new());

    create_effect(move |previous: Option<u32>| {
        let count = state.reset_count(Form::AddPlant);
        if previous.is_some_and(|p| p != count) {
            set_name.set(String::new());
            set_plant_id.set(String::new());
        }
        count
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = name.get();
        let id = parse_optional_id(&plant_id.get());
        let controller = controller.clone();
        spawn_local(async move {
            controller.add_plant(&name, id).await;
        });
    };

    view! {
        <div class="bg-gray-800 rounded-lg p-4">
            <form on:submit=on_submit class="flex flex-wrap gap-3 items-center">
                <input
                    type="text"
                    placeholder="Plant name"
                    class="flex-1 bg-gray-700 rounded-lg px-3 py-2"
                    prop:value=name
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
                <input
                    type="number"
                    placeholder="ID (optional)"
                    class="w-36 bg-gray-700 rounded-lg px-3 py-2"
                    prop:value=plant_id
                    on:input=move |ev| set_plant_id.set(event_target_value(&ev))
                />
                <button
                    type="submit"
                    class="px-4 py-2 rounded-lg bg-primary-600 hover:bg-primary-700 font-semibold"
                >
                    "Add Plant"
                </button>
            </form>
            <NoticeLine form=Form::AddPlant />
        </div>
    }
}

#[component]
fn PlantListView() -> impl IntoView {
    let state = use_context::<UiState>().expect("UiState not found");

    // Keyed list stays mounted so removing one card keeps the other canvases
    let plants = move || match state.plant_list.get() {
        PlantList::Plants(plants) => plants,
        _ => Vec::new(),
    };

    view! {
        <div class="space-y-4">
            {move || match state.plant_list.get() {
                PlantList::Loading => view! {
                    <div class="flex items-center justify-center py-12">
                        <div class="loading-spinner w-8 h-8" />
                    </div>
                }
                .into_view(),
                PlantList::Error(message) => view! {
                    <p class="text-red-400">{message}</p>
                }
                .into_view(),
                PlantList::Empty => view! {
                    <p class="text-gray-400">{NO_PLANTS}</p>
                }
                .into_view(),
                PlantList::Idle | PlantList::Plants(_) => view! {}.into_view(),
            }}
            <For
                each=plants
                key=|plant| plant.id
                children=move |plant| view! { <PlantCard plant=plant /> }
            />
        </div>
    }
}

/// Empty or unparsable input means "let the server pick"
fn parse_optional_id(input: &str) -> Option<PlantId> {
    input.trim().parse().ok()
}
