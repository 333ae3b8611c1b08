//! Plant Card
//!
//! One plant with its latest reading, the water/delete controls and the
//! collapsible chart area.

use leptos::*;

use plantwatch::Plant;

use super::chart::PlantCharts;
use crate::platform::Controller;
use crate::state::UiState;

#[component]
pub fn PlantCard(plant: Plant) -> impl IntoView {
    let state = use_context::<UiState>().expect("UiState not found");
    let controller = use_context::<Controller>().expect("Controller not found");

    let id = plant.id;
    let name = plant.name.clone();
    let card = move || state.card(id);

    let water = {
        let controller = controller.clone();
        move |_| {
            let controller = controller.clone();
            spawn_local(async move {
                controller.water_plant(id).await;
            });
        }
    };

    let delete = {
        let controller = controller.clone();
        let name = name.clone();
        move |_| {
            let controller = controller.clone();
            let name = name.clone();
            spawn_local(async move {
                controller.delete_plant(id, &name).await;
            });
        }
    };

    let toggle = move |_| {
        let controller = controller.clone();
        spawn_local(async move {
            controller.toggle_chart_visibility(id).await;
        });
    };

    view! {
        <div class="bg-gray-800 rounded-lg p-4 space-y-3">
            <div class="flex items-center justify-between">
                <h3 class="text-lg font-semibold">
                    {name}
                    <span class="ml-2 text-sm text-gray-400">{format!("ID: {}", id)}</span>
                </h3>
            </div>

            <p class="text-sm text-gray-300">{move || card().reading_text()}</p>

            <div class="flex flex-wrap gap-2">
                <button
                    on:click=water
                    disabled=move || card().water_pending
                    class="px-3 py-1.5 rounded-lg bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600 text-sm"
                >
                    {move || if card().water_pending { "Watering..." } else { "Manual Water (5s)" }}
                </button>
                <button
                    on:click=delete
                    disabled=move || card().delete_pending
                    class="px-3 py-1.5 rounded-lg bg-red-700 hover:bg-red-800 disabled:bg-gray-600 text-sm"
                >
                    "Delete"
                </button>
                <button
                    on:click=toggle
                    class="px-3 py-1.5 rounded-lg bg-gray-700 hover:bg-gray-600 text-sm"
                >
                    {move || if card().chart_visible { "Hide Charts" } else { "Show Charts" }}
                </button>
            </div>

            // Hidden rather than unmounted so the canvases keep their drawings
            <div class="pt-2" class:hidden=move || !card().chart_visible>
                {move || card().chart_placeholder.map(|message| view! {
                    <p class="text-sm text-gray-400">{message}</p>
                })}
                <PlantCharts plant=id />
            </div>
        </div>
    }
}
