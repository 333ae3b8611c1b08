//! Global Application State
//!
//! Reactive state the controller writes through [`View`] and components read.

use leptos::*;
use std::collections::HashMap;

use plantwatch::controller::view::NO_MEASUREMENTS;
use plantwatch::{Form, Notice, Plant, PlantId, View};

/// What the plant list area shows
#[derive(Clone, Debug, PartialEq, Default)]
pub enum PlantList {
    #[default]
    Idle,
    Loading,
    Error(String),
    Empty,
    Plants(Vec<Plant>),
}

/// Per-card display state
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CardState {
    /// `None` until the first reading load finishes; inner `None` means no readings
    pub reading: Option<Option<String>>,
    pub chart_visible: bool,
    pub chart_placeholder: Option<String>,
    pub water_pending: bool,
    pub delete_pending: bool,
}

impl CardState {
    /// Text of the latest-reading line
    pub fn reading_text(&self) -> String {
        match &self.reading {
            None => "Loading latest reading...".to_string(),
            Some(None) => NO_MEASUREMENTS.to_string(),
            Some(Some(summary)) => summary.clone(),
        }
    }
}

/// Application state provided to all components
#[derive(Clone, Copy)]
pub struct UiState {
    /// Auth panel shown, plant panel hidden
    pub auth_visible: RwSignal<bool>,
    /// Signed-in user's email for the header
    pub email: RwSignal<Option<String>>,
    /// Inline form messages
    pub notices: RwSignal<HashMap<Form, Notice>>,
    /// Bumped each time a form should clear its inputs
    pub resets: RwSignal<HashMap<Form, u32>>,
    pub plant_list: RwSignal<PlantList>,
    pub cards: RwSignal<HashMap<PlantId, CardState>>,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            auth_visible: create_rw_signal(true),
            email: create_rw_signal(None),
            notices: create_rw_signal(HashMap::new()),
            resets: create_rw_signal(HashMap::new()),
            plant_list: create_rw_signal(PlantList::Idle),
            cards: create_rw_signal(HashMap::new()),
        }
    }

    pub fn notice(&self, form: Form) -> Option<Notice> {
        self.notices.with(|notices| notices.get(&form).cloned())
    }

    pub fn reset_count(&self, form: Form) -> u32 {
        self.resets.with(|resets| resets.get(&form).copied().unwrap_or(0))
    }

    pub fn card(&self, plant: PlantId) -> CardState {
        self.cards
            .with(|cards| cards.get(&plant).cloned().unwrap_or_default())
    }

    fn update_card(&self, plant: PlantId, f: impl FnOnce(&mut CardState)) {
        self.cards.update(|cards| {
            if let Some(card) = cards.get_mut(&plant) {
                f(card);
            }
        });
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Provide state to the component tree
pub fn provide_ui_state() -> UiState {
    let state = UiState::new();
    provide_context(state);
    state
}

impl View for UiState {
    fn show_auth(&self) {
        self.auth_visible.set(true);
    }

    fn show_plants(&self) {
        self.auth_visible.set(false);
    }

    fn set_user_email(&self, email: Option<&str>) {
        self.email.set(email.map(str::to_string));
    }

    fn show_notice(&self, form: Form, notice: Notice) {
        self.notices.update(|notices| {
            match form {
                Form::Login => notices.remove(&Form::Register),
                Form::Register => notices.remove(&Form::Login),
                Form::AddPlant => None,
            };
            notices.insert(form, notice);
        });
    }

    fn clear_notices(&self) {
        self.notices.update(|notices| notices.clear());
    }

    fn reset_form(&self, form: Form) {
        self.resets
            .update(|resets| *resets.entry(form).or_insert(0) += 1);
    }

    fn show_plant_list_loading(&self) {
        self.plant_list.set(PlantList::Loading);
    }

    fn show_plant_list_error(&self, message: &str) {
        self.cards.update(|cards| cards.clear());
        self.plant_list.set(PlantList::Error(message.to_string()));
    }

    fn render_plant_list(&self, plants: &[Plant]) {
        self.cards.set(
            plants
                .iter()
                .map(|p| (p.id, CardState::default()))
                .collect(),
        );
        self.plant_list.set(if plants.is_empty() {
            PlantList::Empty
        } else {
            PlantList::Plants(plants.to_vec())
        });
    }

    fn clear_plant_list(&self) {
        self.cards.update(|cards| cards.clear());
        self.plant_list.set(PlantList::Idle);
    }

    fn remove_plant_card(&self, plant: PlantId) {
        self.cards.update(|cards| {
            cards.remove(&plant);
        });
        self.plant_list.update(|list| {
            if let PlantList::Plants(plants) = list {
                plants.retain(|p| p.id != plant);
                if plants.is_empty() {
                    *list = PlantList::Empty;
                }
            }
        });
    }

    fn render_latest_reading(&self, plant: PlantId, summary: Option<&str>) {
        self.update_card(plant, |card| card.reading = Some(summary.map(str::to_string)));
    }

    fn set_chart_visible(&self, plant: PlantId, visible: bool) {
        self.update_card(plant, |card| card.chart_visible = visible);
    }

    fn show_chart_placeholder(&self, plant: PlantId, message: Option<&str>) {
        self.update_card(plant, |card| {
            card.chart_placeholder = message.map(str::to_string)
        });
    }

    fn set_water_pending(&self, plant: PlantId, pending: bool) {
        self.update_card(plant, |card| card.water_pending = pending);
    }

    fn set_delete_pending(&self, plant: PlantId, pending: bool) {
        self.update_card(plant, |card| card.delete_pending = pending);
    }

    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|window| window.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}
