//! Plant list, watering and chart operations.

use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::view::{
    delete_confirmation, Form, Notice, View, ADD_PLANT_FAILED, NO_CHART_DATA,
    PLANTS_LOAD_FAILED, PLANT_NAME_REQUIRED,
};
use super::{Platform, SessionController, Timer, WATER_COOLDOWN, WATER_DURATION_MS};
use crate::api::{ApiError, NewPlant};
use crate::charts::ChartSeries;
use crate::model::{latest_reading_summary, order_chronologically, Measurement, Plant, PlantId};

impl<P: Platform> SessionController<P> {
    /// Fetch all plants and render their cards, readings and charts
    pub async fn list_plants(&self) {
        self.begin_listing();
        self.view.show_plant_list_loading();

        match self.authorized(|token| async move { self.api.list_plants(&token).await }).await {
            Ok(plants) => self.show_plant_cards(plants).await,
            Err(ApiError::Unauthorized) => {}
            Err(err) => {
                warn!(error = %err, "failed to load plants");
                self.view.show_plant_list_error(PLANTS_LOAD_FAILED);
            }
        }
    }

    /// Render a fetched plant list, then fill each card in order
    pub(super) async fn show_plant_cards(&self, plants: Vec<Plant>) {
        info!(plants = plants.len(), "rendering plant list");
        let listing = self.begin_listing();
        self.cards.borrow_mut().extend(plants.iter().map(|p| p.id));
        self.view.render_plant_list(&plants);

        let keep: HashSet<PlantId> = plants.iter().map(|p| p.id).collect();
        let dropped = self.charts.borrow_mut().retain(&keep);
        if dropped > 0 {
            debug!(dropped, "destroyed charts of removed plants");
        }
        // Fresh cards start with their charts hidden
        self.visible_charts.borrow_mut().clear();

        for plant in &plants {
            if !self.has_card(plant.id) {
                continue;
            }
            let measurements = self.load_measurements(plant.id).await;
            if !self.is_authenticated() || self.listing.get() != listing {
                break;
            }
            // Deleted while its readings were loading
            if !self.has_card(plant.id) {
                continue;
            }
            let summary = measurements
                .last()
                .map(|latest| latest_reading_summary(latest, &self.utc_offset));
            self.view.render_latest_reading(plant.id, summary.as_deref());
            self.render_charts(plant.id, &measurements);
        }
    }

    /// Look up one plant in the current list without touching the view
    pub async fn find_plant(&self, plant: PlantId) -> Option<Plant> {
        match self.authorized(|token| async move { self.api.list_plants(&token).await }).await {
            Ok(plants) => plants.into_iter().find(|p| p.id == plant),
            Err(err) => {
                debug!(plant, error = %err, "plant lookup failed");
                None
            }
        }
    }

    /// Create a plant; refreshes the list on success
    pub async fn add_plant(&self, name: &str, plant_id: Option<PlantId>) -> bool {
        self.view.clear_notices();

        let name = name.trim();
        if name.is_empty() {
            self.view
                .show_notice(Form::AddPlant, Notice::Error(PLANT_NAME_REQUIRED.to_string()));
            return false;
        }

        let plant = NewPlant {
            name: name.to_string(),
            plant_id,
        };
        let plant = &plant;
        match self
            .authorized(|token| async move { self.api.create_plant(&token, plant).await })
            .await
        {
            Ok(created) => {
                info!(name = %plant.name, id = ?created.map(|p| p.id), "plant added");
                self.view.reset_form(Form::AddPlant);
                self.list_plants().await;
                true
            }
            Err(ApiError::Unauthorized) => false,
            Err(err) => {
                warn!(error = %err, "failed to add plant");
                self.view.show_notice(
                    Form::AddPlant,
                    Notice::Error(err.user_message(ADD_PLANT_FAILED)),
                );
                false
            }
        }
    }

    /// Delete a plant after confirmation, removing its card and charts
    pub async fn delete_plant(&self, plant: PlantId, name: &str) -> bool {
        if !self.view.confirm(&delete_confirmation(plant, name)) {
            debug!(plant, "delete cancelled");
            return false;
        }

        self.view.set_delete_pending(plant, true);
        match self
            .authorized(|token| async move { self.api.delete_plant(&token, plant).await })
            .await
        {
            Ok(()) => {
                info!(plant, "plant deleted");
                self.cards.borrow_mut().remove(&plant);
                self.charts.borrow_mut().remove(plant);
                self.visible_charts.borrow_mut().remove(&plant);
                self.view.remove_plant_card(plant);
                true
            }
            Err(ApiError::Unauthorized) => false,
            Err(err) => {
                warn!(plant, error = %err, "failed to delete plant");
                self.view.set_delete_pending(plant, false);
                self.view.alert(&format!(
                    "Failed to delete plant \"{}\": {}",
                    name,
                    err.user_message("please try again.")
                ));
                false
            }
        }
    }

    /// Send a manual water command.
    ///
    /// The control stays disabled for [`WATER_COOLDOWN`] from the click,
    /// however long the request takes.
    pub async fn water_plant(&self, plant: PlantId) -> bool {
        info!(plant, duration_ms = WATER_DURATION_MS, "requesting manual water");
        self.view.set_water_pending(plant, true);

        let request = async {
            match self
                .authorized(|token| async move {
                    self.api.water(&token, plant, WATER_DURATION_MS).await
                })
                .await
            {
                Ok(ack) => {
                    info!(plant, status = ?ack.status, "water command accepted");
                    true
                }
                Err(ApiError::Unauthorized) => false,
                Err(err) => {
                    warn!(plant, error = %err, "water command failed");
                    self.view
                        .alert(&format!("Failed to send water command for plant {}.", plant));
                    false
                }
            }
        };

        let cooldown = async {
            self.timer.sleep(WATER_COOLDOWN).await;
            self.view.set_water_pending(plant, false);
        };

        let (accepted, ()) = futures_util::join!(request, cooldown);
        accepted
    }

    /// Measurement history in chronological order; empty on any failure
    pub async fn load_measurements(&self, plant: PlantId) -> Vec<Measurement> {
        match self
            .authorized(|token| async move { self.api.measurements(&token, plant).await })
            .await
        {
            Ok(measurements) => {
                debug!(plant, count = measurements.len(), "loaded measurements");
                order_chronologically(measurements)
            }
            Err(err) => {
                warn!(plant, error = %err, "failed to load measurements");
                Vec::new()
            }
        }
    }

    /// Flip a plant's chart container. Revealing fetches fresh data.
    ///
    /// Returns the new visibility.
    pub async fn toggle_chart_visibility(&self, plant: PlantId) -> bool {
        let visible = {
            let mut shown = self.visible_charts.borrow_mut();
            if shown.remove(&plant) {
                false
            } else {
                shown.insert(plant);
                true
            }
        };
        self.view.set_chart_visible(plant, visible);

        if visible {
            let measurements = self.load_measurements(plant).await;
            if self.is_chart_visible(plant) {
                self.render_charts(plant, &measurements);
            }
        }
        visible
    }

    /// Draw the plant's chart pair, or the no-data placeholder
    pub fn render_charts(&self, plant: PlantId, measurements: &[Measurement]) {
        if measurements.is_empty() {
            self.charts.borrow_mut().clear(plant);
            self.view.show_chart_placeholder(plant, Some(NO_CHART_DATA));
            return;
        }

        let series = ChartSeries::from_measurements(measurements, &self.utc_offset);
        self.view.show_chart_placeholder(plant, None);
        let outcome = self.charts.borrow_mut().render(plant, &series);
        debug!(plant, points = series.len(), ?outcome, "charts rendered");
    }
}
