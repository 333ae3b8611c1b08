//! Render seam between the controller and whatever draws the UI.

use crate::model::{Plant, PlantId};

pub const LOGIN_FAILED: &str = "Login failed. Please check credentials.";
pub const REGISTER_FAILED: &str = "Registration failed.";
pub const REGISTER_SUCCEEDED: &str = "Registration successful! You can now log in.";
pub const ADD_PLANT_FAILED: &str = "Failed to add plant.";
pub const PLANT_NAME_REQUIRED: &str = "Plant name is required.";
pub const PLANTS_LOAD_FAILED: &str = "Could not load plants.";
pub const NO_PLANTS: &str = "No plants found. Add one below!";
pub const NO_MEASUREMENTS: &str = "No measurements found.";
pub const NO_CHART_DATA: &str = "No measurement data available.";
pub const EMAIL_LOADING: &str = "Loading...";

/// Forms that carry inline notices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Form {
    Login,
    Register,
    AddPlant,
}

/// Inline message shown next to a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Success(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Error(text) | Notice::Success(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// Everything the controller asks of the rendering layer.
///
/// Calls are fire-and-forget; a view may ignore plant ids it has no card for.
pub trait View {
    /// Show the auth view and hide the plant view
    fn show_auth(&self);

    /// Show the plant view and hide the auth view
    fn show_plants(&self);

    fn set_user_email(&self, email: Option<&str>);

    /// Replace the notice of `form`; a notice on one auth form clears the other's
    fn show_notice(&self, form: Form, notice: Notice);

    fn clear_notices(&self);

    fn reset_form(&self, form: Form);

    fn show_plant_list_loading(&self);

    fn show_plant_list_error(&self, message: &str);

    /// Replace the list with one card per plant, or the [`NO_PLANTS`] placeholder
    fn render_plant_list(&self, plants: &[Plant]);

    fn clear_plant_list(&self);

    fn remove_plant_card(&self, plant: PlantId);

    /// `None` means the plant has no readings ([`NO_MEASUREMENTS`])
    fn render_latest_reading(&self, plant: PlantId, summary: Option<&str>);

    fn set_chart_visible(&self, plant: PlantId, visible: bool);

    /// Show a message in place of the charts, or hide it with `None`
    fn show_chart_placeholder(&self, plant: PlantId, message: Option<&str>);

    /// Disable (`true`) or re-enable the manual water control
    fn set_water_pending(&self, plant: PlantId, pending: bool);

    /// Disable (`true`) or re-enable the delete control
    fn set_delete_pending(&self, plant: PlantId, pending: bool);

    /// Blocking yes/no question
    fn confirm(&self, message: &str) -> bool;

    /// Blocking alert
    fn alert(&self, message: &str);
}

/// Confirmation text for deleting a plant
pub fn delete_confirmation(plant: PlantId, name: &str) -> String {
    format!(
        "Delete plant \"{}\" (ID: {})? Its measurement history will be removed too.",
        name, plant
    )
}
