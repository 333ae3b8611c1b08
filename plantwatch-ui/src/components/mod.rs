//! UI Components
//!
//! Leptos components for the auth screen and the plant dashboard.

pub mod auth;
pub mod chart;
pub mod plant_card;
pub mod plant_list;

pub use auth::AuthPanel;
pub use plant_list::PlantPanel;
