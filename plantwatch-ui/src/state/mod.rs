//! State Management
//!
//! Reactive UI state and browser session storage.

pub mod global;
pub mod storage;

pub use global::{provide_ui_state, CardState, PlantList, UiState};
pub use storage::LocalSessionStore;
