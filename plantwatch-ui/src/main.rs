//! PlantWatch Dashboard
//!
//! Browser front end for the plant watering monitor, built with Leptos (WASM).
//!
//! # Features
//!
//! - Login and registration against the PlantWatch API
//! - Plant list with latest readings
//! - Manual watering and plant removal
//! - Moisture and temperature charts
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. All session logic lives in the shared `plantwatch`
//! controller; this crate supplies its browser platform: `fetch`,
//! `localStorage`, reactive signals and canvas charts.

use leptos::*;

mod api;
mod app;
mod components;
mod platform;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
