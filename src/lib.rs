//! # PlantWatch
//!
//! Client for a plant-watering monitoring backend: authenticate, list and
//! manage plants, trigger manual watering and chart soil moisture and
//! temperature history.
//!
//! ## Modules
//!
//! - [`model`]: Plants, measurements, the cached session and pure transforms
//! - [`api`]: Typed REST calls over a pluggable [`api::Transport`]
//! - [`session`]: Durable token and email storage
//! - [`charts`]: Chart data shaping and per-plant chart ownership
//! - [`controller`]: The session and view controller every client drives
//! - [`terminal`]: Terminal implementations of the controller seams (native only)
//!
//! The same [`SessionController`] runs in the browser (`plantwatch-ui`) and in
//! the terminal (`plantwatch-cli`); each supplies its own [`Platform`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use plantwatch::config::Config;
//! use plantwatch::terminal::{SparklineCharts, TerminalPlatform, TerminalView, TokioTimer};
//! use plantwatch::{FileSessionStore, HttpTransport, SessionController};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let controller: SessionController<TerminalPlatform> = SessionController::new(
//!         HttpTransport::new(&config.api)?,
//!         FileSessionStore::new(&config.session.path),
//!         TerminalView::new(false, true),
//!         SparklineCharts::new(true),
//!         TokioTimer,
//!     );
//!
//!     if controller.login("me@example.com", "secret").await {
//!         controller.water_plant(1).await;
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod charts;
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
pub mod controller;
pub mod model;
pub mod session;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiError, ApiResult, PlantApi, Transport, TransportError};
#[cfg(not(target_arch = "wasm32"))]
pub use api::HttpTransport;

pub use charts::{ChartBackend, ChartData, ChartKind, ChartRegistry, ChartSeries};

pub use controller::{Form, Notice, Platform, SessionController, Timer, View};

pub use model::{Measurement, Plant, PlantId, Session};

pub use session::{MemorySessionStore, SessionStore, StoreError};
#[cfg(not(target_arch = "wasm32"))]
pub use session::FileSessionStore;

#[cfg(not(target_arch = "wasm32"))]
pub use config::{Config, ConfigError, LoggingConfig};
