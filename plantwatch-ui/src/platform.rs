//! Browser Platform
//!
//! Binds the shared controller to `fetch`, `localStorage`, Leptos signals and
//! canvas charts.

use async_trait::async_trait;
use chrono::{FixedOffset, Offset, Utc};
use gloo_timers::future::TimeoutFuture;
use std::rc::Rc;
use std::time::Duration;

use plantwatch::{Platform, SessionController, Timer};

use crate::api::FetchTransport;
use crate::components::chart::CanvasCharts;
use crate::state::{LocalSessionStore, UiState};

pub struct BrowserPlatform;

impl Platform for BrowserPlatform {
    type Transport = FetchTransport;
    type Store = LocalSessionStore;
    type View = UiState;
    type Charts = CanvasCharts;
    type Timer = BrowserTimer;
}

/// Controller handle shared through context
pub type Controller = Rc<SessionController<BrowserPlatform>>;

/// `setTimeout`-based sleep
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTimer;

#[async_trait(?Send)]
impl Timer for BrowserTimer {
    async fn sleep(&self, duration: Duration) {
        TimeoutFuture::new(duration.as_millis().min(u32::MAX as u128) as u32).await;
    }
}

/// The browser's current UTC offset
pub fn local_utc_offset() -> FixedOffset {
    offset_from_js_minutes(js_sys::Date::new_0().get_timezone_offset())
}

/// `Date.getTimezoneOffset()` is minutes *behind* UTC
fn offset_from_js_minutes(minutes: f64) -> FixedOffset {
    FixedOffset::west_opt((minutes * 60.0).round() as i32)
        .unwrap_or_else(|| Utc.fix())
}

/// Build the controller for this page
pub fn create_controller(view: UiState) -> Controller {
    Rc::new(
        SessionController::new(
            FetchTransport::from_storage(),
            LocalSessionStore,
            view,
            CanvasCharts,
            BrowserTimer,
        )
        .with_utc_offset(local_utc_offset()),
    )
}
