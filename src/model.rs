//! Domain Types
//!
//! Plants, measurements and the cached session, plus the pure transforms the
//! views consume (ordering, time-of-day labels, latest-reading text).

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Server-assigned plant identifier
pub type PlantId = i64;

/// A monitored watering target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plant {
    pub id: PlantId,
    pub name: String,
}

impl Plant {
    pub fn new(id: PlantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A single moisture/temperature reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Unix timestamp in seconds
    pub ts: i64,
    /// Soil moisture in percent
    pub moisture: f64,
    /// Temperature in °C
    pub temperature: f64,
}

impl Measurement {
    pub fn new(ts: i64, moisture: f64, temperature: f64) -> Self {
        Self {
            ts,
            moisture,
            temperature,
        }
    }
}

/// Credentials and identity cached in client storage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Bearer token returned by `/auth/login`
    pub token: Option<String>,
    /// Canonical email of the signed-in user
    pub email: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>, email: Option<String>) -> Self {
        Self {
            token: Some(token.into()),
            email,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Order readings oldest-first.
///
/// The API returns newest-first; sorting (rather than reversing) keeps the
/// output chronological whichever order the server actually used.
pub fn order_chronologically(mut measurements: Vec<Measurement>) -> Vec<Measurement> {
    measurements.sort_by_key(|m| m.ts);
    measurements
}

/// Format a unix timestamp as time of day in the given zone
pub fn time_of_day_label<Tz>(ts: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.with_timezone(tz).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// One-line summary of the most recent reading
pub fn latest_reading_summary<Tz>(latest: &Measurement, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "Latest reading ({}): moisture {:.1}%, temperature {:.1}°C",
        time_of_day_label(latest.ts, tz),
        latest.moisture,
        latest.temperature
    )
}
