//! Charts
//!
//! Chart data shaping and the per-plant chart lifecycle. Drawing is delegated
//! to a [`ChartBackend`] (canvas in the browser, sparklines in the terminal).

mod registry;

pub use registry::{ChartPair, ChartRegistry, RenderOutcome};

use chrono::TimeZone;
use std::fmt::Display;
use std::rc::Rc;

use crate::model::{time_of_day_label, Measurement, PlantId};

/// The two charts rendered per plant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Moisture,
    Temperature,
}

impl ChartKind {
    pub const ALL: [ChartKind; 2] = [ChartKind::Moisture, ChartKind::Temperature];

    /// Dataset label
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Moisture => "Moisture (%)",
            ChartKind::Temperature => "Temperature (°C)",
        }
    }

    /// Short identifier, used in element ids
    pub fn slug(&self) -> &'static str {
        match self {
            ChartKind::Moisture => "moisture",
            ChartKind::Temperature => "temperature",
        }
    }

    /// Line color
    pub fn color(&self) -> &'static str {
        match self {
            ChartKind::Moisture => "#2196F3",
            ChartKind::Temperature => "#FF9800",
        }
    }
}

/// One dataset with its x-axis labels
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartData {
    /// Min and max of the values, `None` when empty
    pub fn bounds(&self) -> Option<(f64, f64)> {
        if self.values.is_empty() {
            return None;
        }
        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

/// Chronological labels plus moisture and temperature values for one plant
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub moisture: Vec<f64>,
    pub temperature: Vec<f64>,
}

impl ChartSeries {
    /// Build from readings already in chronological order
    pub fn from_measurements<Tz>(measurements: &[Measurement], tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            labels: measurements
                .iter()
                .map(|m| time_of_day_label(m.ts, tz))
                .collect(),
            moisture: measurements.iter().map(|m| m.moisture).collect(),
            temperature: measurements.iter().map(|m| m.temperature).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Dataset for one chart of the pair
    pub fn dataset(&self, kind: ChartKind) -> ChartData {
        let values = match kind {
            ChartKind::Moisture => &self.moisture,
            ChartKind::Temperature => &self.temperature,
        };
        ChartData {
            labels: self.labels.clone(),
            values: values.clone(),
        }
    }
}

/// Creates, updates and destroys live chart objects
pub trait ChartBackend {
    /// A live chart
    type Handle;

    fn create(&self, plant: PlantId, kind: ChartKind, data: &ChartData) -> Self::Handle;

    /// Replace the data of a live chart in place
    fn update(&self, handle: &mut Self::Handle, data: &ChartData);

    fn destroy(&self, handle: Self::Handle);
}

impl<B: ChartBackend + ?Sized> ChartBackend for Rc<B> {
    type Handle = B::Handle;

    fn create(&self, plant: PlantId, kind: ChartKind, data: &ChartData) -> Self::Handle {
        (**self).create(plant, kind, data)
    }

    fn update(&self, handle: &mut Self::Handle, data: &ChartData) {
        (**self).update(handle, data)
    }

    fn destroy(&self, handle: Self::Handle) {
        (**self).destroy(handle)
    }
}
