//! Per-plant chart ownership.

use std::collections::{HashMap, HashSet};

use super::{ChartBackend, ChartKind, ChartSeries};
use crate::model::PlantId;

/// The moisture and temperature charts of one plant
#[derive(Debug)]
pub struct ChartPair<H> {
    pub moisture: H,
    pub temperature: H,
}

#[derive(Debug)]
enum ChartSlot<H> {
    Live(ChartPair<H>),
    /// Rendered with no data; nothing is drawn
    Empty,
}

/// Whether [`ChartRegistry::render`] created the pair or updated it in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Created,
    Updated,
}

/// Owns every live chart pair, keyed by plant id
pub struct ChartRegistry<B: ChartBackend> {
    backend: B,
    slots: HashMap<PlantId, ChartSlot<B::Handle>>,
}

impl<B: ChartBackend> ChartRegistry<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            slots: HashMap::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Create the pair on first render, update it in place afterwards
    pub fn render(&mut self, plant: PlantId, series: &ChartSeries) -> RenderOutcome {
        let moisture = series.dataset(ChartKind::Moisture);
        let temperature = series.dataset(ChartKind::Temperature);

        match self.slots.get_mut(&plant) {
            Some(ChartSlot::Live(pair)) => {
                self.backend.update(&mut pair.moisture, &moisture);
                self.backend.update(&mut pair.temperature, &temperature);
                RenderOutcome::Updated
            }
            _ => {
                let pair = ChartPair {
                    moisture: self.backend.create(plant, ChartKind::Moisture, &moisture),
                    temperature: self.backend.create(plant, ChartKind::Temperature, &temperature),
                };
                self.slots.insert(plant, ChartSlot::Live(pair));
                RenderOutcome::Created
            }
        }
    }

    /// Destroy any live pair and mark the plant as having no chart
    pub fn clear(&mut self, plant: PlantId) {
        if let Some(ChartSlot::Live(pair)) = self.slots.insert(plant, ChartSlot::Empty) {
            self.destroy_pair(pair);
        }
    }

    /// Forget the plant entirely, destroying its pair. Returns whether it was tracked.
    pub fn remove(&mut self, plant: PlantId) -> bool {
        match self.slots.remove(&plant) {
            Some(ChartSlot::Live(pair)) => {
                self.destroy_pair(pair);
                true
            }
            Some(ChartSlot::Empty) => true,
            None => false,
        }
    }

    /// Drop every plant not in `keep`. Returns the number of plants dropped.
    pub fn retain(&mut self, keep: &HashSet<PlantId>) -> usize {
        let stale: Vec<PlantId> = self
            .slots
            .keys()
            .filter(|id| !keep.contains(id))
            .copied()
            .collect();

        for plant in &stale {
            self.remove(*plant);
        }
        stale.len()
    }

    /// Destroy everything
    pub fn destroy_all(&mut self) {
        for (_, slot) in self.slots.drain() {
            if let ChartSlot::Live(pair) = slot {
                self.backend.destroy(pair.moisture);
                self.backend.destroy(pair.temperature);
            }
        }
    }

    /// Whether a live pair exists for the plant
    pub fn is_live(&self, plant: PlantId) -> bool {
        matches!(self.slots.get(&plant), Some(ChartSlot::Live(_)))
    }

    /// Whether the plant is in the explicit "no chart" state
    pub fn is_empty_slot(&self, plant: PlantId) -> bool {
        matches!(self.slots.get(&plant), Some(ChartSlot::Empty))
    }

    /// Number of live pairs
    pub fn live_count(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, ChartSlot::Live(_)))
            .count()
    }

    fn destroy_pair(&self, pair: ChartPair<B::Handle>) {
        self.backend.destroy(pair.moisture);
        self.backend.destroy(pair.temperature);
    }
}
