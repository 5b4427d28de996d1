//! Fold finished span trees into the name-keyed history.
//!
//! Every span name maps to exactly one `History`, regardless of the phase or
//! depth it was seen at. A span called "Physics" under Update and another
//! "Physics" under Fixed Update share one record.

use super::history::History;
use super::sampler::{Rotation, Sampler};
use crate::span::SpanTree;
use log::{debug, trace};
use std::collections::HashMap;

/// Persistent aggregation state owned by the profiler
///
/// **Public** - read-only access is exposed to presentation code
#[derive(Debug, Clone)]
pub struct Aggregator {
    histories: HashMap<String, History>,
    sampler: Sampler,
}

impl Aggregator {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            histories: HashMap::new(),
            sampler: Sampler::new(sample_rate),
        }
    }

    /// Add every span's frame time in `tree` to its history record
    ///
    /// **Public** - called once per phase per frame with a finished tree
    ///
    /// Records are created on first sighting with the next sequential id.
    pub fn process_node_average(&mut self, tree: &SpanTree) {
        for (_, _, span) in tree.walk() {
            self.history_entry(span.name()).accumulate(span.total_time());
        }
    }

    /// Count a frame and rotate all histories when the window is full
    ///
    /// **Public** - called exactly once per application frame
    pub fn end_frame(&mut self, delta: f64) -> Option<Rotation> {
        let rotation = self.sampler.end_frame(delta)?;

        for history in self.histories.values_mut() {
            history.rotate(rotation.slot, rotation.frames);
        }

        debug!(
            "Rotated {} histories into slot {} ({} frames, {:.1} FPS)",
            self.histories.len(),
            rotation.slot,
            rotation.frames,
            rotation.fps
        );

        Some(rotation)
    }

    /// Look up a record by span name
    pub fn history(&self, name: &str) -> Option<&History> {
        self.histories.get(name)
    }

    /// All records with their names, in first-seen order
    pub fn histories(&self) -> Vec<(&str, &History)> {
        let mut all: Vec<(&str, &History)> = self
            .histories
            .iter()
            .map(|(name, history)| (name.as_str(), history))
            .collect();
        all.sort_by_key(|(_, history)| history.id());
        all
    }

    pub fn len(&self) -> usize {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    pub fn fps(&self) -> f64 {
        self.sampler.fps()
    }

    pub fn offset(&self) -> Option<usize> {
        self.sampler.offset()
    }

    pub fn frame_count(&self) -> u32 {
        self.sampler.frame_count()
    }

    pub fn time_passed(&self) -> f64 {
        self.sampler.time_passed()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sampler.sample_rate()
    }

    /// Latest sample for `name` in milliseconds, zero if unknown
    pub fn latest_ms(&self, name: &str) -> f64 {
        self.history(name)
            .map(|history| history.latest(self.offset()))
            .unwrap_or(0.0)
    }

    fn history_entry(&mut self, name: &str) -> &mut History {
        if !self.histories.contains_key(name) {
            let id = self.histories.len();
            trace!("New history record '{}' with id {}", name, id);
            self.histories.insert(name.to_string(), History::new(id));
        }
        self.histories
            .get_mut(name)
            .unwrap_or_else(|| unreachable!("history '{}' inserted above", name))
    }
}
