//! Rolling per-name history of sampled averages.

use crate::utils::config::HISTORY_SIZE;

/// Persistent rolling-average state for one span name
///
/// **Public** - read by presentation code through the aggregator
#[derive(Debug, Clone)]
pub struct History {
    id: usize,
    current: f64,
    past: [f64; HISTORY_SIZE],
}

impl History {
    /// Create a zeroed record with the given first-seen id
    pub fn new(id: usize) -> Self {
        Self {
            id,
            current: 0.0,
            past: [0.0; HISTORY_SIZE],
        }
    }

    /// Stable id assigned at first sighting
    pub fn id(&self) -> usize {
        self.id
    }

    /// Seconds accumulated since the last rotation
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Raw ring buffer of sampled averages, in milliseconds
    pub fn past(&self) -> &[f64; HISTORY_SIZE] {
        &self.past
    }

    /// Most recent sample, or zero before the first rotation
    pub fn latest(&self, offset: Option<usize>) -> f64 {
        offset.map(|slot| self.past[slot]).unwrap_or(0.0)
    }

    /// Samples from oldest to newest, given the slot written last
    pub fn ordered(&self, offset: Option<usize>) -> Vec<f64> {
        match offset {
            Some(slot) => self.past[slot + 1..]
                .iter()
                .chain(self.past[..=slot].iter())
                .copied()
                .collect(),
            None => self.past.to_vec(),
        }
    }

    /// Largest sample in the window
    pub fn peak(&self) -> f64 {
        self.past.iter().copied().fold(0.0, f64::max)
    }

    /// Mean of the whole window, unwritten slots included
    pub fn mean(&self) -> f64 {
        self.past.iter().sum::<f64>() / HISTORY_SIZE as f64
    }

    pub(crate) fn accumulate(&mut self, seconds: f64) {
        self.current += seconds;
    }

    /// Write the per-frame average into `slot` (ms) and clear the accumulator
    pub(crate) fn rotate(&mut self, slot: usize, frame_count: u32) {
        self.past[slot] = if frame_count > 0 {
            self.current / f64::from(frame_count) * 1000.0
        } else {
            0.0
        };
        self.current = 0.0;
    }
}
