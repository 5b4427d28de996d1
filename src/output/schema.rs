//! Snapshot schema handed to presentation code and written as JSON.
//!
//! Schema is versioned to allow future evolution.

use crate::span::Phase;
use serde::{Deserialize, Serialize};

/// Read-only view of the profiler at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the snapshot was taken (RFC 3339)
    pub generated_at: String,

    /// Frames ended since the profiler was created
    pub frames: u64,

    /// Frames per second over the last sampling window
    pub fps: f64,

    /// Seconds per sampling window
    pub sample_rate: f64,

    /// Samples kept per history record
    pub history_size: usize,

    /// Overlay visibility at capture time
    pub time_shown: bool,
    pub log_shown: bool,

    /// One entry per phase that has finished at least once
    pub phases: Vec<PhaseSnapshot>,
}

impl ProfileSnapshot {
    pub fn phase(&self, phase: Phase) -> Option<&PhaseSnapshot> {
        self.phases.iter().find(|p| p.phase == phase)
    }

    /// Sum of the latest sample of every phase root, in milliseconds
    pub fn total_ms(&self) -> f64 {
        self.phases.iter().map(|p| p.root.current_ms).sum()
    }

    /// Number of spans across all phases
    pub fn span_count(&self) -> usize {
        self.phases.iter().map(|p| p.root.count()).sum()
    }
}

/// The finished tree of one phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSnapshot {
    pub phase: Phase,
    pub root: SpanSnapshot,
}

/// A span and its subtree, joined with its history record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanSnapshot {
    pub name: String,

    pub description: String,

    /// Id of the shared history record for this name
    pub history_id: usize,

    /// Latest sampled average (ms per frame)
    pub current_ms: f64,

    /// Time recorded in the finished frame (ms)
    pub frame_ms: f64,

    /// Sampled averages, oldest first (ms)
    pub history: Vec<f64>,

    /// Largest sample in the window (ms)
    #[serde(default)]
    pub peak_ms: f64,

    /// Mean over the whole window (ms)
    #[serde(default)]
    pub mean_ms: f64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SpanSnapshot>,
}

impl SpanSnapshot {
    /// Depth-first search by name, this span included
    pub fn find(&self, name: &str) -> Option<&SpanSnapshot> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Number of spans in this subtree
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SpanSnapshot::count).sum::<usize>()
    }
}
