//! Aggregation of finished span trees into rolling history.
//!
//! This module transforms per-frame span trees into:
//! - Per-name accumulators (seconds, since the last rotation)
//! - Ring buffers of per-frame averages (milliseconds)
//! - A frames-per-second counter refreshed every sampling window

pub mod averages;
pub mod history;
pub mod sampler;

// Re-export main types
pub use averages::Aggregator;
pub use history::History;
pub use sampler::{Rotation, Sampler};
