//! Flame view generation.
//!
//! This module converts a profile snapshot into a static SVG where each
//! phase is a band and nested spans stack on top of their parents.

pub mod generator;

// Re-export main types
pub use generator::{generate_flamegraph, FlamegraphConfig};
