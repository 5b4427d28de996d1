//! Span trees: the per-phase record of nested timed marks.
//!
//! This module provides:
//! - The arena-backed span tree and its push/pop discipline
//! - The fixed set of loop phases, each owning one tree

pub mod phase;
pub mod tree;

// Re-export main types
pub use phase::{Phase, PhaseMap};
pub use tree::{Span, SpanId, SpanTree, Walk};
