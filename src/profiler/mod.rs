//! The profiler engine and its collaborators.
//!
//! This module provides:
//! - The engine owning the phase trees and the aggregator
//! - The single-instance host
//! - A fixed-step loop driver
//! - Clock sources

pub mod clock;
pub mod driver;
pub mod engine;
pub mod host;
pub mod snapshot;

// Re-export main types
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use driver::{FrameLoop, LoopHandler};
pub use engine::{FrameReport, Profiler};
pub use host::ProfilerHost;
