//! Output for presentation consumers.
//!
//! This module handles:
//! - The snapshot schema read by overlays and exporters
//! - JSON snapshots on disk
//! - SVG flame views on disk
//! - Text overlay and summary renderings

pub mod json;
pub mod schema;
pub mod svg;
pub mod text;

// Re-export main functions
pub use json::{read_snapshot, write_snapshot};
pub use schema::{PhaseSnapshot, ProfileSnapshot, SpanSnapshot};
pub use svg::write_svg;
pub use text::{generate_text_summary, render_overlay, sparkline, LogSource};
