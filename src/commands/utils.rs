use crate::output::read_snapshot;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a snapshot JSON file
pub fn validate_snapshot_file(file_path: PathBuf) -> Result<()> {
    println!("Validating snapshot: {}", file_path.display());

    let snapshot = read_snapshot(&file_path)
        .with_context(|| format!("Failed to read snapshot {}", file_path.display()))?;

    if snapshot.version != SCHEMA_VERSION {
        anyhow::bail!(
            "Unsupported schema version {} (expected {})",
            snapshot.version,
            SCHEMA_VERSION
        );
    }

    println!("✓ Valid snapshot JSON");
    println!("  Version: {}", snapshot.version);
    println!("  Frames: {}", snapshot.frames);
    println!("  FPS: {:.1}", snapshot.fps);
    println!("  Phases: {}", snapshot.phases.len());
    println!("  Spans: {}", snapshot.span_count());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Frame Profiler Snapshot Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string     - RFC 3339 timestamp");
        println!("  frames: number           - Frames ended so far");
        println!("  fps: number              - FPS over the last sampling window");
        println!("  sample_rate: number      - Seconds per sampling window");
        println!("  history_size: number     - Samples kept per span name");
        println!("  time_shown: bool         - Frame-time window visible");
        println!("  log_shown: bool          - Log window visible");
        println!("  phases: array            - Finished tree per phase");
        println!("    phase: string          - Update | FixedUpdate | Draw | Swap");
        println!("    root: span             - Phase root span");
        println!("      name: string         - Span name (history key)");
        println!("      description: string  - Free-text explanation");
        println!("      history_id: number   - Stable id of the history record");
        println!("      current_ms: number   - Latest sampled average");
        println!("      frame_ms: number     - Time in the finished frame");
        println!("      history: array       - Sampled averages, oldest first");
        println!("      peak_ms: number      - Largest sample in the window");
        println!("      mean_ms: number      - Mean over the window");
        println!("      children: array?     - Nested spans in display order");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Frame Profiler v{}", env!("CARGO_PKG_VERSION"));
    println!("Snapshot Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Hierarchical per-phase frame timing with rolling history.");
}
