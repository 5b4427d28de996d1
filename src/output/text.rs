//! Plain-text renderings of a snapshot.
//!
//! `render_overlay` produces the two overlay windows (frame times and log)
//! as text; `generate_text_summary` produces a table of the hottest spans.

use super::schema::{ProfileSnapshot, SpanSnapshot};
use crate::utils::config::{PLOT_MAX_MS, VSYNC_FRAME_MS};
use std::borrow::Cow;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Opaque block of text shown next to the timings
pub trait LogSource {
    fn contents(&self) -> Cow<'_, str>;
}

impl LogSource for &str {
    fn contents(&self) -> Cow<'_, str> {
        Cow::Borrowed(*self)
    }
}

impl LogSource for String {
    fn contents(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

/// Render the visible overlay windows
///
/// Returns an empty string when neither window is shown.
pub fn render_overlay(snapshot: &ProfileSnapshot, log: Option<&dyn LogSource>) -> String {
    let mut out = String::new();

    if snapshot.time_shown {
        out.push_str("=== Frame Times ===\n");
        out.push_str(&format!(
            "With V-Sync enabled, frame time will\nnot go below {:.2} ms\n",
            VSYNC_FRAME_MS
        ));
        out.push_str(&format!("FPS: {}\n", snapshot.fps.round() as u64));
        out.push_str(&"-".repeat(40));
        out.push('\n');
        for phase in &snapshot.phases {
            render_span(&phase.root, 0, &mut out);
        }
    }

    if snapshot.log_shown {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("=== Log ===\n");
        if let Some(log) = log {
            out.push_str(&log.contents());
            if !out.ends_with('\n') {
                out.push('\n');
            }
        }
    }

    out
}

fn render_span(span: &SpanSnapshot, depth: usize, out: &mut String) {
    out.push_str(&format!(
        "{}{} Time (curr: {:<4.2} ms) {}\n",
        "  ".repeat(depth),
        span.name,
        span.current_ms,
        sparkline(&span.history, PLOT_MAX_MS)
    ));
    for child in &span.children {
        render_span(child, depth + 1, out);
    }
}

/// Map samples onto block characters, scaled to `0..=max`
pub fn sparkline(values: &[f64], max: f64) -> String {
    let top = SPARK_LEVELS.len() - 1;
    values
        .iter()
        .map(|v| {
            let ratio = if max > 0.0 { (v / max).clamp(0.0, 1.0) } else { 0.0 };
            SPARK_LEVELS[(ratio * top as f64).round() as usize]
        })
        .collect()
}

/// Create a table of the hottest spans with their share of the frame
pub fn generate_text_summary(snapshot: &ProfileSnapshot, max_lines: usize) -> String {
    let mut rows: Vec<(String, &SpanSnapshot)> = Vec::new();
    for phase in &snapshot.phases {
        collect_paths(&phase.root, String::new(), &mut rows);
    }
    rows.sort_by(|a, b| b.1.current_ms.total_cmp(&a.1.current_ms));

    let frame_ms = snapshot.total_ms();
    let mut lines = Vec::new();

    lines.push(format!(
        "  FPS: {:.1} | Frame: {:.2} ms | Spans: {}",
        snapshot.fps,
        frame_ms,
        rows.len()
    ));
    lines.push(format!("  {}", "-".repeat(70)));
    lines.push(format!(
        "  {:<36} {:>10} {:>10} {:>10}",
        "Span (hottest first)", "ms", "peak ms", "%"
    ));
    lines.push(format!("  {}", "-".repeat(70)));

    for (path, span) in rows.iter().take(max_lines) {
        let display_path = if path.chars().count() > 36 {
            let tail: String = path.chars().rev().take(33).collect::<Vec<_>>().into_iter().rev().collect();
            format!("...{}", tail)
        } else {
            path.clone()
        };
        let percentage = if frame_ms > 0.0 {
            span.current_ms / frame_ms * 100.0
        } else {
            0.0
        };
        lines.push(format!(
            "  {:<36} {:>10.3} {:>10.3} {:>9.1}%",
            display_path, span.current_ms, span.peak_ms, percentage
        ));
    }

    if rows.len() > max_lines {
        lines.push(String::new());
        lines.push(format!("   (Showing top {} of {} spans)", max_lines, rows.len()));
    }

    lines.join("\n")
}

fn collect_paths<'a>(span: &'a SpanSnapshot, prefix: String, rows: &mut Vec<(String, &'a SpanSnapshot)>) {
    let path = if prefix.is_empty() {
        span.name.clone()
    } else {
        format!("{};{}", prefix, span.name)
    };
    for child in &span.children {
        collect_paths(child, path.clone(), rows);
    }
    rows.push((path, span));
}
