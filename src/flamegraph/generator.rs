//! SVG flame view of the latest sample.
//!
//! Layout:
//! - Phase roots side by side along the bottom row, widths proportional to
//!   their latest sampled ms
//! - Children stacked above their parent, in display order, widths
//!   proportional to their own sampled ms (never wider than the parent)
//! - One color per phase so phases stay distinguishable at a glance

use crate::output::schema::{ProfileSnapshot, SpanSnapshot};
use crate::span::Phase;
use crate::utils::error::{ConfigError, FlamegraphError};
use log::info;

const ROW_HEIGHT: usize = 20;
const TITLE_MARGIN: usize = 30;
const LEGEND_HEIGHT: usize = 60;
const CHAR_WIDTH: f64 = 7.0;

/// Flamegraph configuration
#[derive(Debug, Clone)]
pub struct FlamegraphConfig {
    pub title: String,
    pub width: usize,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            title: "Frame Profile".to_string(),
            width: 1200,
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}

/// Generate an SVG flame view from a snapshot
///
/// # Errors
/// * `FlamegraphError::EmptySnapshot` - no phase has a nonzero latest sample
/// * `FlamegraphError::Config` - width is zero
pub fn generate_flamegraph(
    snapshot: &ProfileSnapshot,
    config: Option<&FlamegraphConfig>,
) -> Result<String, FlamegraphError> {
    let config = config.cloned().unwrap_or_default();
    if config.width == 0 {
        return Err(ConfigError::InvalidWidth(config.width).into());
    }

    let total_ms = snapshot.total_ms();
    if snapshot.phases.is_empty() || total_ms <= 0.0 {
        return Err(FlamegraphError::EmptySnapshot);
    }

    info!(
        "Generating flame view for {} phases ({:.2} ms)",
        snapshot.phases.len(),
        total_ms
    );

    let max_depth = snapshot
        .phases
        .iter()
        .map(|p| max_depth(&p.root))
        .max()
        .unwrap_or(0);
    let width = config.width;
    let graph_height = (max_depth + 1) * ROW_HEIGHT;
    let total_height = graph_height + TITLE_MARGIN + LEGEND_HEIGHT;

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        width, total_height, width, total_height
    ));
    svg.push_str(
        r#"<style>.span { font: 12px sans-serif; } .span:hover { stroke: black; stroke-width: 1; opacity: 0.9; }</style>"#,
    );
    svg.push_str(&format!(
        r#"<text x="{}" y="20" font-size="16" text-anchor="middle" font-weight="bold">{} ({:.1} FPS)</text>"#,
        width / 2,
        escape(&config.title),
        snapshot.fps
    ));

    let ms_to_px = width as f64 / total_ms;
    let mut x = 0.0;
    for phase in &snapshot.phases {
        let w = phase.root.current_ms * ms_to_px;
        render_span(&phase.root, phase.phase, 0, x, w, ms_to_px, graph_height, &mut svg);
        x += w;
    }

    render_legend(&mut svg, graph_height + TITLE_MARGIN);
    svg.push_str("</svg>");

    info!("Flame view generated ({} bytes)", svg.len());
    Ok(svg)
}

fn max_depth(span: &SpanSnapshot) -> usize {
    span.children
        .iter()
        .map(|child| max_depth(child) + 1)
        .max()
        .unwrap_or(0)
}

/// Fill color for spans of a phase
pub fn phase_color(phase: Phase) -> &'static str {
    match phase {
        Phase::Update => "rgb(70, 130, 180)",
        Phase::FixedUpdate => "rgb(34, 139, 34)",
        Phase::Draw => "rgb(255, 140, 0)",
        Phase::Swap => "rgb(169, 169, 169)",
    }
}

/// Fit `name` into `width` pixels, eliding with "..." when needed
///
/// Returns `None` when not even a short prefix fits.
pub fn get_truncated_name(name: &str, width: f64) -> Option<String> {
    if width <= 35.0 {
        return None;
    }
    let max_chars = ((width - 8.0) / CHAR_WIDTH) as usize;
    let len = name.chars().count();
    if len <= max_chars {
        Some(name.to_string())
    } else if max_chars > 3 {
        let head: String = name.chars().take(max_chars - 3).collect();
        Some(format!("{}...", head))
    } else {
        None
    }
}

#[allow(clippy::too_many_arguments)]
fn render_span(
    span: &SpanSnapshot,
    phase: Phase,
    level: usize,
    x: f64,
    w: f64,
    ms_to_px: f64,
    graph_height: usize,
    out: &mut String,
) {
    if w < 0.5 {
        return;
    }

    // Inverted: roots on the bottom row
    let y = graph_height - (level + 1) * ROW_HEIGHT + TITLE_MARGIN;

    out.push_str(&format!(
        r#"<rect x="{:.2}" y="{}" width="{:.2}" height="{}" fill="{}" class="span"><title>{} ({:.3} ms) {}</title></rect>"#,
        x,
        y,
        w,
        ROW_HEIGHT,
        phase_color(phase),
        escape(&span.name),
        span.current_ms,
        escape(&span.description)
    ));

    if let Some(label) = get_truncated_name(&span.name, w) {
        out.push_str(&format!(
            r#"<text x="{:.2}" y="{}" dx="4" dy="14" font-size="12" fill="white" pointer-events="none">{}</text>"#,
            x,
            y,
            escape(&label)
        ));
    }

    let mut child_x = x;
    let right_edge = x + w;
    for child in &span.children {
        let child_w = (child.current_ms * ms_to_px).min(right_edge - child_x);
        if child_w <= 0.0 {
            break;
        }
        render_span(child, phase, level + 1, child_x, child_w, ms_to_px, graph_height, out);
        child_x += child_w;
    }
}

fn render_legend(out: &mut String, top: usize) {
    let legend_y = top + 30;
    out.push_str(&format!(
        r#"<text x="10" y="{}" font-size="14" font-weight="bold">Phases:</text>"#,
        legend_y
    ));
    for (i, phase) in Phase::ALL.iter().enumerate() {
        let x = 80 + i * 130;
        out.push_str(&format!(
            r#"<rect x="{}" y="{}" width="15" height="15" fill="{}" rx="2"/><text x="{}" y="{}" font-size="12">{}</text>"#,
            x,
            legend_y - 12,
            phase_color(*phase),
            x + 20,
            legend_y,
            phase.name()
        ));
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
