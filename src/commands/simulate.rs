//! Simulate command implementation.
//!
//! The simulate command:
//! 1. Builds a profiler on a manually advanced clock
//! 2. Drives a synthetic four-phase workload for N frames
//! 3. Takes a snapshot
//! 4. Writes the JSON snapshot, and the SVG flame view if requested
//!
//! The workload is deterministic: every frame lasts exactly one 60 Hz frame,
//! with the slack spent waiting in the swap phase (or in draw on frames that
//! skip the swap).

use super::models::SimulateArgs;
use crate::flamegraph::generate_flamegraph;
use crate::output::schema::ProfileSnapshot;
use crate::output::{generate_text_summary, render_overlay, write_snapshot, write_svg, LogSource};
use crate::profiler::{Clock, FrameLoop, LoopHandler, ManualClock, Profiler};
use crate::utils::config::ProfilerConfig;
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

const FRAME_SECONDS: f64 = 1.0 / 60.0;
const MS: f64 = 0.001;

/// Synthetic game loop advancing a shared manual clock
struct SyntheticWorkload {
    clock: ManualClock,
    frame: u64,
    frame_start: f64,
    log: Vec<String>,
}

impl SyntheticWorkload {
    fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            frame: 0,
            frame_start: 0.0,
            log: Vec::new(),
        }
    }

    /// Deterministic per-frame variation in `0..0.6` ms
    fn jitter(&self, salt: u64) -> f64 {
        ((self.frame.wrapping_mul(7919) + salt * 104_729) % 13) as f64 * 0.05 * MS
    }

    fn work(&self, ms: f64) {
        self.clock.advance(ms * MS);
    }

    fn skips_swap(&self) -> bool {
        self.frame % 4 == 3
    }

    fn wait_for_vsync(&self) {
        let elapsed = self.clock.now_seconds() - self.frame_start;
        if elapsed < FRAME_SECONDS {
            self.clock.advance(FRAME_SECONDS - elapsed);
        }
    }

    fn next_frame(&mut self) {
        self.frame += 1;
        self.frame_start = self.clock.now_seconds();
    }

    fn log_text(&self) -> String {
        self.log.join("\n")
    }
}

impl LoopHandler<ManualClock> for SyntheticWorkload {
    fn fixed_update(&mut self, profiler: &mut Profiler<ManualClock>, _step: f64) {
        profiler.with_mark("Physics", "Rigid body integration", |p| {
            self.work(0.8);
            self.clock.advance(self.jitter(1));
            p.with_mark("Collisions", "Broadphase and contact solving", |_| self.work(0.4));
        });
    }

    fn update(&mut self, profiler: &mut Profiler<ManualClock>, _delta: f64) {
        profiler.with_mark("Input", "Polling devices and dispatching events", |_| self.work(0.2));

        profiler.with_mark("AI", "Agent decision making", |p| {
            self.work(1.0);
            if self.frame % 3 == 0 {
                p.with_mark("Pathfinding", "A* over the navigation mesh", |_| {
                    self.work(0.8);
                    self.clock.advance(self.jitter(2));
                });
            }
        });

        // Interpolation shares the "Physics" history with fixed updates
        profiler.with_mark("Physics", "Rigid body integration", |_| self.work(0.3));

        profiler.with_mark("Audio", "Mixing and streaming", |_| self.work(0.25));

        if self.frame % 60 == 0 {
            self.log.push(format!("frame {}: checkpoint", self.frame));
        }
    }

    fn draw(&mut self, profiler: &mut Profiler<ManualClock>) {
        profiler.with_mark("Scene", "Opaque and transparent passes", |p| {
            self.work(3.0);
            self.clock.advance(self.jitter(3));
            p.with_mark("Shadows", "Shadow map rendering", |_| self.work(1.0));
        });
        profiler.with_mark("Overlay", "Debug overlay and HUD", |_| self.work(0.5));

        if self.skips_swap() {
            self.wait_for_vsync();
        }
    }

    fn wants_swap(&self) -> bool {
        !self.skips_swap()
    }

    fn swap(&mut self, _profiler: &mut Profiler<ManualClock>) {
        self.wait_for_vsync();
    }
}

/// Execute the simulate command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The snapshot that was written
///
/// # Errors
/// * Invalid arguments
/// * Flame view generation failures
/// * File write errors
pub fn execute_simulate(args: SimulateArgs) -> Result<ProfileSnapshot> {
    let start_time = Instant::now();

    validate_args(&args)?;

    info!("Simulating {} frames ({}s sampling window)", args.frames, args.sample_rate);

    // Step 1: Build profiler
    info!("Step 1/4: Creating profiler...");
    let clock = ManualClock::new();
    let config = ProfilerConfig::new()
        .with_sample_rate(args.sample_rate)
        .with_shown(args.print_overlay);
    let mut profiler =
        Profiler::with_clock(config, clock.clone()).context("Failed to create profiler")?;

    // Step 2: Drive frames
    info!("Step 2/4: Driving synthetic workload...");
    let fixed_step = if args.fixed_steps > 0 {
        1.0 / f64::from(args.fixed_steps)
    } else {
        0.0
    };
    let mut driver = FrameLoop::new(fixed_step);
    let mut workload = SyntheticWorkload::new(clock);
    let mut rotations = 0;

    for _ in 0..args.frames {
        let report = driver.run_frame(&mut profiler, &mut workload, FRAME_SECONDS);
        if let Some(rotation) = report.rotation {
            rotations += 1;
            debug!(
                "Frame {}: rotation into slot {} ({:.1} FPS)",
                report.frame, rotation.slot, rotation.fps
            );
        }
        workload.next_frame();
    }

    info!(
        "Drove {} frames, {} rotations, {} span names",
        profiler.frames(),
        rotations,
        profiler.aggregator().len()
    );

    // Step 3: Snapshot
    info!("Step 3/4: Taking snapshot...");
    let snapshot = profiler.snapshot();

    // Step 4: Write outputs
    info!("Step 4/4: Writing output files...");
    write_snapshot(&snapshot, &args.output_json).context("Failed to write snapshot JSON")?;
    info!("✓ Snapshot written to: {}", args.output_json.display());

    if let Some(svg_path) = &args.output_svg {
        let svg = generate_flamegraph(&snapshot, args.flamegraph_config.as_ref())
            .context("Failed to generate flame view")?;
        write_svg(&svg, svg_path).context("Failed to write flame view SVG")?;
        info!("✓ Flame view written to: {}", svg_path.display());
    }

    if args.print_overlay {
        let log = workload.log_text();
        println!("{}", render_overlay(&snapshot, Some(&log as &dyn LogSource)));
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(74));
        println!("FRAME PROFILE SUMMARY");
        println!("{}", "=".repeat(74));
        println!("{}", generate_text_summary(&snapshot, 15));
        println!("{}", "=".repeat(74));
    }

    let elapsed = start_time.elapsed();
    info!("Simulation completed in {:.2}s", elapsed.as_secs_f64());

    Ok(snapshot)
}

/// Validate simulate arguments
///
/// **Public** - can be called before execute_simulate for early validation
pub fn validate_args(args: &SimulateArgs) -> Result<()> {
    if args.frames == 0 {
        anyhow::bail!("frames must be greater than 0");
    }

    if args.frames > 1_000_000 {
        anyhow::bail!("frames is too large (max 1000000)");
    }

    if args.fixed_steps > 1000 {
        anyhow::bail!("fixed_steps is too large (max 1000 per second)");
    }

    ProfilerConfig::new()
        .with_sample_rate(args.sample_rate)
        .validate()?;

    if let Some(config) = &args.flamegraph_config {
        if config.width == 0 {
            anyhow::bail!("flame view width must be greater than 0");
        }
    }

    Ok(())
}
