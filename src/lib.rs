//! Frame Profiler
//!
//! Hierarchical timing instrumentation for real-time application loops.
//!
//! Code running inside a frame marks named spans with `push_mark` /
//! `pop_mark`. Marks nest by call order into one span tree per loop phase
//! (Update, Fixed Update, Draw, Swap). At every frame boundary the trees are
//! folded into a per-name rolling history that is resampled every
//! `sample_rate` seconds into a 50-entry ring of per-frame averages.
//!
//! ## Getting Started
//!
//! ```
//! use frame_profiler::profiler::Profiler;
//! use frame_profiler::span::Phase;
//! use frame_profiler::utils::config::ProfilerConfig;
//!
//! let mut profiler = Profiler::new(ProfilerConfig::new()).unwrap();
//!
//! profiler.enter_phase(Phase::Update);
//! profiler.with_mark("AI", "Agent decision making", |_| {
//!     // update agents
//! });
//! profiler.enter_phase(Phase::Draw);
//! profiler.end_frame(1.0 / 60.0);
//!
//! assert!(profiler.aggregator().history("AI").is_some());
//! ```

pub mod aggregator;
pub mod commands;
pub mod flamegraph;
pub mod output;
pub mod profiler;
pub mod span;
pub mod utils;
