use crate::flamegraph::FlamegraphConfig;
use std::path::PathBuf;

/// Arguments for the simulate command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct SimulateArgs {
    /// Number of frames to drive through the profiler
    pub frames: u64,

    /// Seconds per sampling window
    pub sample_rate: f64,

    /// Fixed update steps per second (0 disables fixed updates)
    pub fixed_steps: u32,

    /// Output path for the JSON snapshot
    pub output_json: PathBuf,

    /// Output path for the SVG flame view (optional)
    pub output_svg: Option<PathBuf>,

    /// Flame view configuration
    pub flamegraph_config: Option<FlamegraphConfig>,

    /// Print the hottest-spans table to stdout
    pub print_summary: bool,

    /// Print the text overlay (frame times and log) to stdout
    pub print_overlay: bool,
}

impl Default for SimulateArgs {
    fn default() -> Self {
        Self {
            frames: 300,
            sample_rate: 0.5,
            fixed_steps: 50,
            output_json: PathBuf::from("snapshot.json"),
            output_svg: None,
            flamegraph_config: None,
            print_summary: false,
            print_overlay: false,
        }
    }
}
