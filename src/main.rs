//! Frame Profiler CLI
//!
//! Drives the profiler through a synthetic game loop and inspects the
//! snapshots it writes.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use frame_profiler::commands::{
    display_schema, display_version, execute_simulate, validate_snapshot_file, SimulateArgs,
};
use frame_profiler::flamegraph::FlamegraphConfig;
use frame_profiler::utils::config::DEFAULT_SAMPLE_RATE;

/// Frame Profiler - hierarchical frame timing with rolling history
#[derive(Parser, Debug)]
#[command(name = "frame-profiler")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a synthetic four-phase workload through the profiler
    Simulate {
        /// Number of frames to simulate
        #[arg(short = 'n', long, default_value = "300")]
        frames: u64,

        /// Seconds per sampling window
        #[arg(short, long, default_value_t = DEFAULT_SAMPLE_RATE)]
        sample_rate: f64,

        /// Fixed update steps per second (0 disables fixed updates)
        #[arg(long, default_value = "50")]
        fixed_steps: u32,

        /// Output path for the JSON snapshot
        #[arg(short, long, default_value = "snapshot.json")]
        output: PathBuf,

        /// Output path for the SVG flame view (optional)
        #[arg(short, long)]
        flamegraph: Option<PathBuf>,

        /// Flame view title
        #[arg(long)]
        title: Option<String>,

        /// Flame view width in pixels
        #[arg(long, default_value = "1200")]
        width: usize,

        /// Print the hottest-spans table to stdout
        #[arg(long)]
        summary: bool,

        /// Print the text overlay (frame times and log) to stdout
        #[arg(long)]
        overlay: bool,
    },

    /// Validate a snapshot JSON file
    Validate {
        /// Path to snapshot JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Simulate {
            frames,
            sample_rate,
            fixed_steps,
            output,
            flamegraph,
            title,
            width,
            summary,
            overlay,
        } => {
            let fg_config = flamegraph.as_ref().map(|_| {
                let config = FlamegraphConfig::new().with_width(width);
                match title {
                    Some(title) => config.with_title(title),
                    None => config,
                }
            });

            let args = SimulateArgs {
                frames,
                sample_rate,
                fixed_steps,
                output_json: output,
                output_svg: flamegraph,
                flamegraph_config: fg_config,
                print_summary: summary,
                print_overlay: overlay,
            };

            execute_simulate(args)?;
        }

        Commands::Validate { file } => {
            validate_snapshot_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
