//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Stack discipline violations are not represented here: they are caller
//! bugs and abort through a panic at the point of misuse.

use thiserror::Error;

/// Errors that can occur while building a profiler from configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Sample rate must be a positive number of seconds, got {0}")]
    InvalidSampleRate(f64),

    #[error("Invalid flamegraph width: {0}")]
    InvalidWidth(usize),
}

/// Errors that can occur during flamegraph generation
#[derive(Error, Debug)]
pub enum FlamegraphError {
    #[error("Snapshot has no sampled time to draw")]
    EmptySnapshot,

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
