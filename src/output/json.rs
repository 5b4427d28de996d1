//! JSON snapshot writer and reader.

use super::schema::ProfileSnapshot;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Write a snapshot to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_snapshot(
    snapshot: &ProfileSnapshot,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing snapshot to: {}", output_path.display());

    validate_output_path(output_path)?;
    create_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, snapshot).map_err(OutputError::SerializationFailed)?;

    info!(
        "Snapshot written successfully ({} phases, {} spans)",
        snapshot.phases.len(),
        snapshot.span_count()
    );

    Ok(())
}

/// Read a snapshot from a JSON file
///
/// **Public** - used by the validate command and tests
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_snapshot(input_path: impl AsRef<Path>) -> Result<ProfileSnapshot, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading snapshot from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let snapshot: ProfileSnapshot =
        serde_json::from_reader(BufReader::new(file)).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Snapshot loaded: version {}, {} frames",
        snapshot.version, snapshot.frames
    );

    Ok(snapshot)
}

/// Reject empty paths and directories
///
/// **Crate** - shared with the SVG writer
pub(crate) fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

pub(crate) fn create_parent_dirs(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::schema::{PhaseSnapshot, SpanSnapshot};
    use crate::span::Phase;
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    fn create_test_snapshot() -> ProfileSnapshot {
        ProfileSnapshot {
            version: "1.0.0".to_string(),
            generated_at: "2024-01-01T00:00:00Z".to_string(),
            frames: 120,
            fps: 60.0,
            sample_rate: 0.5,
            history_size: 50,
            time_shown: true,
            log_shown: false,
            phases: vec![PhaseSnapshot {
                phase: Phase::Draw,
                root: SpanSnapshot {
                    name: "Draw".to_string(),
                    description: "drawing".to_string(),
                    history_id: 2,
                    current_ms: 5.5,
                    frame_ms: 5.25,
                    history: vec![5.0, 5.5],
                    peak_ms: 5.5,
                    mean_ms: 0.25,
                    children: Vec::new(),
                },
            }],
        }
    }

    #[test]
    fn test_write_and_read_snapshot() {
        let snapshot = create_test_snapshot();
        let temp_file = NamedTempFile::new().unwrap();

        write_snapshot(&snapshot, temp_file.path()).unwrap();
        let loaded = read_snapshot(temp_file.path()).unwrap();

        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_validate_output_path_empty() {
        assert!(validate_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(validate_output_path(temp_dir.path()).is_err());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/snapshot.json");

        write_snapshot(&create_test_snapshot(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_read_rejects_garbage() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "{ not json").unwrap();

        let result = read_snapshot(temp_file.path());
        assert!(matches!(result, Err(OutputError::SerializationFailed(_))));
    }
}
