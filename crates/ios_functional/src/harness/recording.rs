//! Persisting screen recordings returned by the server

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::error::{DriverError, Result};

/// Writes recordings into a timestamped run directory
#[derive(Debug, Clone)]
pub struct RecordingSaver {
    /// Run directory (created when the saver is created)
    run_dir: PathBuf,
}

impl RecordingSaver {
    /// Create a new RecordingSaver
    ///
    /// Creates a run subdirectory with format: `yyyy-mm-dd_HH-MM-SS-mmm`
    ///
    /// # Arguments
    /// * `base_dir` - Artifacts directory the run directory is created in
    ///
    /// # Returns
    /// A saver writing into the new run directory
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let started: DateTime<Local> = Local::now();
        let run_dir = base_dir
            .as_ref()
            .join(started.format("%Y-%m-%d_%H-%M-%S-%3f").to_string());

        fs::create_dir_all(&run_dir).await.map_err(DriverError::Io)?;

        info!("Recording directory: {}", run_dir.display());

        Ok(Self { run_dir })
    }

    /// Save a recording to the run directory
    ///
    /// Filename format: `<scenario>.mp4`
    ///
    /// # Arguments
    /// * `scenario` - Name of the scenario that produced the recording
    /// * `base64_data` - Base64-encoded video returned by the server
    ///
    /// # Returns
    /// Path of the written file
    pub async fn save(&self, scenario: &str, base64_data: &str) -> Result<PathBuf> {
        let file_path = self.run_dir.join(format!("{}.mp4", scenario));
        let video = general_purpose::STANDARD.decode(base64_data.trim())?;

        fs::write(&file_path, &video).await.map_err(DriverError::Io)?;

        debug!(
            "Saved recording: {} ({} bytes)",
            file_path.display(),
            video.len()
        );

        Ok(file_path)
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }
}
