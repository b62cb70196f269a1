//! Read-only state shared by the scenarios of one run

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::recording::RecordingSaver;
use crate::config::{
    get_bundle_id, get_desired_capabilities, Capabilities, TimingConfig, TIMING_CONFIG,
};
use crate::error::Result;

/// Everything a scenario needs besides the driver
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    /// Capabilities the session was opened with
    pub capabilities: Capabilities,
    /// Capabilities looked up by bundle id, used for version checks
    pub bundle_capabilities: Capabilities,
    /// Directory the local test assets are read from
    pub assets_dir: PathBuf,
    pub timing: TimingConfig,
    pub recordings: Option<RecordingSaver>,
}

impl ScenarioContext {
    /// Context whose version checks read the session capabilities themselves
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            bundle_capabilities: capabilities.clone(),
            capabilities,
            assets_dir: default_assets_dir(),
            timing: TIMING_CONFIG.clone(),
            recordings: None,
        }
    }

    /// Build the context for a suite's capability key.
    ///
    /// # Arguments
    /// * `app` - App file or bundle identifier from the app table
    ///
    /// # Returns
    /// A context with session capabilities for `app`, and version-check
    /// capabilities for the bundle identifier `app` installs
    pub fn for_app(app: &str) -> Result<Self> {
        let capabilities = get_desired_capabilities(Some(app))?;
        let bundle_id = get_bundle_id(app).unwrap_or(app);
        let bundle_capabilities = get_desired_capabilities(Some(bundle_id))?;
        Ok(Self::new(capabilities).with_bundle_capabilities(bundle_capabilities))
    }

    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = dir.into();
        self
    }

    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_recordings(mut self, saver: RecordingSaver) -> Self {
        self.recordings = Some(saver);
        self
    }

    pub fn with_bundle_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.bundle_capabilities = capabilities;
        self
    }

    /// Whether the target platform is at least `major`.
    ///
    /// An unreadable version is an error, not a skip.
    pub fn platform_at_least(&self, major: f64) -> Result<bool> {
        Ok(self.bundle_capabilities.platform_version_number()? >= major)
    }

    /// Path of a local test asset
    pub fn asset(&self, name: &str) -> PathBuf {
        self.assets_dir.join(name)
    }

    pub fn recording_wait(&self) -> Duration {
        self.timing.recording_wait()
    }

    pub fn keyboard_settle_wait(&self) -> Duration {
        self.timing.keyboard_settle_wait()
    }
}

/// `tests/file` next to this crate's manifest
pub fn default_assets_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("file")
}
