//! Configuration module for ios_functional
//!
//! This module contains:
//! - `apps`: App file name to bundle identifier mappings
//! - `capabilities`: Desired capabilities provider
//! - `server`: Automation server endpoint
//! - `timing`: Blind waits and command timeout

mod apps;
mod capabilities;
mod server;
mod timing;

pub use apps::{get_app_file, get_bundle_id, list_supported_apps, APP_BUNDLES, BUNDLE_ID};
pub use capabilities::{apps_dir, get_desired_capabilities, Capabilities};
pub use server::{server_url, DEFAULT_SERVER_URL};
pub use timing::{TimingConfig, TIMING_CONFIG};
