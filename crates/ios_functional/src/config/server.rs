//! Automation server endpoint

use std::env;

/// Local Appium endpoint the suites connect to
pub const DEFAULT_SERVER_URL: &str = "http://localhost:4723/wd/hub";

/// Resolve the server URL, honouring `APPIUM_SERVER_URL`
pub fn server_url() -> String {
    env::var("APPIUM_SERVER_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
}
