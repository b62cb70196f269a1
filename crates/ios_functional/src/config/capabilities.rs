//! Desired capabilities for the iOS simulator sessions

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::env;
use std::path::{Path, PathBuf};

use super::apps::{get_app_file, get_bundle_id};
use crate::error::{DriverError, Result};

/// Capability set sent when a session is requested.
///
/// Built once by [`get_desired_capabilities`]; there is no way to change it
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Capabilities(Map<String, Value>);

impl Capabilities {
    /// Look up a capability by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Look up a string capability by name
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Target platform version, as configured
    pub fn platform_version(&self) -> Option<&str> {
        self.get_str("platformVersion")
    }

    /// Platform version as a number, e.g. `"11.4"` → `11.4`.
    ///
    /// Only the major and minor components are read, so `"12.4.1"` is `12.4`.
    /// A missing or unparsable version is a [`DriverError::Protocol`] error.
    pub fn platform_version_number(&self) -> Result<f64> {
        let version = self
            .platform_version()
            .ok_or_else(|| DriverError::Protocol("no platformVersion capability".to_string()))?
            .trim();
        let major_minor: Vec<&str> = version.splitn(3, '.').take(2).collect();
        major_minor.join(".").parse::<f64>().map_err(|_| {
            DriverError::Protocol(format!("unparsable platformVersion {:?}", version))
        })
    }

    /// Bundle identifier targeted by this capability set, if any
    pub fn bundle_id(&self) -> Option<&str> {
        self.get_str("bundleId")
    }

    /// Capability set as a JSON value
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for Capabilities {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Directory holding the app archives, honouring `APPIUM_APPS_DIR`
pub fn apps_dir() -> PathBuf {
    match env::var("APPIUM_APPS_DIR") {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("apps"),
    }
}

/// Build the desired capabilities for a session.
///
/// # Arguments
/// * `app` - A bundle identifier from the app table targets the installed app
///   (`bundleId`); an app file from the table is installed from [`apps_dir`]
///   (`app`); `None` only carries the platform entries.
///
/// # Returns
/// The capability set, or [`DriverError::UnknownApp`] when `app` is in
/// neither column of the app table.
pub fn get_desired_capabilities(app: Option<&str>) -> Result<Capabilities> {
    let wda_port = env::var("WDA_PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(8100);

    let mut caps = Map::new();
    caps.insert("platformName".to_string(), json!("iOS"));
    caps.insert("automationName".to_string(), json!("XCUITest"));
    caps.insert(
        "deviceName".to_string(),
        json!(env_or("IPHONE_MODEL", "iPhone 8")),
    );
    caps.insert(
        "platformVersion".to_string(),
        json!(env_or("PLATFORM_VERSION", "11.4")),
    );
    caps.insert("allowTouchIdEnroll".to_string(), json!(true));
    caps.insert("wdaLocalPort".to_string(), json!(wda_port));
    caps.insert("simpleIsVisibleCheck".to_string(), json!(true));

    match app {
        Some(id) if get_app_file(id).is_some() => {
            caps.insert("bundleId".to_string(), json!(id));
        }
        Some(file) if get_bundle_id(file).is_some() => {
            let path = apps_dir().join(file);
            caps.insert("app".to_string(), json!(path.to_string_lossy()));
        }
        Some(unknown) => return Err(DriverError::UnknownApp(unknown.to_string())),
        None => {}
    }

    Ok(Capabilities(caps))
}
