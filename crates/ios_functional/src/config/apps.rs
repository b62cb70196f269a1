//! App file name to bundle identifier mappings for the sample apps

use phf::phf_map;

/// Bundle identifier of the UICatalog sample app.
///
/// Also used as a lookup key: asking for capabilities with this value targets
/// the already-installed app by bundle id instead of installing a file.
pub const BUNDLE_ID: &str = "com.example.apple-samplecode.UICatalog";

/// Known app archives and the bundle identifier each one installs
pub static APP_BUNDLES: phf::Map<&'static str, &'static str> = phf_map! {
    "UICatalog.app.zip" => BUNDLE_ID,
    "UICatalog.app" => BUNDLE_ID,
    "TestApp.app.zip" => "io.appium.TestApp",
    "TestApp.app" => "io.appium.TestApp",
};

/// Get the bundle identifier installed by an app file
pub fn get_bundle_id(app_file: &str) -> Option<&'static str> {
    APP_BUNDLES.get(app_file).copied()
}

/// Get the first known app file that installs the given bundle identifier
pub fn get_app_file(bundle_id: &str) -> Option<&'static str> {
    let mut files: Vec<&'static str> = APP_BUNDLES
        .entries()
        .filter(|(_, id)| **id == bundle_id)
        .map(|(file, _)| *file)
        .collect();
    files.sort();
    files.into_iter().next()
}

/// List all known app files
pub fn list_supported_apps() -> Vec<&'static str> {
    APP_BUNDLES.keys().copied().collect()
}
