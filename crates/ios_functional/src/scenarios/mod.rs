//! The functional suites
//!
//! - `appium`: `AppiumTests`, one session per scenario
//! - `push_file`: `PushFileTests`, one session for the whole suite

pub mod appium;
pub mod push_file;

pub use appium::{AppiumScenario, AppiumTests};
pub use push_file::{PushFileScenario, PushFileTests};

use crate::harness::Suite;

/// Keys accepted by [`suite_by_key`]
pub const SUITE_KEYS: [&str; 2] = ["appium", "push-file"];

/// Look up a suite by its command-line key
pub fn suite_by_key(key: &str) -> Option<Box<dyn Suite>> {
    match key {
        "appium" => Some(Box::new(AppiumTests)),
        "push-file" => Some(Box::new(PushFileTests)),
        _ => None,
    }
}

/// Every suite, in run order
pub fn all_suites() -> Vec<Box<dyn Suite>> {
    SUITE_KEYS.iter().filter_map(|key| suite_by_key(key)).collect()
}
