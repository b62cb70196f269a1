//! ios_functional: functional scenarios for the UICatalog iOS sample app
//!
//! The scenarios drive an Appium server through its remote-control protocol:
//! - screen lock and screen recording
//! - app state, backgrounding and activation
//! - shake, Touch ID simulation and hardware buttons
//! - on-screen keyboard visibility and text-field clearing
//! - pushing a file into the app sandbox
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ios_functional::{AppiumConnector, AppiumTests, SuiteRunner};
//!
//! #[tokio::main]
//! async fn main() {
//!     let runner = SuiteRunner::new(Arc::new(AppiumConnector::default()));
//!     let report = runner.run(&AppiumTests).await;
//!     print!("{}", report.render());
//! }
//! ```

// Core modules
pub mod error;

// Configuration module
pub mod config;

// Remote protocol client
pub mod driver;

// Fixture, runner and suites
pub mod harness;
pub mod scenarios;

pub use error::{DriverError, Result};

pub use config::{
    get_desired_capabilities, server_url, Capabilities, TimingConfig, BUNDLE_ID,
    DEFAULT_SERVER_URL, TIMING_CONFIG,
};

pub use driver::{
    AppiumSession, ApplicationState, ElementRef, HideKeyboard, Locator, RemoteDriver,
};

pub use harness::{
    AppiumConnector, Expectation, FixtureScope, Outcome, RecordingSaver, Scenario,
    ScenarioContext, ScenarioError, ScenarioResult, SessionFactory, Suite, SuiteReport,
    SuiteRunner,
};

pub use scenarios::{all_suites, suite_by_key, AppiumTests, PushFileTests, SUITE_KEYS};
