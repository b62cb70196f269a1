//! Session fixture and sequential runner for the functional suites
//!
//! This module provides:
//! - `assertions`: Scenario results and assertion helpers
//! - `context`: Read-only state handed to every scenario
//! - `fixture`: Session factory and fixture scopes
//! - `recording`: Saving screen recordings to disk
//! - `runner`: Suite execution and unittest-style reports
//! - `suite`: Suite and scenario traits

mod assertions;
mod context;
mod fixture;
mod recording;
mod runner;
mod suite;

pub use assertions::{
    assert_equal, assert_false, assert_less, assert_true, ScenarioError, ScenarioResult,
};
pub use context::{default_assets_dir, ScenarioContext};
pub use fixture::{AppiumConnector, FixtureScope, SessionFactory};
pub use recording::RecordingSaver;
pub use runner::{Outcome, ScenarioReport, SuiteReport, SuiteRunner};
pub use suite::{Expectation, Scenario, Suite};
