//! Scenario results and assertion helpers

use std::fmt::Debug;
use thiserror::Error;

use crate::error::DriverError;

/// Why a scenario stopped early
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// An expectation about observed state did not hold
    #[error("{0}")]
    Assertion(String),

    /// A remote command failed before the scenario could check anything
    #[error(transparent)]
    Command(#[from] DriverError),

    /// The scenario body panicked
    #[error("{0}")]
    Panicked(String),
}

impl ScenarioError {
    pub fn is_assertion(&self) -> bool {
        matches!(self, ScenarioError::Assertion(_))
    }
}

pub type ScenarioResult = std::result::Result<(), ScenarioError>;

fn failure(detail: String, what: &str) -> ScenarioError {
    if what.is_empty() {
        ScenarioError::Assertion(detail)
    } else {
        ScenarioError::Assertion(format!("{} : {}", detail, what))
    }
}

pub fn assert_true(value: bool, what: &str) -> ScenarioResult {
    if value {
        Ok(())
    } else {
        Err(failure("false is not true".to_string(), what))
    }
}

pub fn assert_false(value: bool, what: &str) -> ScenarioResult {
    if value {
        Err(failure("true is not false".to_string(), what))
    } else {
        Ok(())
    }
}

pub fn assert_equal<T: PartialEq + Debug>(actual: T, expected: T, what: &str) -> ScenarioResult {
    if actual == expected {
        Ok(())
    } else {
        Err(failure(format!("{:?} != {:?}", actual, expected), what))
    }
}

pub fn assert_less<T: PartialOrd + Debug>(actual: T, bound: T, what: &str) -> ScenarioResult {
    if actual < bound {
        Ok(())
    } else {
        Err(failure(format!("{:?} is not less than {:?}", actual, bound), what))
    }
}
