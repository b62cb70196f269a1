//! Suite and scenario definitions

use async_trait::async_trait;

use super::assertions::ScenarioResult;
use super::context::ScenarioContext;
use super::fixture::FixtureScope;
use crate::driver::RemoteDriver;

/// What the runner should expect from a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expectation {
    #[default]
    Pass,
    /// Kept as a regression marker: the assertion is known to fail today
    KnownFailure,
}

/// One self-contained behaviour exercised end to end
#[async_trait]
pub trait Scenario: Send + Sync {
    fn name(&self) -> &'static str;

    fn expectation(&self) -> Expectation {
        Expectation::Pass
    }

    async fn run(&self, driver: &dyn RemoteDriver, ctx: &ScenarioContext) -> ScenarioResult;
}

/// A named group of scenarios sharing a fixture
pub trait Suite: Send + Sync {
    fn name(&self) -> &'static str;

    /// Capability lookup key (app file name or bundle id)
    fn app(&self) -> &'static str;

    fn scope(&self) -> FixtureScope;

    fn scenarios(&self) -> Vec<Box<dyn Scenario>>;
}
