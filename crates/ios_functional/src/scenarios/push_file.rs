//! Pushing a local asset into the app sandbox
//!
//! All scenarios share one session.

use async_trait::async_trait;
use tracing::debug;

use crate::driver::RemoteDriver;
use crate::harness::{FixtureScope, Scenario, ScenarioContext, ScenarioResult, Suite};

/// Asset pushed to the device, also used as the destination path
pub const FILE_NAME: &str = "test_image.jpg";

pub struct PushFileTests;

impl Suite for PushFileTests {
    fn name(&self) -> &'static str {
        "PushFileTests"
    }

    fn app(&self) -> &'static str {
        "UICatalog.app.zip"
    }

    fn scope(&self) -> FixtureScope {
        FixtureScope::PerSuite
    }

    fn scenarios(&self) -> Vec<Box<dyn Scenario>> {
        vec![Box::new(PushFileScenario::PushFile)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushFileScenario {
    PushFile,
}

#[async_trait]
impl Scenario for PushFileScenario {
    fn name(&self) -> &'static str {
        match self {
            PushFileScenario::PushFile => "test_push_file",
        }
    }

    async fn run(&self, driver: &dyn RemoteDriver, ctx: &ScenarioContext) -> ScenarioResult {
        match self {
            PushFileScenario::PushFile => push_file(driver, ctx).await,
        }
    }
}

pub async fn push_file(driver: &dyn RemoteDriver, ctx: &ScenarioContext) -> ScenarioResult {
    let source = ctx.asset(FILE_NAME);
    debug!("Pushing {}", source.display());
    driver.push_file(FILE_NAME, &source).await?;
    Ok(())
}
