//! Sequential suite runner with unittest-style reporting

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::assertions::{ScenarioError, ScenarioResult};
use super::context::ScenarioContext;
use super::fixture::{self, FixtureScope, SessionFactory};
use super::recording::RecordingSaver;
use super::suite::{Expectation, Scenario, Suite};
use crate::driver::RemoteDriver;
use crate::error::Result;

/// Result of one scenario (or of a suite-level fixture step)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    /// An assertion did not hold
    Failed(String),
    /// A remote command, the fixture, or the scenario itself broke
    Errored(String),
    /// A known-failing scenario failed as expected
    ExpectedFailure(String),
    /// A known-failing scenario passed
    UnexpectedSuccess,
}

impl Outcome {
    fn from_result(expectation: Expectation, result: ScenarioResult) -> Self {
        match (expectation, result) {
            (Expectation::Pass, Ok(())) => Outcome::Passed,
            (Expectation::Pass, Err(ScenarioError::Assertion(m))) => Outcome::Failed(m),
            (Expectation::KnownFailure, Ok(())) => Outcome::UnexpectedSuccess,
            (Expectation::KnownFailure, Err(ScenarioError::Assertion(m))) => {
                Outcome::ExpectedFailure(m)
            }
            (_, Err(e)) => Outcome::Errored(e.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Passed | Outcome::ExpectedFailure(_))
    }

    /// Short label printed after the scenario name
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Passed => "ok",
            Outcome::Failed(_) => "FAIL",
            Outcome::Errored(_) => "ERROR",
            Outcome::ExpectedFailure(_) => "expected failure",
            Outcome::UnexpectedSuccess => "unexpected success",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub name: String,
    pub outcome: Outcome,
    pub elapsed: Duration,
    /// Fixture setup/teardown entry rather than a scenario run
    pub fixture: bool,
}

impl ScenarioReport {
    pub fn line(&self, suite: &str) -> String {
        format!("{} ({}) ... {}", self.name, suite, self.outcome.label())
    }
}

#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub suite: String,
    pub results: Vec<ScenarioReport>,
    pub elapsed: Duration,
}

impl SuiteReport {
    pub fn tests_run(&self) -> usize {
        self.results.iter().filter(|r| !r.fixture).count()
    }

    pub fn failures(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    pub fn errors(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Errored(_)))
    }

    pub fn expected_failures(&self) -> usize {
        self.count(|o| matches!(o, Outcome::ExpectedFailure(_)))
    }

    pub fn unexpected_successes(&self) -> usize {
        self.count(|o| matches!(o, Outcome::UnexpectedSuccess))
    }

    pub fn was_successful(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_success())
    }

    pub fn outcome_of(&self, name: &str) -> Option<&Outcome> {
        self.results
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.outcome)
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }

    /// Failure details followed by the run summary
    pub fn render(&self) -> String {
        let mut out = String::new();

        for report in &self.results {
            let (kind, detail) = match &report.outcome {
                Outcome::Failed(m) => ("FAIL", m.as_str()),
                Outcome::Errored(m) => ("ERROR", m.as_str()),
                _ => continue,
            };
            out.push_str(&"=".repeat(70));
            out.push('\n');
            out.push_str(&format!("{}: {} ({})\n", kind, report.name, self.suite));
            out.push_str(&"-".repeat(70));
            out.push('\n');
            out.push_str(detail);
            out.push_str("\n\n");
        }

        out.push_str(&"-".repeat(70));
        out.push('\n');
        let tests = self.tests_run();
        out.push_str(&format!(
            "Ran {} test{} in {:.3}s\n\n",
            tests,
            if tests == 1 { "" } else { "s" },
            self.elapsed.as_secs_f64()
        ));

        let mut details = Vec::new();
        if self.failures() > 0 {
            details.push(format!("failures={}", self.failures()));
        }
        if self.errors() > 0 {
            details.push(format!("errors={}", self.errors()));
        }
        if self.expected_failures() > 0 {
            details.push(format!("expected failures={}", self.expected_failures()));
        }
        if self.unexpected_successes() > 0 {
            details.push(format!(
                "unexpected successes={}",
                self.unexpected_successes()
            ));
        }

        let status = if self.was_successful() { "OK" } else { "FAILED" };
        if details.is_empty() {
            out.push_str(status);
        } else {
            out.push_str(&format!("{} ({})", status, details.join(", ")));
        }
        out.push('\n');
        out
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("scenario panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("scenario panicked: {}", s)
    } else {
        "scenario panicked".to_string()
    }
}

/// Run a scenario body, turning a panic into an error so teardown still runs
async fn run_body(
    scenario: &dyn Scenario,
    driver: &dyn RemoteDriver,
    ctx: &ScenarioContext,
) -> ScenarioResult {
    match AssertUnwindSafe(scenario.run(driver, ctx)).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(ScenarioError::Panicked(panic_message(payload))),
    }
}

/// Runs suites one scenario at a time
pub struct SuiteRunner {
    factory: Arc<dyn SessionFactory>,
    verbose: bool,
    filter: Option<String>,
    recordings: Option<RecordingSaver>,
}

impl SuiteRunner {
    pub fn new(factory: Arc<dyn SessionFactory>) -> Self {
        Self {
            factory,
            verbose: true,
            filter: None,
            recordings: None,
        }
    }

    /// Print one line per scenario as it finishes
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Only run scenarios whose name contains `filter`
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Save screen recordings produced by the scenarios
    pub fn with_recordings(mut self, saver: RecordingSaver) -> Self {
        self.recordings = Some(saver);
        self
    }

    /// Build the default context for `suite`
    pub fn context_for(&self, suite: &dyn Suite) -> Result<ScenarioContext> {
        let ctx = ScenarioContext::for_app(suite.app())?;
        Ok(match &self.recordings {
            Some(saver) => ctx.with_recordings(saver.clone()),
            None => ctx,
        })
    }

    /// Run `suite` with its default context.
    ///
    /// A suite whose capabilities cannot be built reports a single
    /// `setUpClass` error and runs nothing.
    pub async fn run(&self, suite: &dyn Suite) -> SuiteReport {
        match self.context_for(suite) {
            Ok(ctx) => self.run_with_context(suite, &ctx).await,
            Err(e) => {
                let began = Instant::now();
                let mut results = Vec::new();
                let outcome = Outcome::Errored(format!("setUpClass failed: {}", e));
                self.record(&mut results, suite, "setUpClass", outcome, began, true);
                SuiteReport {
                    suite: suite.name().to_string(),
                    results,
                    elapsed: began.elapsed(),
                }
            }
        }
    }

    pub async fn run_with_context(&self, suite: &dyn Suite, ctx: &ScenarioContext) -> SuiteReport {
        let scenarios: Vec<Box<dyn Scenario>> = suite
            .scenarios()
            .into_iter()
            .filter(|s| {
                self.filter
                    .as_deref()
                    .map_or(true, |f| s.name().contains(f))
            })
            .collect();

        info!(
            "Running {} scenario(s) from {}",
            scenarios.len(),
            suite.name()
        );

        let start = Instant::now();
        let mut results = Vec::new();

        match suite.scope() {
            FixtureScope::PerScenario => {
                for scenario in &scenarios {
                    let began = Instant::now();
                    let (outcome, teardown) = self.run_isolated(scenario.as_ref(), ctx).await;
                    self.record(&mut results, suite, scenario.name(), outcome, began, false);
                    if let Some(teardown) = teardown {
                        self.record(&mut results, suite, scenario.name(), teardown, began, true);
                    }
                }
            }
            FixtureScope::PerSuite => {
                if !scenarios.is_empty() {
                    self.run_shared(suite, &scenarios, ctx, &mut results).await;
                }
            }
        }

        SuiteReport {
            suite: suite.name().to_string(),
            results,
            elapsed: start.elapsed(),
        }
    }

    /// Open, run and quit one scenario.
    ///
    /// Returns the scenario outcome plus a separate teardown error when quit
    /// failed after the body had already failed.
    async fn run_isolated(
        &self,
        scenario: &dyn Scenario,
        ctx: &ScenarioContext,
    ) -> (Outcome, Option<Outcome>) {
        let driver = match fixture::open(self.factory.as_ref(), &ctx.capabilities).await {
            Ok(driver) => driver,
            Err(e) => return (Outcome::Errored(format!("setUp failed: {}", e)), None),
        };

        let result = run_body(scenario, driver.as_ref(), ctx).await;
        let teardown = fixture::close(driver).await;

        let outcome = Outcome::from_result(scenario.expectation(), result);
        match teardown {
            Ok(()) => (outcome, None),
            Err(e) => {
                let error = Outcome::Errored(format!("tearDown failed: {}", e));
                if outcome.is_success() {
                    (error, None)
                } else {
                    (outcome, Some(error))
                }
            }
        }
    }

    async fn run_shared(
        &self,
        suite: &dyn Suite,
        scenarios: &[Box<dyn Scenario>],
        ctx: &ScenarioContext,
        results: &mut Vec<ScenarioReport>,
    ) {
        let began = Instant::now();
        let driver = match fixture::open(self.factory.as_ref(), &ctx.capabilities).await {
            Ok(driver) => driver,
            Err(e) => {
                let outcome = Outcome::Errored(format!("setUpClass failed: {}", e));
                self.record(results, suite, "setUpClass", outcome, began, true);
                return;
            }
        };

        for scenario in scenarios {
            let began = Instant::now();
            let result = run_body(scenario.as_ref(), driver.as_ref(), ctx).await;
            let outcome = Outcome::from_result(scenario.expectation(), result);
            self.record(results, suite, scenario.name(), outcome, began, false);
        }

        let began = Instant::now();
        if let Err(e) = fixture::close(driver).await {
            let outcome = Outcome::Errored(format!("tearDownClass failed: {}", e));
            self.record(results, suite, "tearDownClass", outcome, began, true);
        }
    }

    fn record(
        &self,
        results: &mut Vec<ScenarioReport>,
        suite: &dyn Suite,
        name: &str,
        outcome: Outcome,
        began: Instant,
        fixture: bool,
    ) {
        let report = ScenarioReport {
            name: name.to_string(),
            outcome,
            elapsed: began.elapsed(),
            fixture,
        };
        debug!("{} finished in {:?}", name, report.elapsed);
        if self.verbose {
            println!("{}", report.line(suite.name()));
        }
        results.push(report);
    }
}
