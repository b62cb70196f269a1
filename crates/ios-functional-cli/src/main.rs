//! ios-functional - Command-line runner for the UICatalog functional suites
//!
//! Usage:
//!     ios-functional [OPTIONS]
//!
//! Environment Variables:
//!     APPIUM_SERVER_URL: Appium server endpoint (default: http://localhost:4723/wd/hub)
//!     APPIUM_APPS_DIR: Directory holding UICatalog.app.zip
//!     IPHONE_MODEL: Simulator device name (default: iPhone 8)
//!     PLATFORM_VERSION: iOS version of the simulator (default: 11.4)
//!     IOS_FUNCTIONAL_ARTIFACTS_DIR: Directory to save screen recordings
//!     RUST_LOG: Log filter, e.g. ios_functional=debug

use anyhow::{anyhow, Result};
use clap::Parser;
use ios_functional::config::list_supported_apps;
use ios_functional::{
    all_suites, get_desired_capabilities, suite_by_key, AppiumConnector, RecordingSaver, Suite,
    SuiteReport, SuiteRunner, DEFAULT_SERVER_URL, SUITE_KEYS,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// UICatalog functional suites against an Appium server
#[derive(Parser, Debug)]
#[command(name = "ios-functional")]
#[command(about = "Run the UICatalog functional suites against an Appium server")]
#[command(after_help = r#"Examples:
    # Run every suite against a local Appium server
    ios-functional

    # Use a remote server
    ios-functional --server-url http://mac-mini.local:4723/wd/hub

    # Only the keyboard scenarios
    ios-functional --suite appium --filter keyboard

    # Keep screen recordings
    ios-functional --artifacts-dir ./artifacts

    # List suites and scenarios
    ios-functional --list
"#)]
struct Cli {
    /// Appium server URL
    #[arg(long, env = "APPIUM_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,

    /// Suite to run
    #[arg(long, default_value = "all", value_parser = ["appium", "push-file", "all"])]
    suite: String,

    /// Only run scenarios whose name contains this text
    #[arg(long, value_name = "TEXT")]
    filter: Option<String>,

    /// Directory to save screen recordings (creates timestamped subdirectory per run)
    #[arg(long, env = "IOS_FUNCTIONAL_ARTIFACTS_DIR")]
    artifacts_dir: Option<String>,

    /// List suites and scenarios and exit
    #[arg(long)]
    list: bool,

    /// List known app packages and exit
    #[arg(long)]
    list_apps: bool,

    /// Suppress per-scenario output
    #[arg(short = 'q', long)]
    quiet: bool,
}

fn selected_suites(key: &str) -> Result<Vec<Box<dyn Suite>>> {
    if key == "all" {
        return Ok(all_suites());
    }
    suite_by_key(key)
        .map(|suite| vec![suite])
        .ok_or_else(|| anyhow!("Unknown suite: {} (expected one of {:?})", key, SUITE_KEYS))
}

fn print_suites(suites: &[Box<dyn Suite>]) {
    for suite in suites {
        println!("{} ({})", suite.name(), suite.app());
        for scenario in suite.scenarios() {
            println!("  {}", scenario.name());
        }
    }
}

fn print_supported_apps() {
    println!("Known app packages:");
    let mut apps = list_supported_apps();
    apps.sort_unstable();
    for app in apps {
        println!("  - {}", app);
    }
}

/// Print application header
fn print_header(args: &Cli, suites: &[Box<dyn Suite>]) -> Result<()> {
    let capabilities = get_desired_capabilities(None)?;

    println!("{}", "=".repeat(50));
    println!("iOS functional suites - UICatalog");
    println!("{}", "=".repeat(50));
    println!("Server: {}", args.server_url);
    println!(
        "Device: {} (iOS {})",
        capabilities.get_str("deviceName").unwrap_or("unknown"),
        capabilities.platform_version().unwrap_or("unknown")
    );
    let names: Vec<&str> = suites.iter().map(|s| s.name()).collect();
    println!("Suites: {}", names.join(", "));

    if let Some(filter) = &args.filter {
        println!("Filter: {}", filter);
    }

    if let Some(artifacts_dir) = &args.artifacts_dir {
        println!("Artifacts Dir: {}", artifacts_dir);
    }

    println!("{}", "=".repeat(50));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let suites = selected_suites(&args.suite)?;

    if args.list_apps {
        print_supported_apps();
        return Ok(());
    }

    if args.list {
        print_suites(&suites);
        return Ok(());
    }

    print_header(&args, &suites)?;

    let mut runner = SuiteRunner::new(Arc::new(AppiumConnector::new(&args.server_url)))
        .with_verbose(!args.quiet);

    if let Some(filter) = &args.filter {
        runner = runner.with_filter(filter);
    }

    if let Some(artifacts_dir) = &args.artifacts_dir {
        runner = runner.with_recordings(RecordingSaver::new(artifacts_dir).await?);
    }

    let mut reports: Vec<SuiteReport> = Vec::new();
    for suite in &suites {
        println!();
        let report = runner.run(suite.as_ref()).await;
        print!("{}", report.render());
        reports.push(report);
    }

    if !reports.iter().all(SuiteReport::was_successful) {
        std::process::exit(1);
    }

    Ok(())
}
