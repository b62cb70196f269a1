//! Session fixture: opening and closing remote sessions

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::{server_url, Capabilities};
use crate::driver::{AppiumSession, RemoteDriver};
use crate::error::Result;

/// How long one session lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureScope {
    /// A fresh session for every scenario
    PerScenario,
    /// One session shared by all scenarios of the suite
    PerSuite,
}

/// Opens remote sessions for the runner
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self, capabilities: &Capabilities) -> Result<Box<dyn RemoteDriver>>;
}

/// Connects to an Appium server over HTTP
#[derive(Debug, Clone)]
pub struct AppiumConnector {
    server_url: String,
}

impl AppiumConnector {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

impl Default for AppiumConnector {
    fn default() -> Self {
        Self::new(server_url())
    }
}

#[async_trait]
impl SessionFactory for AppiumConnector {
    async fn open(&self, capabilities: &Capabilities) -> Result<Box<dyn RemoteDriver>> {
        let session = AppiumSession::create(&self.server_url, capabilities).await?;
        Ok(Box::new(session))
    }
}

/// End a session, logging a failed quit.
///
/// Returns the quit error so the caller can decide whether it changes the
/// reported outcome.
pub(crate) async fn close(driver: Box<dyn RemoteDriver>) -> Result<()> {
    match driver.quit().await {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!("Failed to quit session: {}", e);
            Err(e)
        }
    }
}

pub(crate) async fn open(
    factory: &dyn SessionFactory,
    capabilities: &Capabilities,
) -> Result<Box<dyn RemoteDriver>> {
    let driver = factory.open(capabilities).await?;
    info!("Session fixture ready");
    Ok(driver)
}
