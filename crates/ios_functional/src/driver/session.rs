//! HTTP session against an Appium server

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use super::wire::{self, Command, Request};
use super::{ApplicationState, ElementRef, HideKeyboard, Locator, RemoteDriver};
use crate::config::{Capabilities, TIMING_CONFIG};
use crate::error::{DriverError, Result};

/// Read a local file and base64 encode it for upload
///
/// # Arguments
/// * `source` - Local file to read
///
/// # Returns
/// The standard base64 encoding of the file contents
pub async fn encode_file(source: &Path) -> Result<String> {
    let bytes = tokio::fs::read(source).await.map_err(DriverError::Io)?;
    Ok(general_purpose::STANDARD.encode(bytes))
}

/// A live remote automation session
pub struct AppiumSession {
    client: Client,
    server_url: String,
    session_id: String,
    command_timeout: Option<Duration>,
}

impl AppiumSession {
    /// Request a new session from the server at `server_url`
    ///
    /// Uses the command timeout from [`TIMING_CONFIG`].
    ///
    /// # Arguments
    /// * `server_url` - Server endpoint, e.g. `http://localhost:4723/wd/hub`
    /// * `capabilities` - Desired capabilities, sent in both W3C and legacy form
    ///
    /// # Returns
    /// The open session; any failure is reported as
    /// [`DriverError::SessionNotCreated`]
    pub async fn create(server_url: &str, capabilities: &Capabilities) -> Result<Self> {
        Self::create_with_timeout(server_url, capabilities, TIMING_CONFIG.command_timeout()).await
    }

    /// Like [`create`](Self::create) with an explicit per-command timeout
    ///
    /// # Arguments
    /// * `command_timeout` - Limit for session creation and for every later
    ///   command; `None` waits forever
    pub async fn create_with_timeout(
        server_url: &str,
        capabilities: &Capabilities,
        command_timeout: Option<Duration>,
    ) -> Result<Self> {
        let server_url = server_url.trim_end_matches('/').to_string();
        let client = Client::new();
        let url = format!("{}/session", server_url);

        info!("Requesting session from {}", url);
        debug!("Capabilities: {}", capabilities.to_value());

        let send = client
            .post(&url)
            .json(&wire::new_session_body(capabilities))
            .send();

        let response = match command_timeout {
            Some(limit) => tokio::time::timeout(limit, send).await.map_err(|_| {
                DriverError::SessionNotCreated(format!("timed out after {:?}", limit))
            })?,
            None => send.await,
        }
        .map_err(|e| DriverError::SessionNotCreated(format!("{}: {}", url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| DriverError::SessionNotCreated(e.to_string()))?;

        wire::decode_response(status, &body)
            .map_err(|e| DriverError::SessionNotCreated(e.to_string()))?;
        // The legacy dialect keeps the id outside `value`, so read the whole body
        let raw: Value = serde_json::from_str(&body)
            .map_err(|e| DriverError::SessionNotCreated(e.to_string()))?;
        let session_id = wire::parse_session_id(&raw)?;

        info!("Session {} created", session_id);

        Ok(Self {
            client,
            server_url,
            session_id,
            command_timeout,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    async fn send(&self, request: Request) -> Result<(u16, String)> {
        let url = format!("{}{}", self.server_url, request.path);
        let mut builder = self.client.request(request.method, &url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        Ok((status, text))
    }

    /// Send a command and return the decoded `value`
    async fn execute(&self, command: Command<'_>) -> Result<Value> {
        let name = command.name();
        let request = command.to_request(&self.session_id);
        debug!("{} {} {}", name, request.method, request.path);

        let (status, body) = match self.command_timeout {
            Some(limit) => tokio::time::timeout(limit, self.send(request))
                .await
                .map_err(|_| {
                    DriverError::Timeout(format!("{} timed out after {:?}", name, limit))
                })??,
            None => self.send(request).await?,
        };

        let value = wire::decode_response(status, &body)?;
        debug!("{} -> HTTP {}", name, status);
        Ok(value)
    }
}

#[async_trait]
impl RemoteDriver for AppiumSession {
    async fn lock(&self, seconds: Option<i64>) -> Result<()> {
        self.execute(Command::Lock { seconds }).await.map(|_| ())
    }

    async fn unlock(&self) -> Result<()> {
        self.execute(Command::Unlock).await.map(|_| ())
    }

    async fn is_locked(&self) -> Result<bool> {
        wire::expect_bool(&self.execute(Command::IsLocked).await?)
    }

    async fn start_recording_screen(&self) -> Result<()> {
        self.execute(Command::StartRecordingScreen).await.map(|_| ())
    }

    async fn stop_recording_screen(&self) -> Result<String> {
        wire::expect_string(self.execute(Command::StopRecordingScreen).await?)
    }

    async fn query_app_state(&self, bundle_id: &str) -> Result<ApplicationState> {
        let value = self.execute(Command::QueryAppState { bundle_id }).await?;
        ApplicationState::try_from(wire::expect_i64(&value)?)
    }

    async fn background_app(&self, seconds: i64) -> Result<()> {
        self.execute(Command::BackgroundApp { seconds })
            .await
            .map(|_| ())
    }

    async fn activate_app(&self, bundle_id: &str) -> Result<()> {
        self.execute(Command::ActivateApp { bundle_id })
            .await
            .map(|_| ())
    }

    async fn shake(&self) -> Result<()> {
        self.execute(Command::Shake).await.map(|_| ())
    }

    async fn touch_id(&self, matched: bool) -> Result<()> {
        self.execute(Command::TouchId { matched }).await.map(|_| ())
    }

    async fn toggle_touch_id_enrollment(&self) -> Result<()> {
        self.execute(Command::ToggleTouchIdEnrollment)
            .await
            .map(|_| ())
    }

    async fn hide_keyboard(&self, request: &HideKeyboard) -> Result<()> {
        self.execute(Command::HideKeyboard(request)).await.map(|_| ())
    }

    async fn is_keyboard_shown(&self) -> Result<bool> {
        wire::expect_bool(&self.execute(Command::IsKeyboardShown).await?)
    }

    async fn find_element(&self, locator: &Locator) -> Result<ElementRef> {
        wire::parse_element(&self.execute(Command::FindElement(locator)).await?)
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>> {
        wire::parse_elements(&self.execute(Command::FindElements(locator)).await?)
    }

    async fn click(&self, element: &ElementRef) -> Result<()> {
        self.execute(Command::Click(element)).await.map(|_| ())
    }

    async fn set_value(&self, element: &ElementRef, value: &str) -> Result<()> {
        self.execute(Command::SetValue { element, value })
            .await
            .map(|_| ())
    }

    async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
        self.execute(Command::SendKeys { element, text })
            .await
            .map(|_| ())
    }

    async fn get_attribute(&self, element: &ElementRef, name: &str) -> Result<Option<String>> {
        let value = self
            .execute(Command::GetAttribute { element, name })
            .await?;
        Ok(wire::optional_string(value))
    }

    async fn is_displayed(&self, element: &ElementRef) -> Result<bool> {
        wire::expect_bool(&self.execute(Command::IsDisplayed(element)).await?)
    }

    async fn clear(&self, element: &ElementRef) -> Result<()> {
        self.execute(Command::Clear(element)).await.map(|_| ())
    }

    async fn scroll(&self, origin: &ElementRef, destination: &ElementRef) -> Result<()> {
        self.execute(Command::Scroll {
            origin,
            destination,
            press: TIMING_CONFIG.scroll_press_duration(),
        })
        .await
        .map(|_| ())
    }

    async fn press_button(&self, name: &str) -> Result<()> {
        self.execute(Command::PressButton { name }).await.map(|_| ())
    }

    async fn push_file(&self, destination: &str, source: &Path) -> Result<()> {
        let data = encode_file(source).await?;
        debug!(
            "Pushing {} ({} base64 bytes) to {}",
            source.display(),
            data.len(),
            destination
        );
        self.execute(Command::PushFile {
            path: destination,
            data,
        })
        .await
        .map(|_| ())
    }

    async fn quit(&self) -> Result<()> {
        self.execute(Command::Quit).await?;
        info!("Session {} closed", self.session_id);
        Ok(())
    }
}
