//! Remote automation client for the Appium server
//!
//! This module provides:
//! - `wire`: Request/response encoding for the remote-control protocol
//! - `session`: HTTP session against a running server
//!
//! Scenarios only see the [`RemoteDriver`] trait, so any client that speaks
//! the same protocol (or a scripted fake in tests) can stand in for
//! [`AppiumSession`].

mod session;
pub mod wire;

pub use session::{encode_file, AppiumSession};

use async_trait::async_trait;
use std::fmt;
use std::path::Path;

use crate::error::{DriverError, Result};

/// Run state of an app on the device.
///
/// Variants are ordered the same way as the integers the server reports, so
/// `state < ApplicationState::RunningInForeground` means "not in front".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApplicationState {
    NotInstalled = 0,
    NotRunning = 1,
    RunningInBackgroundSuspended = 2,
    RunningInBackground = 3,
    RunningInForeground = 4,
}

impl TryFrom<i64> for ApplicationState {
    type Error = DriverError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Self::NotInstalled),
            1 => Ok(Self::NotRunning),
            2 => Ok(Self::RunningInBackgroundSuspended),
            3 => Ok(Self::RunningInBackground),
            4 => Ok(Self::RunningInForeground),
            other => Err(DriverError::Protocol(format!(
                "unknown application state {}",
                other
            ))),
        }
    }
}

/// Element lookup strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    AccessibilityId(String),
    ClassName(String),
}

impl Locator {
    pub fn accessibility_id(id: impl Into<String>) -> Self {
        Self::AccessibilityId(id.into())
    }

    pub fn class_name(name: impl Into<String>) -> Self {
        Self::ClassName(name.into())
    }

    /// Strategy name as sent in the `using` field
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::AccessibilityId(_) => "accessibility id",
            Self::ClassName(_) => "class name",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::AccessibilityId(v) | Self::ClassName(v) => v,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

/// Opaque reference to a UI element, valid only inside the session that
/// returned it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef(String);

impl ElementRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// How to dismiss the on-screen keyboard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HideKeyboard {
    pub key_name: Option<String>,
    pub key: Option<String>,
    pub strategy: Option<String>,
}

impl HideKeyboard {
    /// Let the server pick; sent as the `tapOutside` strategy
    pub fn new() -> Self {
        Self::default()
    }

    /// Tap the keyboard key with this name
    pub fn with_key_name(key_name: impl Into<String>) -> Self {
        Self {
            key_name: Some(key_name.into()),
            ..Default::default()
        }
    }

    /// Use the `pressKey` strategy on `key`
    pub fn press_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            strategy: Some("pressKey".to_string()),
            ..Default::default()
        }
    }
}

/// Operations a scenario may issue against the remote session
#[async_trait]
pub trait RemoteDriver: Send + Sync {
    /// Lock the screen; `Some(-1)` keeps it locked until [`unlock`](Self::unlock)
    async fn lock(&self, seconds: Option<i64>) -> Result<()>;

    async fn unlock(&self) -> Result<()>;

    async fn is_locked(&self) -> Result<bool>;

    async fn start_recording_screen(&self) -> Result<()>;

    /// Stop the recording and return the base64 encoded video
    async fn stop_recording_screen(&self) -> Result<String>;

    async fn query_app_state(&self, bundle_id: &str) -> Result<ApplicationState>;

    /// Send the app under test to the background; `-1` keeps it there
    async fn background_app(&self, seconds: i64) -> Result<()>;

    async fn activate_app(&self, bundle_id: &str) -> Result<()>;

    async fn shake(&self) -> Result<()>;

    /// Simulate a matching (or non-matching) Touch ID scan
    async fn touch_id(&self, matched: bool) -> Result<()>;

    async fn toggle_touch_id_enrollment(&self) -> Result<()>;

    async fn hide_keyboard(&self, request: &HideKeyboard) -> Result<()>;

    async fn is_keyboard_shown(&self) -> Result<bool>;

    async fn find_element(&self, locator: &Locator) -> Result<ElementRef>;

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>>;

    async fn click(&self, element: &ElementRef) -> Result<()>;

    /// Replace the element value in one call
    async fn set_value(&self, element: &ElementRef, value: &str) -> Result<()>;

    /// Type into the element key by key
    async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()>;

    async fn get_attribute(&self, element: &ElementRef, name: &str) -> Result<Option<String>>;

    async fn is_displayed(&self, element: &ElementRef) -> Result<bool>;

    async fn clear(&self, element: &ElementRef) -> Result<()>;

    /// Drag from `origin` to `destination` with a touch pointer
    async fn scroll(&self, origin: &ElementRef, destination: &ElementRef) -> Result<()>;

    async fn press_button(&self, name: &str) -> Result<()>;

    /// Upload the local file at `source` to `destination` on the device
    async fn push_file(&self, destination: &str, source: &Path) -> Result<()>;

    /// End the remote session
    async fn quit(&self) -> Result<()>;
}
