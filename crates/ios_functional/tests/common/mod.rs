//! In-memory stand-in for a simulator behind an Appium server

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ios_functional::config::TimingConfig;
use ios_functional::{
    ApplicationState, Capabilities, DriverError, ElementRef, HideKeyboard, Locator, RemoteDriver,
    Result, SessionFactory,
};

/// Knobs for how the fake device reacts
#[derive(Debug, Clone)]
pub struct Behaviour {
    pub lock_sticks: bool,
    pub unlock_works: bool,
    pub recording: String,
    pub background_state: ApplicationState,
    pub home_state: ApplicationState,
    pub default_hide_works: bool,
    pub clear_restores_placeholder: bool,
    pub failing_command: Option<&'static str>,
    pub failing_quit: bool,
    pub panic_on: Option<&'static str>,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            lock_sticks: true,
            unlock_works: true,
            recording: "AAAAGGZ0eXBtcDQy".to_string(),
            background_state: ApplicationState::RunningInBackground,
            home_state: ApplicationState::RunningInForeground,
            default_hide_works: false,
            clear_restores_placeholder: true,
            failing_command: None,
            failing_quit: false,
            panic_on: None,
        }
    }
}

#[derive(Debug)]
struct DeviceState {
    locked: bool,
    app_state: ApplicationState,
    keyboard_shown: bool,
    field_value: Option<String>,
}

/// Shared device; every session opened by [`FakeFactory`] talks to it
pub struct FakeDevice {
    pub behaviour: Behaviour,
    state: Mutex<DeviceState>,
    calls: Mutex<Vec<String>>,
}

pub const PLACEHOLDER: &str = "Placeholder text";

impl FakeDevice {
    pub fn new(behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            state: Mutex::new(DeviceState {
                locked: false,
                app_state: ApplicationState::RunningInForeground,
                keyboard_shown: false,
                field_value: None,
            }),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == name).count()
    }

    pub fn is_locked_now(&self) -> bool {
        self.state.lock().unwrap().locked
    }

    fn call(&self, name: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(name.to_string());
        if self.behaviour.panic_on == Some(name) {
            panic!("fake device exploded in {}", name);
        }
        if self.behaviour.failing_command == Some(name) {
            return Err(DriverError::Command {
                error: "unknown error".to_string(),
                message: format!("{} failed", name),
            });
        }
        Ok(())
    }
}

pub struct FakeDriver(pub Arc<FakeDevice>);

#[async_trait]
impl RemoteDriver for FakeDriver {
    async fn lock(&self, _seconds: Option<i64>) -> Result<()> {
        self.0.call("lock")?;
        self.0.state.lock().unwrap().locked = self.0.behaviour.lock_sticks;
        Ok(())
    }

    async fn unlock(&self) -> Result<()> {
        self.0.call("unlock")?;
        if self.0.behaviour.unlock_works {
            self.0.state.lock().unwrap().locked = false;
        }
        Ok(())
    }

    async fn is_locked(&self) -> Result<bool> {
        self.0.call("is_locked")?;
        Ok(self.0.state.lock().unwrap().locked)
    }

    async fn start_recording_screen(&self) -> Result<()> {
        self.0.call("start_recording_screen")
    }

    async fn stop_recording_screen(&self) -> Result<String> {
        self.0.call("stop_recording_screen")?;
        Ok(self.0.behaviour.recording.clone())
    }

    async fn query_app_state(&self, _bundle_id: &str) -> Result<ApplicationState> {
        self.0.call("query_app_state")?;
        Ok(self.0.state.lock().unwrap().app_state)
    }

    async fn background_app(&self, _seconds: i64) -> Result<()> {
        self.0.call("background_app")?;
        self.0.state.lock().unwrap().app_state = self.0.behaviour.background_state;
        Ok(())
    }

    async fn activate_app(&self, _bundle_id: &str) -> Result<()> {
        self.0.call("activate_app")?;
        self.0.state.lock().unwrap().app_state = ApplicationState::RunningInForeground;
        Ok(())
    }

    async fn shake(&self) -> Result<()> {
        self.0.call("shake")
    }

    async fn touch_id(&self, matched: bool) -> Result<()> {
        self.0.call(if matched { "touch_id(true)" } else { "touch_id(false)" })
    }

    async fn toggle_touch_id_enrollment(&self) -> Result<()> {
        self.0.call("toggle_touch_id_enrollment")
    }

    async fn hide_keyboard(&self, request: &HideKeyboard) -> Result<()> {
        self.0.call("hide_keyboard")?;
        let has_key = request.key_name.is_some() || request.key.is_some();
        if has_key || self.0.behaviour.default_hide_works {
            self.0.state.lock().unwrap().keyboard_shown = false;
        }
        Ok(())
    }

    async fn is_keyboard_shown(&self) -> Result<bool> {
        self.0.call("is_keyboard_shown")?;
        Ok(self.0.state.lock().unwrap().keyboard_shown)
    }

    async fn find_element(&self, locator: &Locator) -> Result<ElementRef> {
        self.0.call("find_element")?;
        Ok(ElementRef::new(locator.value()))
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>> {
        self.0.call("find_elements")?;
        Ok(vec![
            ElementRef::new(format!("{}-0", locator.value())),
            ElementRef::new(format!("{}-1", locator.value())),
        ])
    }

    async fn click(&self, _element: &ElementRef) -> Result<()> {
        self.0.call("click")
    }

    async fn set_value(&self, _element: &ElementRef, value: &str) -> Result<()> {
        self.0.call("set_value")?;
        let mut state = self.0.state.lock().unwrap();
        state.field_value = Some(value.to_string());
        state.keyboard_shown = true;
        Ok(())
    }

    async fn send_keys(&self, _element: &ElementRef, text: &str) -> Result<()> {
        self.0.call("send_keys")?;
        let mut state = self.0.state.lock().unwrap();
        state.field_value = Some(text.to_string());
        state.keyboard_shown = true;
        Ok(())
    }

    async fn get_attribute(&self, _element: &ElementRef, _name: &str) -> Result<Option<String>> {
        self.0.call("get_attribute")?;
        let value = self.0.state.lock().unwrap().field_value.clone();
        Ok(Some(value.unwrap_or_else(|| PLACEHOLDER.to_string())))
    }

    async fn is_displayed(&self, element: &ElementRef) -> Result<bool> {
        self.0.call("is_displayed")?;
        if element.id() == "UIAKeyboard" {
            Ok(self.0.state.lock().unwrap().keyboard_shown)
        } else {
            Ok(true)
        }
    }

    async fn clear(&self, _element: &ElementRef) -> Result<()> {
        self.0.call("clear")?;
        let mut state = self.0.state.lock().unwrap();
        state.field_value = if self.0.behaviour.clear_restores_placeholder {
            None
        } else {
            Some(String::new())
        };
        Ok(())
    }

    async fn scroll(&self, _origin: &ElementRef, _destination: &ElementRef) -> Result<()> {
        self.0.call("scroll")
    }

    async fn press_button(&self, _name: &str) -> Result<()> {
        self.0.call("press_button")?;
        self.0.state.lock().unwrap().app_state = self.0.behaviour.home_state;
        Ok(())
    }

    async fn push_file(&self, _destination: &str, source: &Path) -> Result<()> {
        self.0.call("push_file")?;
        if !source.exists() {
            return Err(DriverError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                source.display().to_string(),
            )));
        }
        Ok(())
    }

    async fn quit(&self) -> Result<()> {
        self.0.calls.lock().unwrap().push("quit".to_string());
        if self.0.behaviour.failing_quit {
            return Err(DriverError::Command {
                error: "invalid session id".to_string(),
                message: "already gone".to_string(),
            });
        }
        Ok(())
    }
}

/// Hands out sessions on one shared [`FakeDevice`]
pub struct FakeFactory {
    pub device: Arc<FakeDevice>,
    pub fail_open: bool,
    opened: AtomicUsize,
}

impl FakeFactory {
    pub fn new(device: Arc<FakeDevice>) -> Self {
        Self {
            device,
            fail_open: false,
            opened: AtomicUsize::new(0),
        }
    }

    pub fn failing(device: Arc<FakeDevice>) -> Self {
        Self {
            fail_open: true,
            ..Self::new(device)
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionFactory for FakeFactory {
    async fn open(&self, _capabilities: &Capabilities) -> Result<Box<dyn RemoteDriver>> {
        if self.fail_open {
            return Err(DriverError::SessionNotCreated(
                "connection refused".to_string(),
            ));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeDriver(self.device.clone())))
    }
}

/// Waits short enough for tests
pub fn fast_timing() -> TimingConfig {
    TimingConfig {
        recording_wait: 0.01,
        keyboard_settle_wait: 0.01,
        scroll_press_duration: 0.0,
        command_timeout: Some(5.0),
    }
}

pub fn short(d: Duration) -> bool {
    d < Duration::from_secs(5)
}
