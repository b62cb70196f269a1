//! Timing configuration for scenario waits and remote commands

use lazy_static::lazy_static;
use std::env;
use std::time::Duration;

fn env_secs(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Blind waits used while asynchronous UI state settles, plus the optional
/// client-side command timeout.
#[derive(Debug, Clone)]
pub struct TimingConfig {
    /// Seconds between starting and stopping a screen recording
    pub recording_wait: f64,
    /// Seconds to wait after a keyboard hide without a key name
    pub keyboard_settle_wait: f64,
    /// Seconds the touch pointer stays down on the scroll origin
    pub scroll_press_duration: f64,
    /// Seconds before a remote command is abandoned; `None` waits forever
    pub command_timeout: Option<f64>,
}

impl TimingConfig {
    pub fn recording_wait(&self) -> Duration {
        Duration::from_secs_f64(self.recording_wait)
    }

    pub fn keyboard_settle_wait(&self) -> Duration {
        Duration::from_secs_f64(self.keyboard_settle_wait)
    }

    pub fn scroll_press_duration(&self) -> Duration {
        Duration::from_secs_f64(self.scroll_press_duration)
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout.map(Duration::from_secs_f64)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            recording_wait: env_secs("IOS_FUNCTIONAL_RECORDING_WAIT", 10.0),
            keyboard_settle_wait: env_secs("IOS_FUNCTIONAL_KEYBOARD_WAIT", 10.0),
            scroll_press_duration: env_secs("IOS_FUNCTIONAL_SCROLL_PRESS", 0.6),
            command_timeout: env::var("IOS_FUNCTIONAL_COMMAND_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs: &f64| *secs > 0.0),
        }
    }
}

lazy_static! {
    /// Global timing configuration instance
    pub static ref TIMING_CONFIG: TimingConfig = TimingConfig::default();
}
