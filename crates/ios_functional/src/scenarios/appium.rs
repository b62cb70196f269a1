//! Device, app-lifecycle and keyboard scenarios against UICatalog
//!
//! Every scenario gets its own session.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::BUNDLE_ID;
use crate::driver::{ApplicationState, ElementRef, HideKeyboard, Locator, RemoteDriver};
use crate::error::DriverError;
use crate::harness::{
    assert_equal, assert_false, assert_less, assert_true, Expectation, FixtureScope, Scenario,
    ScenarioContext, ScenarioError, ScenarioResult, Suite,
};

/// App management commands need Xcode 9, i.e. iOS 11 or later
const MIN_APP_STATE_VERSION: f64 = 11.0;

const TEXT_FIELD_CLASS: &str = "XCUIElementTypeTextField";
const KEYBOARD_CLASS: &str = "UIAKeyboard";
const PLACEHOLDER_TEXT: &str = "Placeholder text";

pub struct AppiumTests;

impl Suite for AppiumTests {
    fn name(&self) -> &'static str {
        "AppiumTests"
    }

    fn app(&self) -> &'static str {
        "UICatalog.app.zip"
    }

    fn scope(&self) -> FixtureScope {
        FixtureScope::PerScenario
    }

    fn scenarios(&self) -> Vec<Box<dyn Scenario>> {
        AppiumScenario::ALL
            .iter()
            .map(|s| Box::new(*s) as Box<dyn Scenario>)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppiumScenario {
    Lock,
    ScreenRecord,
    AppManagement,
    Shake,
    TouchId,
    ToggleTouchIdEnrollment,
    HideKeyboard,
    HideKeyboardPressKeyStrategy,
    HideKeyboardNoKeyName,
    IsKeyboardShown,
    Clear,
    PressButton,
}

impl AppiumScenario {
    pub const ALL: [AppiumScenario; 12] = [
        AppiumScenario::Lock,
        AppiumScenario::ScreenRecord,
        AppiumScenario::AppManagement,
        AppiumScenario::Shake,
        AppiumScenario::TouchId,
        AppiumScenario::ToggleTouchIdEnrollment,
        AppiumScenario::HideKeyboard,
        AppiumScenario::HideKeyboardPressKeyStrategy,
        AppiumScenario::HideKeyboardNoKeyName,
        AppiumScenario::IsKeyboardShown,
        AppiumScenario::Clear,
        AppiumScenario::PressButton,
    ];
}

#[async_trait]
impl Scenario for AppiumScenario {
    fn name(&self) -> &'static str {
        match self {
            AppiumScenario::Lock => "test_lock",
            AppiumScenario::ScreenRecord => "test_screen_record",
            AppiumScenario::AppManagement => "test_app_management",
            AppiumScenario::Shake => "test_shake",
            AppiumScenario::TouchId => "test_touch_id",
            AppiumScenario::ToggleTouchIdEnrollment => "test_toggle_touch_id_enrollment",
            AppiumScenario::HideKeyboard => "test_hide_keyboard",
            AppiumScenario::HideKeyboardPressKeyStrategy => "test_hide_keyboard_presskey_strategy",
            AppiumScenario::HideKeyboardNoKeyName => "test_hide_keyboard_no_key_name",
            AppiumScenario::IsKeyboardShown => "test_is_keyboard_shown",
            AppiumScenario::Clear => "test_clear",
            AppiumScenario::PressButton => "test_press_button",
        }
    }

    fn expectation(&self) -> Expectation {
        match self {
            // Hiding without a key name leaves the keyboard up
            AppiumScenario::HideKeyboardNoKeyName => Expectation::KnownFailure,
            _ => Expectation::Pass,
        }
    }

    async fn run(&self, driver: &dyn RemoteDriver, ctx: &ScenarioContext) -> ScenarioResult {
        match self {
            AppiumScenario::Lock => lock(driver).await,
            AppiumScenario::ScreenRecord => screen_record(driver, ctx).await,
            AppiumScenario::AppManagement => app_management(driver, ctx).await,
            AppiumScenario::Shake => shake(driver).await,
            AppiumScenario::TouchId => touch_id(driver).await,
            AppiumScenario::ToggleTouchIdEnrollment => toggle_touch_id_enrollment(driver).await,
            AppiumScenario::HideKeyboard => {
                hide_keyboard(driver, HideKeyboard::with_key_name("Done"), None).await
            }
            AppiumScenario::HideKeyboardPressKeyStrategy => {
                hide_keyboard(driver, HideKeyboard::press_key("Done"), None).await
            }
            AppiumScenario::HideKeyboardNoKeyName => {
                hide_keyboard(driver, HideKeyboard::new(), Some(ctx.keyboard_settle_wait())).await
            }
            AppiumScenario::IsKeyboardShown => is_keyboard_shown(driver).await,
            AppiumScenario::Clear => clear(driver).await,
            AppiumScenario::PressButton => press_button(driver, ctx).await,
        }
    }
}

/// Lock indefinitely, check, and always unlock before checking again.
///
/// A failed locked-state check still unlocks; the check's failure is
/// reported ahead of any unlock failure.
pub async fn lock(driver: &dyn RemoteDriver) -> ScenarioResult {
    driver.lock(Some(-1)).await?;

    let locked = match driver.is_locked().await {
        Ok(locked) => assert_true(locked, "screen should be locked"),
        Err(e) => Err(e.into()),
    };
    let unlocked = driver.unlock().await;

    locked?;
    unlocked?;

    assert_false(driver.is_locked().await?, "screen should be unlocked")
}

pub async fn screen_record(driver: &dyn RemoteDriver, ctx: &ScenarioContext) -> ScenarioResult {
    driver.start_recording_screen().await?;
    tokio::time::sleep(ctx.recording_wait()).await;
    let recording = driver.stop_recording_screen().await?;

    if let (Some(saver), false) = (&ctx.recordings, recording.is_empty()) {
        match saver.save("test_screen_record", &recording).await {
            Ok(path) => info!("Recording saved to {}", path.display()),
            Err(e) => warn!("Could not save recording: {}", e),
        }
    }

    assert_true(!recording.is_empty(), "recording should not be empty")
}

pub async fn app_management(driver: &dyn RemoteDriver, ctx: &ScenarioContext) -> ScenarioResult {
    if !ctx.platform_at_least(MIN_APP_STATE_VERSION)? {
        debug!("Platform below {}, skipping app state checks", MIN_APP_STATE_VERSION);
        return Ok(());
    }

    assert_equal(
        driver.query_app_state(BUNDLE_ID).await?,
        ApplicationState::RunningInForeground,
        "app should start in the foreground",
    )?;

    driver.background_app(-1).await?;
    assert_less(
        driver.query_app_state(BUNDLE_ID).await?,
        ApplicationState::RunningInForeground,
        "app should have left the foreground",
    )?;

    driver.activate_app(BUNDLE_ID).await?;
    assert_equal(
        driver.query_app_state(BUNDLE_ID).await?,
        ApplicationState::RunningInForeground,
        "app should be back in the foreground",
    )
}

pub async fn shake(driver: &dyn RemoteDriver) -> ScenarioResult {
    driver.shake().await?;
    Ok(())
}

pub async fn touch_id(driver: &dyn RemoteDriver) -> ScenarioResult {
    driver.touch_id(true).await?;
    driver.touch_id(false).await?;
    Ok(())
}

pub async fn toggle_touch_id_enrollment(driver: &dyn RemoteDriver) -> ScenarioResult {
    driver.toggle_touch_id_enrollment().await?;
    Ok(())
}

/// Open the "Text Fields" screen
async fn move_to_textbox(driver: &dyn RemoteDriver) -> ScenarioResult {
    let sliders = driver
        .find_element(&Locator::accessibility_id("Sliders"))
        .await?;
    let buttons = driver
        .find_element(&Locator::accessibility_id("Buttons"))
        .await?;
    driver.scroll(&sliders, &buttons).await?;

    let text_fields = driver
        .find_element(&Locator::accessibility_id("Text Fields"))
        .await?;
    driver.click(&text_fields).await?;
    Ok(())
}

async fn first_text_field(driver: &dyn RemoteDriver) -> Result<ElementRef, DriverError> {
    driver
        .find_elements(&Locator::class_name(TEXT_FIELD_CLASS))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| DriverError::NoSuchElement(TEXT_FIELD_CLASS.to_string()))
}

/// Type into the first text field and return the keyboard, checked visible
async fn show_keyboard(driver: &dyn RemoteDriver) -> Result<ElementRef, ScenarioError> {
    move_to_textbox(driver).await?;

    let field = first_text_field(driver).await?;
    driver.set_value(&field, "Testing").await?;

    let keyboard = driver
        .find_element(&Locator::class_name(KEYBOARD_CLASS))
        .await?;
    assert_true(
        driver.is_displayed(&keyboard).await?,
        "keyboard should be displayed",
    )?;
    Ok(keyboard)
}

pub async fn hide_keyboard(
    driver: &dyn RemoteDriver,
    request: HideKeyboard,
    settle: Option<Duration>,
) -> ScenarioResult {
    let keyboard = show_keyboard(driver).await?;

    driver.hide_keyboard(&request).await?;
    if let Some(wait) = settle {
        tokio::time::sleep(wait).await;
    }

    assert_false(
        driver.is_displayed(&keyboard).await?,
        "keyboard should be hidden",
    )
}

pub async fn is_keyboard_shown(driver: &dyn RemoteDriver) -> ScenarioResult {
    move_to_textbox(driver).await?;

    let field = first_text_field(driver).await?;
    driver.set_value(&field, "Testing").await?;

    assert_true(
        driver.is_keyboard_shown().await?,
        "keyboard should be shown",
    )
}

pub async fn clear(driver: &dyn RemoteDriver) -> ScenarioResult {
    move_to_textbox(driver).await?;

    let field = first_text_field(driver).await?;

    let text = driver.get_attribute(&field, "value").await?;
    assert_equal(text.as_deref(), Some(PLACEHOLDER_TEXT), "default text")?;

    let input = "blah";
    driver.send_keys(&field, input).await?;
    let text = driver.get_attribute(&field, "value").await?;
    assert_equal(text.as_deref(), Some(input), "typed text")?;

    driver.clear(&field).await?;
    let text = driver.get_attribute(&field, "value").await?;
    assert_equal(text.as_deref(), Some(PLACEHOLDER_TEXT), "text after clear")
}

pub async fn press_button(driver: &dyn RemoteDriver, ctx: &ScenarioContext) -> ScenarioResult {
    driver.press_button("Home").await?;

    if !ctx.platform_at_least(MIN_APP_STATE_VERSION)? {
        return Ok(());
    }

    assert_equal(
        driver.query_app_state(BUNDLE_ID).await?,
        ApplicationState::RunningInForeground,
        "app state after pressing Home",
    )
}
