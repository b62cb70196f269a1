//! Request and response encoding for the remote-control protocol
//!
//! Servers answer in two shapes and both are accepted:
//! - W3C: `{"value": ...}`, errors as `{"value": {"error", "message"}}` with a
//!   non-2xx status
//! - legacy JSONWP: `{"sessionId", "status", "value"}`, errors as a non-zero
//!   `status`

use reqwest::Method;
use serde_json::{json, Map, Value};
use std::time::Duration;

use super::{ElementRef, HideKeyboard, Locator};
use crate::config::Capabilities;
use crate::error::{DriverError, Result};

/// W3C element identifier key
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Legacy JSONWP element identifier key
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// A session-scoped remote command
#[derive(Debug, Clone)]
pub enum Command<'a> {
    Quit,
    Lock { seconds: Option<i64> },
    Unlock,
    IsLocked,
    StartRecordingScreen,
    StopRecordingScreen,
    QueryAppState { bundle_id: &'a str },
    BackgroundApp { seconds: i64 },
    ActivateApp { bundle_id: &'a str },
    Shake,
    TouchId { matched: bool },
    ToggleTouchIdEnrollment,
    HideKeyboard(&'a HideKeyboard),
    IsKeyboardShown,
    FindElement(&'a Locator),
    FindElements(&'a Locator),
    Click(&'a ElementRef),
    SetValue { element: &'a ElementRef, value: &'a str },
    SendKeys { element: &'a ElementRef, text: &'a str },
    GetAttribute { element: &'a ElementRef, name: &'a str },
    IsDisplayed(&'a ElementRef),
    Clear(&'a ElementRef),
    Scroll {
        origin: &'a ElementRef,
        destination: &'a ElementRef,
        press: Duration,
    },
    PressButton { name: &'a str },
    PushFile { path: &'a str, data: String },
}

/// An HTTP request ready to send, relative to the server base URL
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

fn element_object(element: &ElementRef) -> Value {
    json!({ ELEMENT_KEY: element.id(), LEGACY_ELEMENT_KEY: element.id() })
}

fn app_id_body(bundle_id: &str) -> Value {
    json!({ "appId": bundle_id, "bundleId": bundle_id })
}

fn hide_keyboard_body(request: &HideKeyboard) -> Value {
    let mut body = Map::new();
    if let Some(key_name) = &request.key_name {
        body.insert("keyName".to_string(), json!(key_name));
    } else if let Some(key) = &request.key {
        body.insert("key".to_string(), json!(key));
    }

    match &request.strategy {
        Some(strategy) => {
            body.insert("strategy".to_string(), json!(strategy));
        }
        None if request.key_name.is_none() && request.key.is_none() => {
            body.insert("strategy".to_string(), json!("tapOutside"));
        }
        None => {}
    }
    Value::Object(body)
}

fn scroll_body(origin: &ElementRef, destination: &ElementRef, press: Duration) -> Value {
    let press_ms = press.as_millis() as u64;
    json!({
        "actions": [{
            "type": "pointer",
            "id": "touch",
            "parameters": { "pointerType": "touch" },
            "actions": [
                { "type": "pointerMove", "duration": 0, "x": 0, "y": 0, "origin": element_object(origin) },
                { "type": "pointerDown", "button": 0 },
                { "type": "pause", "duration": press_ms },
                { "type": "pointerMove", "duration": 250, "x": 0, "y": 0, "origin": element_object(destination) },
                { "type": "pointerUp", "button": 0 }
            ]
        }]
    })
}

impl Command<'_> {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Quit => "quit",
            Command::Lock { .. } => "lock",
            Command::Unlock => "unlock",
            Command::IsLocked => "is_locked",
            Command::StartRecordingScreen => "start_recording_screen",
            Command::StopRecordingScreen => "stop_recording_screen",
            Command::QueryAppState { .. } => "query_app_state",
            Command::BackgroundApp { .. } => "background_app",
            Command::ActivateApp { .. } => "activate_app",
            Command::Shake => "shake",
            Command::TouchId { .. } => "touch_id",
            Command::ToggleTouchIdEnrollment => "toggle_touch_id_enrollment",
            Command::HideKeyboard(_) => "hide_keyboard",
            Command::IsKeyboardShown => "is_keyboard_shown",
            Command::FindElement(_) => "find_element",
            Command::FindElements(_) => "find_elements",
            Command::Click(_) => "click",
            Command::SetValue { .. } => "set_value",
            Command::SendKeys { .. } => "send_keys",
            Command::GetAttribute { .. } => "get_attribute",
            Command::IsDisplayed(_) => "is_displayed",
            Command::Clear(_) => "clear",
            Command::Scroll { .. } => "scroll",
            Command::PressButton { .. } => "press_button",
            Command::PushFile { .. } => "push_file",
        }
    }

    /// Encode the command for the given session
    pub fn to_request(&self, session_id: &str) -> Request {
        let session = format!("/session/{}", session_id);
        let (method, path, body) = match self {
            Command::Quit => (Method::DELETE, session, None),
            Command::Lock { seconds } => {
                let body = match seconds {
                    Some(s) => json!({ "seconds": s }),
                    None => json!({}),
                };
                (
                    Method::POST,
                    format!("{}/appium/device/lock", session),
                    Some(body),
                )
            }
            Command::Unlock => (
                Method::POST,
                format!("{}/appium/device/unlock", session),
                Some(json!({})),
            ),
            Command::IsLocked => (
                Method::POST,
                format!("{}/appium/device/is_locked", session),
                Some(json!({})),
            ),
            Command::StartRecordingScreen => (
                Method::POST,
                format!("{}/appium/start_recording_screen", session),
                Some(json!({ "options": {} })),
            ),
            Command::StopRecordingScreen => (
                Method::POST,
                format!("{}/appium/stop_recording_screen", session),
                Some(json!({ "options": {} })),
            ),
            Command::QueryAppState { bundle_id } => (
                Method::POST,
                format!("{}/appium/device/app_state", session),
                Some(app_id_body(bundle_id)),
            ),
            Command::BackgroundApp { seconds } => (
                Method::POST,
                format!("{}/appium/app/background", session),
                Some(json!({ "seconds": seconds })),
            ),
            Command::ActivateApp { bundle_id } => (
                Method::POST,
                format!("{}/appium/device/activate_app", session),
                Some(app_id_body(bundle_id)),
            ),
            Command::Shake => (
                Method::POST,
                format!("{}/appium/device/shake", session),
                Some(json!({})),
            ),
            Command::TouchId { matched } => (
                Method::POST,
                format!("{}/appium/simulator/touch_id", session),
                Some(json!({ "match": matched })),
            ),
            Command::ToggleTouchIdEnrollment => (
                Method::POST,
                format!("{}/appium/simulator/toggle_touch_id_enrollment", session),
                Some(json!({})),
            ),
            Command::HideKeyboard(request) => (
                Method::POST,
                format!("{}/appium/device/hide_keyboard", session),
                Some(hide_keyboard_body(request)),
            ),
            Command::IsKeyboardShown => (
                Method::GET,
                format!("{}/appium/device/is_keyboard_shown", session),
                None,
            ),
            Command::FindElement(locator) => (
                Method::POST,
                format!("{}/element", session),
                Some(json!({ "using": locator.strategy(), "value": locator.value() })),
            ),
            Command::FindElements(locator) => (
                Method::POST,
                format!("{}/elements", session),
                Some(json!({ "using": locator.strategy(), "value": locator.value() })),
            ),
            Command::Click(element) => (
                Method::POST,
                format!("{}/element/{}/click", session, element.id()),
                Some(json!({})),
            ),
            Command::SetValue { element, value } => (
                Method::POST,
                format!("{}/appium/element/{}/value", session, element.id()),
                Some(json!({ "id": element.id(), "value": [value], "text": value })),
            ),
            Command::SendKeys { element, text } => {
                let keys: Vec<String> = text.chars().map(|c| c.to_string()).collect();
                (
                    Method::POST,
                    format!("{}/element/{}/value", session, element.id()),
                    Some(json!({ "text": text, "value": keys })),
                )
            }
            Command::GetAttribute { element, name } => (
                Method::GET,
                format!("{}/element/{}/attribute/{}", session, element.id(), name),
                None,
            ),
            Command::IsDisplayed(element) => (
                Method::GET,
                format!("{}/element/{}/displayed", session, element.id()),
                None,
            ),
            Command::Clear(element) => (
                Method::POST,
                format!("{}/element/{}/clear", session, element.id()),
                Some(json!({})),
            ),
            Command::Scroll {
                origin,
                destination,
                press,
            } => (
                Method::POST,
                format!("{}/actions", session),
                Some(scroll_body(origin, destination, *press)),
            ),
            Command::PressButton { name } => (
                Method::POST,
                format!("{}/execute/sync", session),
                Some(json!({ "script": "mobile: pressButton", "args": [{ "name": name }] })),
            ),
            Command::PushFile { path, data } => (
                Method::POST,
                format!("{}/appium/device/push_file", session),
                Some(json!({ "path": path, "data": data })),
            ),
        };

        Request { method, path, body }
    }
}

/// Body for a new-session request, in both protocol dialects
pub fn new_session_body(capabilities: &Capabilities) -> Value {
    json!({
        "capabilities": {
            "alwaysMatch": capabilities.to_value(),
            "firstMatch": [{}]
        },
        "desiredCapabilities": capabilities.to_value()
    })
}

/// Name of a legacy JSONWP status code
fn legacy_status_name(status: i64) -> &'static str {
    match status {
        6 => "invalid session id",
        7 => "no such element",
        10 => "stale element reference",
        12 => "invalid element state",
        13 => "unknown error",
        21 => "timeout",
        33 => "session not created",
        _ => "unknown error",
    }
}

fn error_message(value: &Value) -> String {
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}

/// Decode a response body, returning its `value` or the remote error
pub fn decode_response(status: u16, body: &str) -> Result<Value> {
    let success = (200..300).contains(&status);

    if body.trim().is_empty() {
        return if success {
            Ok(Value::Null)
        } else {
            Err(DriverError::from_remote(
                "unknown error",
                format!("HTTP {} with empty body", status),
            ))
        };
    }

    let parsed: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) if success => return Err(DriverError::Json(e)),
        Err(_) => {
            return Err(DriverError::from_remote(
                "unknown error",
                format!("HTTP {}: {}", status, body.trim()),
            ))
        }
    };

    let value = parsed.get("value").cloned().unwrap_or(Value::Null);

    if let Some(code) = parsed.get("status").and_then(Value::as_i64) {
        if code != 0 {
            return Err(DriverError::from_remote(
                legacy_status_name(code),
                error_message(&value),
            ));
        }
    }

    if let Some(error) = value.get("error").and_then(Value::as_str) {
        return Err(DriverError::from_remote(error, error_message(&value)));
    }

    if !success {
        return Err(DriverError::from_remote(
            "unknown error",
            format!("HTTP {}: {}", status, body.trim()),
        ));
    }

    Ok(value)
}

/// Extract the session id from a new-session response
pub fn parse_session_id(response: &Value) -> Result<String> {
    response
        .get("value")
        .and_then(|v| v.get("sessionId"))
        .or_else(|| response.get("sessionId"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            DriverError::SessionNotCreated(format!("no session id in response: {}", response))
        })
}

/// Read an element reference out of a `value`
pub fn parse_element(value: &Value) -> Result<ElementRef> {
    value
        .get(ELEMENT_KEY)
        .or_else(|| value.get(LEGACY_ELEMENT_KEY))
        .and_then(Value::as_str)
        .map(ElementRef::new)
        .ok_or_else(|| DriverError::Protocol(format!("not an element reference: {}", value)))
}

/// Read a list of element references out of a `value`
pub fn parse_elements(value: &Value) -> Result<Vec<ElementRef>> {
    value
        .as_array()
        .ok_or_else(|| DriverError::Protocol(format!("not an element list: {}", value)))?
        .iter()
        .map(parse_element)
        .collect()
}

pub fn expect_bool(value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| DriverError::Protocol(format!("expected a boolean, got {}", value)))
}

pub fn expect_string(value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(DriverError::Protocol(format!(
            "expected a string, got {}",
            other
        ))),
    }
}

pub fn expect_i64(value: &Value) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| DriverError::Protocol(format!("expected an integer, got {}", value)))
}

/// Attribute values come back as strings, scalars or null
pub fn optional_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_request() {
        let req = Command::Lock { seconds: Some(-1) }.to_request("abc");
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, "/session/abc/appium/device/lock");
        assert_eq!(req.body, Some(json!({ "seconds": -1 })));

        let req = Command::Lock { seconds: None }.to_request("abc");
        assert_eq!(req.body, Some(json!({})));
    }

    #[test]
    fn test_hide_keyboard_bodies() {
        let default = HideKeyboard::new();
        let req = Command::HideKeyboard(&default).to_request("s");
        assert_eq!(req.body, Some(json!({ "strategy": "tapOutside" })));

        let by_name = HideKeyboard::with_key_name("Done");
        let req = Command::HideKeyboard(&by_name).to_request("s");
        assert_eq!(req.body, Some(json!({ "keyName": "Done" })));

        let press = HideKeyboard::press_key("Done");
        let req = Command::HideKeyboard(&press).to_request("s");
        assert_eq!(
            req.body,
            Some(json!({ "key": "Done", "strategy": "pressKey" }))
        );
    }

    #[test]
    fn test_find_element_request() {
        let locator = Locator::class_name("XCUIElementTypeTextField");
        let req = Command::FindElements(&locator).to_request("s");
        assert_eq!(req.path, "/session/s/elements");
        assert_eq!(
            req.body,
            Some(json!({ "using": "class name", "value": "XCUIElementTypeTextField" }))
        );
    }

    #[test]
    fn test_send_keys_splits_characters() {
        let el = ElementRef::new("e1");
        let req = Command::SendKeys {
            element: &el,
            text: "blah",
        }
        .to_request("s");
        assert_eq!(req.path, "/session/s/element/e1/value");
        assert_eq!(
            req.body,
            Some(json!({ "text": "blah", "value": ["b", "l", "a", "h"] }))
        );
    }

    #[test]
    fn test_scroll_actions() {
        let origin = ElementRef::new("a");
        let dest = ElementRef::new("b");
        let req = Command::Scroll {
            origin: &origin,
            destination: &dest,
            press: Duration::from_millis(600),
        }
        .to_request("s");
        let body = req.body.unwrap();
        let actions = body["actions"][0]["actions"].as_array().unwrap();
        assert_eq!(actions.len(), 5);
        assert_eq!(actions[0]["origin"][ELEMENT_KEY], json!("a"));
        assert_eq!(actions[2]["duration"], json!(600));
        assert_eq!(actions[3]["origin"][ELEMENT_KEY], json!("b"));
        assert_eq!(actions[4]["type"], json!("pointerUp"));
    }

    #[test]
    fn test_press_button_uses_mobile_script() {
        let req = Command::PressButton { name: "Home" }.to_request("s");
        assert_eq!(req.path, "/session/s/execute/sync");
        assert_eq!(req.body.unwrap()["args"][0]["name"], json!("Home"));
    }

    #[test]
    fn test_decode_w3c_value() {
        let value = decode_response(200, r#"{"value": true}"#).unwrap();
        assert_eq!(value, json!(true));
        assert_eq!(decode_response(200, "").unwrap(), Value::Null);
    }

    #[test]
    fn test_decode_w3c_error() {
        let body = r#"{"value": {"error": "no such element", "message": "Sliders", "stacktrace": ""}}"#;
        let err = decode_response(404, body).unwrap_err();
        assert!(matches!(err, DriverError::NoSuchElement(ref m) if m == "Sliders"));
    }

    #[test]
    fn test_decode_legacy_error() {
        let body = r#"{"sessionId": "s", "status": 13, "value": {"message": "boom"}}"#;
        let err = decode_response(200, body).unwrap_err();
        assert!(matches!(
            err,
            DriverError::Command { ref error, ref message } if error == "unknown error" && message == "boom"
        ));
    }

    #[test]
    fn test_decode_non_json_failure() {
        let err = decode_response(502, "Bad Gateway").unwrap_err();
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[test]
    fn test_parse_session_id_both_shapes() {
        let w3c = json!({ "value": { "sessionId": "w3c", "capabilities": {} } });
        assert_eq!(parse_session_id(&w3c).unwrap(), "w3c");

        let legacy = json!({ "sessionId": "old", "status": 0, "value": {} });
        assert_eq!(parse_session_id(&legacy).unwrap(), "old");

        assert!(matches!(
            parse_session_id(&json!({ "value": {} })),
            Err(DriverError::SessionNotCreated(_))
        ));
    }

    #[test]
    fn test_parse_elements() {
        let value = json!([{ ELEMENT_KEY: "1" }, { "ELEMENT": "2" }]);
        let elements = parse_elements(&value).unwrap();
        assert_eq!(elements, vec![ElementRef::new("1"), ElementRef::new("2")]);
        assert!(parse_element(&json!({})).is_err());
    }

    #[test]
    fn test_optional_string() {
        assert_eq!(optional_string(Value::Null), None);
        assert_eq!(optional_string(json!("blah")), Some("blah".to_string()));
        assert_eq!(optional_string(json!(3)), Some("3".to_string()));
    }
}
