//! Integration tests for the headless method channel
//!
//! Drives full NDJSON exchanges through `HeadlessSession` against simulated
//! devices configured the way `.devbridge/config.toml` would configure them.

use std::path::Path;

use serde_json::{json, Value};
use serial_test::serial;
use tempfile::tempdir;

use devbridge::{serve, HeadlessSession};
use devbridge_app::accessibility::AccessibilityRegistry;
use devbridge_app::config::{load_settings, Settings};
use devbridge_host::keys;
use devbridge_host::test_utils::inbox_tree;
use devbridge_host::{SettingValue, WindowBrightness};

fn isolated_registry() -> &'static AccessibilityRegistry {
    Box::leak(Box::new(AccessibilityRegistry::new()))
}

fn session_from_toml(toml: &str) -> (HeadlessSession, tempfile::TempDir) {
    let temp = tempdir().unwrap();
    let dir = temp.path().join(".devbridge");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), toml).unwrap();

    let settings = load_settings(temp.path());
    let session = HeadlessSession::with_registry(&settings, &dir, isolated_registry()).unwrap();
    (session, temp)
}

fn exchange(session: &HeadlessSession, line: &str) -> Value {
    let response = session.process_line(line).expect("response line");
    serde_json::from_str(&response).unwrap()
}

#[test]
fn test_brightness_denied_device_uses_window() {
    let (session, _temp) = session_from_toml(
        r#"
[device]
write_settings_granted = false
"#,
    );

    let response = exchange(
        &session,
        r#"{"id":1,"method":"setBrightness","arguments":{"brightness":75}}"#,
    );
    assert_eq!(response, json!({"id": 1, "result": true}));

    let device = session.device();
    assert_eq!(
        device.window(),
        WindowBrightness::Level(135.0 / 255.0)
    );
    assert_eq!(
        device.setting(&keys::SCREEN_BRIGHTNESS),
        Some(SettingValue::Int(128))
    );

    let response = exchange(&session, r#"{"id":2,"method":"canWriteSettings"}"#);
    assert_eq!(response["result"], false);

    let response = exchange(&session, r#"{"id":3,"method":"requestWriteSettings"}"#);
    assert_eq!(response["result"], false);
    assert_eq!(device.opened_surfaces().len(), 1);
}

#[test]
fn test_calibrated_curve_from_config() {
    let (session, _temp) = session_from_toml(
        r#"
[brightness]
curve = "calibrated"
calibration = [[50, 40], [100, 255]]
"#,
    );

    exchange(
        &session,
        r#"{"id":1,"method":"setBrightness","arguments":{"brightness":30}}"#,
    );
    assert_eq!(
        session.device().setting(&keys::SCREEN_BRIGHTNESS),
        Some(SettingValue::Int(40))
    );
}

#[test]
fn test_toggles_over_the_channel() {
    let (session, _temp) = session_from_toml(
        r#"
[device]
secure_settings_granted = true
"#,
    );
    let device = session.device();

    let response = exchange(
        &session,
        r#"{"id":1,"method":"setAnimationScale","arguments":{"scale":0.5}}"#,
    );
    assert_eq!(response["result"], true);
    for key in [
        keys::WINDOW_ANIMATION_SCALE,
        keys::TRANSITION_ANIMATION_SCALE,
        keys::ANIMATOR_DURATION_SCALE,
    ] {
        assert_eq!(device.setting(&key), Some(SettingValue::Float(0.5)));
    }

    exchange(
        &session,
        r#"{"id":2,"method":"setHapticStrength","arguments":{"strength":"bogus"}}"#,
    );
    assert_eq!(
        device.setting(&keys::HAPTIC_FEEDBACK_INTENSITY),
        Some(SettingValue::Int(100))
    );

    let response = exchange(&session, r#"{"id":3,"method":"enableOneHandedMode"}"#);
    assert_eq!(response["result"], true);
    assert!(device.opened_surfaces().iter().any(|s| s.action.contains("ONE_HANDED")));
}

#[test]
fn test_unsupported_feature_reports_unavailable() {
    let (session, _temp) = session_from_toml(
        r#"
[device]
sdk_level = 30
"#,
    );

    let response = exchange(&session, r#"{"id":9,"method":"enableFlashAlerts"}"#);
    assert_eq!(response["id"], 9);
    assert_eq!(response["error"]["code"], "UNAVAILABLE");
}

#[test]
fn test_read_screen_from_fixture() {
    let temp = tempdir().unwrap();
    std::fs::write(
        temp.path().join("screen.json"),
        serde_json::to_string(&inbox_tree()).unwrap(),
    )
    .unwrap();

    let mut settings = Settings::default();
    settings.accessibility.enabled = true;
    settings.accessibility.screen_fixture = Some("screen.json".into());
    let session =
        HeadlessSession::with_registry(&settings, temp.path(), isolated_registry()).unwrap();

    let response = exchange(&session, r#"{"id":1,"method":"isAccessibilityEnabled"}"#);
    assert_eq!(response["result"], true);

    let response = exchange(&session, r#"{"id":2,"method":"readScreenContent"}"#);
    assert_eq!(
        response["result"],
        "Inbox. Search mail. Alice. Unread. Bob"
    );
}

#[test]
fn test_read_screen_without_service() {
    let session =
        HeadlessSession::with_registry(&Settings::default(), Path::new("."), isolated_registry())
            .unwrap();

    let response = exchange(&session, r#"{"id":1,"method":"readScreenContent"}"#);
    assert_eq!(response["error"]["code"], "UNAVAILABLE");
    assert!(response.get("result").is_none());
}

#[test]
fn test_launch_apps() {
    let (session, _temp) = session_from_toml(
        r#"
[device]
installed_packages = ["com.google.android.gm", "net.oneplus.weather"]
"#,
    );

    assert_eq!(
        exchange(&session, r#"{"id":1,"method":"launchGmailApp"}"#)["result"],
        true
    );
    assert_eq!(
        exchange(&session, r#"{"id":2,"method":"launchWeatherApp"}"#)["result"],
        true
    );

    let response = exchange(
        &session,
        r#"{"id":3,"method":"launchApp","arguments":{"packageName":"com.example.absent"}}"#,
    );
    assert_eq!(response["error"]["code"], "NOT_FOUND");

    assert_eq!(
        session.device().launched(),
        vec![
            "com.google.android.gm".to_string(),
            "net.oneplus.weather".to_string()
        ]
    );
}

#[test]
#[serial]
fn test_process_wide_registry_session() {
    let temp = tempdir().unwrap();
    let mut settings = Settings::default();
    settings.accessibility.enabled = true;

    let session = HeadlessSession::from_settings(&settings, temp.path()).unwrap();
    session.device().set_screen(Some(inbox_tree()));

    let response = exchange(&session, r#"{"id":1,"method":"readScreenContent"}"#);
    assert!(response["result"].as_str().unwrap().contains("Alice"));

    devbridge_app::registry().on_destroy();
    let response = exchange(&session, r#"{"id":2,"method":"readScreenContent"}"#);
    assert_eq!(response["error"]["code"], "UNAVAILABLE");
}

#[tokio::test]
async fn test_serve_stream() {
    let session =
        HeadlessSession::with_registry(&Settings::default(), Path::new("."), isolated_registry())
            .unwrap();
    let input = concat!(
        r#"{"id":1,"method":"setVolume","arguments":{"level":100}}"#,
        "\n",
        "garbage\n",
        r#"{"id":3,"method":"openAccessibilitySettings"}"#,
        "\n",
    );
    let mut output = Vec::new();

    let handled = serve(&session, input.as_bytes(), &mut output).await.unwrap();
    assert_eq!(handled, 3);

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(responses[0], json!({"id": 1, "result": true}));
    assert_eq!(responses[1]["error"]["code"], "PROTOCOL_ERROR");
    assert_eq!(responses[2], json!({"id": 3, "result": true}));
    assert_eq!(session.device().volume_index(), 15);
}

#[tokio::test]
async fn test_serve_stream_keeps_going_after_binary_line() {
    let session =
        HeadlessSession::with_registry(&Settings::default(), Path::new("."), isolated_registry())
            .unwrap();
    let mut input = b"\x80\x81garbage\n".to_vec();
    input.extend_from_slice(br#"{"id":"b","method":"setVolume","arguments":{"level":40}}"#);
    input.push(b'\n');
    let mut output = Vec::new();

    let handled = serve(&session, input.as_slice(), &mut output).await.unwrap();
    assert_eq!(handled, 2);

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(responses[0]["error"]["code"], "PROTOCOL_ERROR");
    assert_eq!(responses[1], json!({"id": "b", "result": true}));
    assert_eq!(session.device().volume_index(), 6);
}
