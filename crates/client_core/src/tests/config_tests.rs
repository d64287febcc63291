use std::time::{SystemTime, UNIX_EPOCH};

use super::*;

fn temp_file(contents: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = std::env::temp_dir().join(format!("labctl_settings_{suffix}.toml"));
    fs::write(&path, contents).expect("write settings");
    path
}

fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |key: &str| {
        pairs
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.to_string())
    }
}

#[test]
fn defaults_point_at_a_local_api() {
    let settings = Settings::default();
    assert_eq!(settings.api_url, "http://localhost:9950/api");
    assert_eq!(settings.request_timeout(), Duration::from_secs(30));
    assert_eq!(settings.event_buffer, DEFAULT_EVENT_BUFFER);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let path = std::env::temp_dir().join("labctl_settings_that_do_not_exist.toml");
    let mut expected = Settings::default();
    apply_env(&mut expected, |key| std::env::var(key).ok()).expect("env");

    assert_eq!(load_settings_from(&path).expect("settings"), expected);
}

#[test]
fn file_values_override_defaults() {
    let path = temp_file(
        r#"
api_url = "https://lab.example.org/api"
request_timeout_secs = "5"
log_filter = "client_core=debug"
"#,
    );
    let mut settings = Settings::default();
    let raw = fs::read_to_string(&path).expect("read");
    let file_cfg: HashMap<String, String> = toml::from_str(&raw).expect("toml");
    apply_file(&mut settings, &file_cfg).expect("apply");
    fs::remove_file(&path).expect("cleanup");

    assert_eq!(settings.api_url, "https://lab.example.org/api");
    assert_eq!(settings.request_timeout_secs, 5);
    assert_eq!(settings.log_filter, "client_core=debug");
    assert_eq!(settings.settle_timeout_secs, 60);
}

#[test]
fn malformed_numbers_are_reported_with_their_key() {
    let path = temp_file("settle_timeout_secs = \"soon\"\n");
    let err = load_settings_from(&path).expect_err("invalid");
    fs::remove_file(&path).expect("cleanup");

    assert!(format!("{err:#}").contains("settle_timeout_secs"));
}

#[test]
fn env_overrides_win_and_app_prefix_beats_legacy_name() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_of(&[
            ("LAB_API_URL", "http://legacy/api"),
            ("APP__API_URL", "http://primary/api"),
            ("APP__SETTLE_TIMEOUT_SECS", "7"),
            ("APP__LOG_FILTER", "warn"),
        ]),
    )
    .expect("env");

    assert_eq!(settings.api_url, "http://primary/api");
    assert_eq!(settings.settle_timeout(), Duration::from_secs(7));
    assert_eq!(settings.log_filter, "warn");
}

#[test]
fn invalid_env_numbers_are_errors() {
    let mut settings = Settings::default();
    let err = apply_env(&mut settings, env_of(&[("APP__REQUEST_TIMEOUT_SECS", "-1")]))
        .expect_err("negative");
    assert!(err.to_string().contains("APP__REQUEST_TIMEOUT_SECS"));
}
