use super::{apply_env, apply_file, load_settings, Settings};

use std::{
    collections::HashMap,
    env, fs,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_point_at_local_backend() {
    let settings = Settings::default();
    assert_eq!(settings.api_url, "http://localhost:3000");
    assert_eq!(settings.request_timeout(), Duration::from_secs(10));
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        "api_url = \"http://catalog.internal:8080/api\"\nrequest_timeout_secs = 3\n",
    )
    .expect("apply file");

    assert_eq!(settings.api_url, "http://catalog.internal:8080/api");
    assert_eq!(settings.request_timeout_secs, 3);
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn malformed_file_is_an_error() {
    let mut settings = Settings::default();
    assert!(apply_file(&mut settings, "request_timeout_secs = \"soon\"").is_err());
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let mut settings = Settings::default();
    let warnings = apply_env(
        &mut settings,
        env_from(&[
            ("CATALOG_API_URL", "http://plain:1"),
            ("APP__API_URL", "http://prefixed:2"),
            ("APP__LOG_FILTER", "debug"),
        ]),
    );
    assert!(warnings.is_empty());
    assert_eq!(settings.api_url, "http://prefixed:2");
    assert_eq!(settings.log_filter, "debug");
}

#[test]
fn invalid_timeout_env_is_ignored() {
    let mut settings = Settings::default();
    let warnings = apply_env(
        &mut settings,
        env_from(&[("APP__REQUEST_TIMEOUT_SECS", "forever")]),
    );
    assert_eq!(settings.request_timeout_secs, 10);
    assert_eq!(
        warnings,
        vec!["ignoring invalid APP__REQUEST_TIMEOUT_SECS 'forever'".to_string()]
    );
}

#[test]
fn zero_timeout_is_clamped_to_one_second() {
    let settings = Settings {
        request_timeout_secs: 0,
        ..Settings::default()
    };
    assert_eq!(settings.request_timeout(), Duration::from_secs(1));
}

#[test]
fn load_settings_reads_file_from_disk() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("beer_browser_config_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("browser.toml");
    fs::write(&path, "log_filter = \"warn\"\n").expect("write config");

    let (settings, _) = load_settings(&path).expect("load settings");
    assert_eq!(settings.log_filter, "warn");

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let path = env::temp_dir().join("beer_browser_config_test_does_not_exist.toml");
    let (settings, _) = load_settings(&path).expect("load settings");
    assert_eq!(settings.request_timeout_secs, Settings::default().request_timeout_secs);
}

#[test]
fn blank_api_url_means_no_backend() {
    let mut settings = Settings::default();
    assert_eq!(settings.catalog_url(), Some("http://localhost:3000"));

    apply_file(&mut settings, "api_url = \"   \"\n").expect("apply file");
    assert_eq!(settings.catalog_url(), None);

    let mut settings = Settings::default();
    apply_env(&mut settings, env_from(&[("APP__API_URL", "")]));
    assert_eq!(settings.catalog_url(), None);
}
