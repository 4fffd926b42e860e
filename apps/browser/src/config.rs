use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".into(),
            request_timeout_secs: 10,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// `None` when the catalog url was blanked out, meaning no backend.
    pub fn catalog_url(&self) -> Option<&str> {
        let url = self.api_url.trim();
        (!url.is_empty()).then_some(url)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
    log_filter: Option<String>,
}

/// Defaults, then `path` if it exists, then environment overrides.
///
/// Also returns warnings about ignored values; they are produced before the
/// log subscriber exists, so the caller logs them once it is installed.
pub fn load_settings(path: &Path) -> anyhow::Result<(Settings, Vec<String>)> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
    }

    let warnings = apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok((settings, warnings))
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.api_url {
        settings.api_url = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(v) = var("CATALOG_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = var("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(_) => warnings.push(format!("ignoring invalid APP__REQUEST_TIMEOUT_SECS '{v}'")),
        }
    }

    if let Some(v) = var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    warnings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
