use std::{collections::HashMap, fs, io, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;

use crate::store::DEFAULT_EVENT_BUFFER;

pub const DEFAULT_CONFIG_FILE: &str = "labctl.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub settle_timeout_secs: u64,
    pub log_filter: String,
    pub event_buffer: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:9950/api".into(),
            request_timeout_secs: 30,
            settle_timeout_secs: 60,
            log_filter: "info".into(),
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_secs(self.settle_timeout_secs)
    }
}

/// Defaults, then `labctl.toml` in the working directory, then environment.
pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Like [`load_settings`] with an explicit file. A missing file is not an
/// error; an unreadable or malformed one is.
pub fn load_settings_from(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg = toml::from_str::<HashMap<String, String>>(&raw)
                .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
            apply_file(&mut settings, &file_cfg)
                .with_context(|| format!("invalid settings file '{}'", path.display()))?;
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, file_cfg: &HashMap<String, String>) -> anyhow::Result<()> {
    if let Some(v) = file_cfg.get("api_url") {
        settings.api_url = v.clone();
    }
    if let Some(v) = file_cfg.get("request_timeout_secs") {
        settings.request_timeout_secs = parse_number("request_timeout_secs", v)?;
    }
    if let Some(v) = file_cfg.get("settle_timeout_secs") {
        settings.settle_timeout_secs = parse_number("settle_timeout_secs", v)?;
    }
    if let Some(v) = file_cfg.get("log_filter") {
        settings.log_filter = v.clone();
    }
    if let Some(v) = file_cfg.get("event_buffer") {
        settings.event_buffer = parse_number("event_buffer", v)?;
    }
    Ok(())
}

/// Environment overrides. `lookup` stands in for `std::env::var` so tests do
/// not have to mutate the process environment.
pub fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("LAB_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = lookup("APP__API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = parse_number("APP__REQUEST_TIMEOUT_SECS", &v)?;
    }
    if let Some(v) = lookup("APP__SETTLE_TIMEOUT_SECS") {
        settings.settle_timeout_secs = parse_number("APP__SETTLE_TIMEOUT_SECS", &v)?;
    }
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
    if let Some(v) = lookup("APP__EVENT_BUFFER") {
        settings.event_buffer = parse_number("APP__EVENT_BUFFER", &v)?;
    }
    Ok(())
}

fn parse_number<T>(key: &str, raw: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
