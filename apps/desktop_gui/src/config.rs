use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use client_core::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_SERVICE_URL};
use serde::Deserialize;

pub const SETTINGS_FILE_NAME: &str = "converter.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub service_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    service_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn apply_overrides(&mut self, service_url: Option<String>, timeout_secs: Option<u64>) {
        if let Some(v) = service_url {
            self.service_url = v;
        }
        if let Some(v) = timeout_secs {
            self.request_timeout_secs = v;
        }
    }
}

/// Defaults, then the first settings file found, then environment.
pub fn load_settings() -> Settings {
    load_settings_with(&settings_file_candidates(), |key| std::env::var(key).ok())
}

fn settings_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(SETTINGS_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("doc_converter").join(SETTINGS_FILE_NAME));
    }
    candidates
}

fn load_settings_with(candidates: &[PathBuf], env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(file_cfg) = candidates.iter().find_map(|path| read_settings_file(path)) {
        if let Some(v) = file_cfg.service_url {
            settings.service_url = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            settings.request_timeout_secs = v;
        }
    }

    if let Some(v) = env("CONVERTER_SERVICE_URL") {
        settings.service_url = v;
    }
    if let Some(v) = env("APP__SERVICE_URL") {
        settings.service_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(err) => tracing::warn!("ignoring APP__REQUEST_TIMEOUT_SECS={v:?}: {err}"),
        }
    }

    settings
}

fn read_settings_file(path: &Path) -> Option<FileSettings> {
    let raw = fs::read_to_string(path).ok()?;
    match toml::from_str::<FileSettings>(&raw) {
        Ok(file_cfg) => {
            tracing::debug!("loaded settings from '{}'", path.display());
            Some(file_cfg)
        }
        Err(err) => {
            tracing::warn!("ignoring malformed settings file '{}': {err}", path.display());
            None
        }
    }
}
