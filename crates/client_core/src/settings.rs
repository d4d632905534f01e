use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "juststore.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_url: String,
    pub request_timeout_secs: u64,
    /// Address the OAuth callback lands on; used as the page URL when none
    /// is supplied.
    pub frontend_url: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".into(),
            request_timeout_secs: 30,
            frontend_url: "http://localhost:5173".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
    frontend_url: Option<String>,
}

/// Defaults, then the settings file, then environment overrides.
///
/// An explicitly requested file must exist; the default file is optional.
pub fn load_settings(explicit_path: Option<&Path>) -> Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    let path = explicit_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    match fs::read_to_string(&path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
            apply_file_settings(&mut settings, file_cfg);
        }
        Err(err) if explicit_path.is_some() => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()));
        }
        Err(_) => {}
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    finalize(settings)
}

fn apply_file_settings(settings: &mut ClientSettings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.api_url {
        settings.api_url = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.frontend_url {
        settings.frontend_url = v;
    }
}

fn apply_env_overrides(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = last_set(&lookup, &["JUSTSTORE_API_URL", "APP__API_URL"]) {
        settings.api_url = v;
    }
    if let Some(v) = last_set(
        &lookup,
        &["JUSTSTORE_REQUEST_TIMEOUT_SECS", "APP__REQUEST_TIMEOUT_SECS"],
    ) {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
    if let Some(v) = last_set(&lookup, &["JUSTSTORE_FRONTEND_URL", "APP__FRONTEND_URL"]) {
        settings.frontend_url = v;
    }
}

/// The later key in `keys` takes precedence.
fn last_set(lookup: &impl Fn(&str) -> Option<String>, keys: &[&str]) -> Option<String> {
    keys.iter().rev().find_map(|&key| lookup(key))
}

fn finalize(mut settings: ClientSettings) -> Result<ClientSettings> {
    settings.api_url = normalize_api_url(&settings.api_url);
    Url::parse(&settings.api_url)
        .with_context(|| format!("invalid api url '{}'", settings.api_url))?;
    Url::parse(&settings.frontend_url)
        .with_context(|| format!("invalid frontend url '{}'", settings.frontend_url))?;
    if settings.request_timeout_secs == 0 {
        settings.request_timeout_secs = ClientSettings::default().request_timeout_secs;
    }
    Ok(settings)
}

fn normalize_api_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ClientSettings::default().api_url;
    }
    trimmed.trim_end_matches('/').to_string()
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
