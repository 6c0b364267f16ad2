use console_core::config::{load_settings, TelemetrySettings};
use console_core::AppError;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub api: ApiSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Server-side sessions expire after this much inactivity.
    #[serde(default = "default_session_inactivity_hours")]
    pub session_inactivity_hours: i64,
}

fn default_session_inactivity_hours() -> i64 {
    24
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApiSettings {
    /// Base URL of the REST backend, without a trailing slash.
    pub url: String,
}

impl ApiSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
        }
    }
}

pub fn get_configuration() -> Result<Settings, AppError> {
    let base_path = std::env::current_dir()
        .map_err(|e| AppError::Config(anyhow::anyhow!("Failed to determine the current directory: {}", e)))?;

    // Works both from the workspace root and from inside admin-console/
    let configuration_directory: PathBuf = if base_path.ends_with("admin-console") {
        base_path.join("config")
    } else {
        base_path.join("admin-console").join("config")
    };

    let mut settings: Settings = load_settings(&configuration_directory)?;
    settings.api = ApiSettings::new(settings.api.url);
    Ok(settings)
}
