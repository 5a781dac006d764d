use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_SERVICE_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_EXPORT_FILE_NAME: &str = "feedback_export.csv";
pub const SERVICE_URL_ENV: &str = "FEEDBACK_SERVICE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub service_base_url: String,
    /// Per-request timeout. Unset means no client-side timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    pub export_file_name: String,
    pub comment_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_base_url: DEFAULT_SERVICE_BASE_URL.to_string(),
            request_timeout_secs: None,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            comment_width: 60,
        }
    }
}

impl Config {
    /// `<platform config dir>/feedback-dashboard/config.yaml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("feedback-dashboard")
            .join("config.yaml")
    }

    /// Reads the YAML file at `path`; a missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// File (explicit or default location), then the environment, then
    /// the command-line override.
    pub fn resolve(path: Option<&Path>, service_url: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load_from(&Self::default_path())?,
        };

        if let Ok(url) = std::env::var(SERVICE_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                config.service_base_url = url.to_string();
            }
        }
        if let Some(url) = service_url {
            config.service_base_url = url.to_string();
        }

        config.service_base_url = config.service_base_url.trim_end_matches('/').to_string();
        Ok(config)
    }
}
