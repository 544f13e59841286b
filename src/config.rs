//! Viewer settings.
//!
//! Read from an optional TOML file, then overridden by `VIDEO_VIEWER_*`
//! environment variables (sections separated by `__`, eg.
//! `VIDEO_VIEWER_PLATFORM__RECORD_ID`).

use crate::dimensions::FormFactor;
use crate::urls::DownloadScheme;
use crate::viewer::{HostContext, VideoViewer, ViewerOptions};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "VIDEO_VIEWER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "video-viewer.toml";
pub const DEFAULT_API_URL: &str = "http://localhost:8090";
const ENV_PREFIX: &str = "VIDEO_VIEWER";

/// Where documents come from and which record page we are on.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlatformSettings {
    pub api_url: String,
    pub token: Option<String>,
    pub record_id: Option<String>,
    pub object_api_name: Option<String>,
    pub form_factor: String,
    /// Subscribe to attachment changes.
    pub realtime: bool,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            record_id: None,
            object_api_name: None,
            form_factor: "Large".to_string(),
            realtime: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub platform: PlatformSettings,
    pub display: ViewerOptions,
    pub download: DownloadScheme,
}

impl Settings {
    /// Load from the file named by `VIDEO_VIEWER_CONFIG` (or the default path).
    pub fn load() -> Result<Self> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    /// Load from `path` if it exists, then apply environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("Failed to read config from {}", path.display()))?
            .try_deserialize()
            .context("Invalid viewer configuration")?;

        tracing::debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    pub fn host_context(&self) -> HostContext {
        HostContext {
            record_id: self.platform.record_id.clone(),
            object_api_name: self.platform.object_api_name.clone(),
            form_factor: FormFactor::from_str(&self.platform.form_factor),
        }
    }

    /// A fresh viewer for the configured record page.
    pub fn viewer(&self) -> VideoViewer {
        VideoViewer::with_scheme(
            self.display.clone(),
            self.host_context(),
            self.download.clone(),
        )
    }
}
