// TOML config adapter - Configuration loading using TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::model::MetadataPolicy;
use crate::error::{ClipFlowError, ClipFlowResult};
use crate::utils::logging::{validate_level, LoggingConfig};

/// Files probed, in order, when no `--config` is given
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["clipflow.toml", "config/clipflow.toml"];

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipFlowConfig {
    pub service: ServiceConfig,
    pub playback: PlaybackConfig,
    pub metadata: MetadataConfig,
    pub download: DownloadConfig,
    pub logging: LoggingConfig,
}

/// Media service endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub upload_path: String,
    pub upload_url_path: String,
    pub trim_path: String,
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            upload_path: "/upload".to_string(),
            upload_url_path: "/upload-url".to_string(),
            trim_path: "/trim".to_string(),
            timeout_secs: 120,
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Headless playback component (ffprobe)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub ffprobe_path: String,
    pub probe_timeout_secs: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: "ffprobe".to_string(),
            probe_timeout_secs: 30,
        }
    }
}

/// Policy name as written in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataPolicyKind {
    #[default]
    Disabled,
    Fallback,
}

impl MetadataPolicyKind {
    pub fn parse(name: &str) -> ClipFlowResult<Self> {
        match name.to_lowercase().as_str() {
            "disabled" => Ok(MetadataPolicyKind::Disabled),
            "fallback" => Ok(MetadataPolicyKind::Fallback),
            other => Err(ClipFlowError::InvalidConfig {
                message: format!(
                    "Invalid metadata policy: {}. Valid policies: disabled, fallback",
                    other
                ),
            }),
        }
    }
}

/// Behaviour when duration metadata never arrives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    pub policy: MetadataPolicyKind,
    pub fallback_max_seconds: f64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            policy: MetadataPolicyKind::Disabled,
            fallback_max_seconds: 3600.0,
        }
    }
}

impl MetadataConfig {
    pub fn policy(&self) -> MetadataPolicy {
        match self.policy {
            MetadataPolicyKind::Disabled => MetadataPolicy::Disabled,
            MetadataPolicyKind::Fallback => MetadataPolicy::Fallback {
                max_seconds: self.fallback_max_seconds,
            },
        }
    }
}

/// Where downloaded clips land
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub directory: PathBuf,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

impl ClipFlowConfig {
    /// Reject values the workflow cannot run with
    pub fn validate(&self) -> ClipFlowResult<()> {
        validate_level(&self.logging.level)?;

        if self.service.base_url.trim().is_empty() {
            return Err(ClipFlowError::InvalidConfig {
                message: "service.base_url cannot be empty".to_string(),
            });
        }
        if self.service.timeout_secs == 0 {
            return Err(ClipFlowError::InvalidConfig {
                message: "service.timeout_secs must be positive".to_string(),
            });
        }
        if self.playback.probe_timeout_secs == 0 {
            return Err(ClipFlowError::InvalidConfig {
                message: "playback.probe_timeout_secs must be positive".to_string(),
            });
        }
        let max = self.metadata.fallback_max_seconds;
        if !max.is_finite() || max <= 0.0 {
            return Err(ClipFlowError::InvalidConfig {
                message: "metadata.fallback_max_seconds must be positive".to_string(),
            });
        }

        Ok(())
    }
}

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    config_file_path: Option<PathBuf>,
}

impl TomlConfigAdapter {
    /// Adapter reading an explicit file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            config_file_path: Some(path.into()),
        }
    }

    /// Adapter probing [`DEFAULT_CONFIG_PATHS`]
    pub fn discover() -> Self {
        let found = DEFAULT_CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists());
        Self {
            config_file_path: found,
        }
    }

    pub fn config_file_path(&self) -> Option<&Path> {
        self.config_file_path.as_deref()
    }

    /// Read the file, or fall back to defaults when none was found
    pub fn load(&self) -> ClipFlowResult<ClipFlowConfig> {
        let Some(path) = &self.config_file_path else {
            tracing::debug!("No configuration file found, using defaults");
            return Ok(ClipFlowConfig::default());
        };

        if !path.exists() {
            return Err(ClipFlowError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Deserialize config from a TOML string
    pub fn parse(toml_content: &str) -> ClipFlowResult<ClipFlowConfig> {
        Ok(toml::from_str(toml_content)?)
    }

    /// Serialize config to a TOML string
    pub fn render(config: &ClipFlowConfig) -> ClipFlowResult<String> {
        Ok(toml::to_string_pretty(config)?)
    }
}
