//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::toml_config::{ClipFlowConfig, MetadataPolicyKind, TomlConfigAdapter};
use crate::cli::{Cli, Commands};
use crate::error::ClipFlowResult;
use crate::utils::logging::LogFormat;

pub const ENV_SERVICE_URL: &str = "CLIPFLOW_SERVICE_URL";
pub const ENV_LOG_LEVEL: &str = "CLIPFLOW_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "CLIPFLOW_LOG_FORMAT";
pub const ENV_OUTPUT_DIR: &str = "CLIPFLOW_OUTPUT_DIR";
pub const ENV_METADATA_POLICY: &str = "CLIPFLOW_METADATA_POLICY";
pub const ENV_FFPROBE: &str = "CLIPFLOW_FFPROBE";

/// Build the effective configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<ClipFlowConfig> {
    let adapter = match &cli.config {
        Some(path) => TomlConfigAdapter::new(path),
        None => TomlConfigAdapter::discover(),
    };
    let mut config = adapter.load().context("Failed to load configuration")?;

    let env_overrides = apply_environment_overrides(&mut config, |key| std::env::var(key).ok())?;
    let cli_overrides = apply_cli_overrides(&mut config, cli)?;
    config.validate().context("Configuration rejected")?;

    info!(
        file = ?adapter.config_file_path(),
        env_overrides,
        cli_overrides,
        "Configuration hierarchy initialized"
    );
    Ok(config)
}

/// Apply `CLIPFLOW_*` variables found through `lookup`; returns how many applied
pub fn apply_environment_overrides<F>(config: &mut ClipFlowConfig, lookup: F) -> ClipFlowResult<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = 0;
    let mut found = |key: &str| {
        let value = lookup(key).filter(|value| !value.trim().is_empty());
        if value.is_some() {
            applied += 1;
        }
        value
    };

    if let Some(url) = found(ENV_SERVICE_URL) {
        config.service.base_url = url;
    }
    if let Some(level) = found(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }
    if let Some(format) = found(ENV_LOG_FORMAT) {
        config.logging.format = LogFormat::parse(&format)?;
    }
    if let Some(dir) = found(ENV_OUTPUT_DIR) {
        config.download.directory = PathBuf::from(dir);
    }
    if let Some(policy) = found(ENV_METADATA_POLICY) {
        config.metadata.policy = MetadataPolicyKind::parse(&policy)?;
    }
    if let Some(ffprobe) = found(ENV_FFPROBE) {
        config.playback.ffprobe_path = ffprobe;
    }

    Ok(applied)
}

/// Apply command-line overrides; returns how many applied
pub fn apply_cli_overrides(config: &mut ClipFlowConfig, cli: &Cli) -> ClipFlowResult<usize> {
    let mut applied = 0;

    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
        applied += 1;
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = LogFormat::parse(format)?;
        applied += 1;
    }
    if let Some(url) = &cli.service_url {
        config.service.base_url = url.clone();
        applied += 1;
    }
    if let Commands::Run(args) = &cli.command {
        if let Some(dir) = &args.output_dir {
            config.download.directory = dir.clone();
            applied += 1;
        }
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use clap::Parser;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_environment_overrides() {
        let mut config = ClipFlowConfig::default();
        let applied = apply_environment_overrides(
            &mut config,
            env(&[
                (ENV_SERVICE_URL, "https://media.example"),
                (ENV_LOG_FORMAT, "json"),
                (ENV_METADATA_POLICY, "fallback"),
                (ENV_OUTPUT_DIR, "/tmp/clips"),
                (ENV_FFPROBE, ""),
            ]),
        )
        .unwrap();

        assert_eq!(applied, 4);
        assert_eq!(config.service.base_url, "https://media.example");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.metadata.policy, MetadataPolicyKind::Fallback);
        assert_eq!(config.download.directory, PathBuf::from("/tmp/clips"));
        assert_eq!(config.playback.ffprobe_path, "ffprobe");
    }

    #[test]
    fn test_invalid_environment_value() {
        let mut config = ClipFlowConfig::default();
        assert!(
            apply_environment_overrides(&mut config, env(&[(ENV_METADATA_POLICY, "guess")]))
                .is_err()
        );
    }

    #[test]
    fn test_cli_beats_environment() {
        let mut config = ClipFlowConfig::default();
        apply_environment_overrides(
            &mut config,
            env(&[(ENV_SERVICE_URL, "https://env.example"), (ENV_LOG_LEVEL, "warn")]),
        )
        .unwrap();

        let cli = Cli::parse_from([
            "clipflow",
            "--service-url",
            "https://cli.example",
            "run",
            "--url",
            "https://cdn.example/a.mp4",
            "--output-dir",
            "out",
        ]);
        let applied = apply_cli_overrides(&mut config, &cli).unwrap();

        assert_eq!(applied, 2);
        assert_eq!(config.service.base_url, "https://cli.example");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.download.directory, PathBuf::from("out"));
    }

    #[test]
    fn test_hierarchy_reads_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("clipflow.toml");
        std::fs::write(
            &path,
            "[service]\nbase_url = \"https://file.example\"\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let cli = Cli::parse_from([
            "clipflow",
            "--config",
            path.to_str().unwrap(),
            "--log-level",
            "error",
            "config",
        ]);
        let config = initialize_configuration_hierarchy(&cli).unwrap();
        assert_eq!(config.logging.level, "error");
        assert_eq!(config.service.trim_path, "/trim");
    }

    #[test]
    fn test_hierarchy_missing_explicit_file() {
        let cli = Cli::parse_from(["clipflow", "--config", "/no/such/clipflow.toml", "config"]);
        assert!(initialize_configuration_hierarchy(&cli).is_err());
    }
}
