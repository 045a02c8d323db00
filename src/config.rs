use crate::cli::{Cli, OutputFormat, VerbosityLevel};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application directory name under the user's config directory
const APP_NAME: &str = "book-catalog";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub output: OutputConfig,
}

/// Catalog source configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog file to load
    pub path: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormatConfig,
    /// Verbose output
    pub verbose: bool,
    /// Quiet mode (errors only)
    pub quiet: bool,
    /// Error debug details
    pub debug: bool,
    /// Prefix lines with the time of day
    pub timestamps: bool,
}

/// Output format configuration (serializable version of CLI OutputFormat)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormatConfig {
    #[default]
    Human,
    Json,
}

impl From<OutputFormat> for OutputFormatConfig {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputFormatConfig::Human,
            OutputFormat::Json => OutputFormatConfig::Json,
        }
    }
}

impl From<OutputFormatConfig> for OutputFormat {
    fn from(format: OutputFormatConfig) -> Self {
        match format {
            OutputFormatConfig::Human => OutputFormat::Human,
            OutputFormatConfig::Json => OutputFormat::Json,
        }
    }
}

impl OutputConfig {
    pub fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.debug {
            VerbosityLevel::Debug
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Configuration manager for loading and merging configurations
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: defaults -> file -> CLI
    pub async fn load_config(cli: &Cli) -> Result<Config> {
        let mut config = Config::default();

        if let Some(config_path) = &cli.config {
            let file_config = Self::load_from_file(config_path).await?;
            config = Self::merge_configs(config, file_config);
        } else if let Some(found_config) = Self::find_config_file().await? {
            config = Self::merge_configs(config, found_config);
        }

        config = Self::merge_with_cli(config, cli);

        Self::validate_config(&config)?;

        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON)
    pub async fn load_from_file(path: &Path) -> Result<Config> {
        let content = tokio::fs::read_to_string(path).await?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => {
                // Try to parse as TOML first, then JSON
                if let Ok(config) = toml::from_str::<Config>(&content) {
                    Ok(config)
                } else {
                    Ok(serde_json::from_str(&content)?)
                }
            }
        }
    }

    /// Find configuration file in the current directory, then the user config directory
    pub async fn find_config_file() -> Result<Option<Config>> {
        let mut search_dirs = vec![PathBuf::from(".")];
        if let Some(config_dir) = dirs::config_dir() {
            search_dirs.push(config_dir.join(APP_NAME));
        }
        Self::find_config_file_in(&search_dirs).await
    }

    /// Load the first known configuration file found in `search_dirs`
    pub async fn find_config_file_in(search_dirs: &[PathBuf]) -> Result<Option<Config>> {
        let config_names = [
            "book-catalog.toml",
            "book-catalog.json",
            ".book-catalog.toml",
            ".book-catalog.json",
        ];

        for dir in search_dirs {
            for name in &config_names {
                let path = dir.join(name);
                if tokio::fs::try_exists(&path).await? {
                    return Ok(Some(Self::load_from_file(&path).await?));
                }
            }
        }

        Ok(None)
    }

    /// Merge CLI arguments with configuration (CLI takes precedence)
    pub fn merge_with_cli(mut config: Config, cli: &Cli) -> Config {
        if let Some(path) = &cli.catalog {
            config.catalog.path = Some(path.clone());
        }

        if let Some(format) = cli.output_format {
            config.output.format = format.into();
        }
        // Flags can only switch modes on; an explicit mode replaces the configured one
        if cli.quiet {
            config.output.quiet = true;
            config.output.verbose = false;
            config.output.debug = false;
        }
        if cli.verbose {
            config.output.verbose = true;
            config.output.quiet = false;
        }
        if cli.debug {
            config.output.debug = true;
            config.output.quiet = false;
        }
        config.output.timestamps |= cli.timestamps;

        config
    }

    /// Merge two configurations (second takes precedence for set values)
    pub fn merge_configs(mut base: Config, override_config: Config) -> Config {
        if override_config.catalog.path.is_some() {
            base.catalog.path = override_config.catalog.path;
        }

        base.output.format = override_config.output.format;
        base.output.verbose = override_config.output.verbose;
        base.output.quiet = override_config.output.quiet;
        base.output.debug = override_config.output.debug;
        base.output.timestamps = override_config.output.timestamps;

        base
    }

    /// Validate configuration values
    pub fn validate_config(config: &Config) -> Result<()> {
        if let Some(path) = &config.catalog.path
            && path.as_os_str().is_empty()
        {
            return Err(ConfigError::Validation(
                "Catalog path must not be empty".to_string(),
            ));
        }

        if config.output.verbose && config.output.quiet {
            return Err(ConfigError::Validation(
                "Cannot enable both verbose and quiet modes".to_string(),
            ));
        }

        if config.output.debug && config.output.quiet {
            return Err(ConfigError::Validation(
                "Cannot enable both debug and quiet modes".to_string(),
            ));
        }

        Ok(())
    }
}
