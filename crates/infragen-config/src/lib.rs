// infragen-config - Runtime configuration for the server and CLI
//
// Supports configuration from multiple sources:
// 1. Environment variables (highest priority)
// 2. Config file path from INFRAGEN_CONFIG env var
// 3. Config file contents from INFRAGEN_CONFIG_CONTENT env var
// 4. Default config file locations (./config.toml, ./.infragen.toml)
// 5. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use infragen_core::{MachineImageTable, OutputFormat, ServiceType, TemplateProcessor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

mod env_overrides;
mod sources;
mod validation;

pub use env_overrides::{EnvSource, ENV_PREFIX};

/// Main runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub request: RequestConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: LogFormat,
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3001".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            cors_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Unsupported log format: {}. Supported: text, json", s),
        }
    }
}

/// Request handling configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub max_payload_bytes: usize,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: 1024 * 1024,
        }
    }
}

/// Template generation switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Service types offered by `/services` and accepted by `/generate-config`
    pub enabled_services: Vec<ServiceType>,
    pub output_format: OutputFormat,
    /// Region to machine image overrides on top of the built-in table
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub images: BTreeMap<String, String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled_services: ServiceType::ALL.to_vec(),
            output_format: OutputFormat::default(),
            images: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    pub fn image_table(&self) -> MachineImageTable {
        let builtin = MachineImageTable::builtin();
        if self.images.is_empty() {
            return builtin.clone();
        }
        builtin.with_overrides(
            format!("{}+local", builtin.version()),
            self.images.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }

    /// Processor honoring these switches
    pub fn processor(&self) -> TemplateProcessor {
        TemplateProcessor::new(self.enabled_services.clone())
            .with_format(self.output_format)
            .with_images(self.image_table())
    }
}

impl RuntimeConfig {
    /// Load configuration from all sources with priority
    pub fn load() -> Result<Self> {
        sources::load_config()
    }

    /// Load from an explicit file (CLI `--config`), then apply env overrides
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        sources::load_from_file_path(path)
    }

    /// Build a configuration from optional inline TOML plus overrides
    /// supplied by an `EnvSource`. Used by tests and embedders.
    pub fn load_with_env<E: EnvSource>(inline_config: Option<&str>, env: &E) -> Result<Self> {
        let mut config = match inline_config {
            Some(inline) => Self::from_toml_str(inline)?,
            None => Self::default(),
        };
        config.apply_env_overrides_from(env)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse inline config content")
    }

    /// Apply environment overrides from a custom source
    pub fn apply_env_overrides_from<E: EnvSource>(&mut self, env: &E) -> Result<()> {
        env_overrides::apply_env_overrides(self, env)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}
