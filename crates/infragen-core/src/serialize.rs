//! Descriptor serialization
//!
//! YAML is the primary interchange format; JSON is offered for tooling that
//! prefers it. Both preserve key order and parse back to an equal tree.

use crate::descriptor::DeploymentDescriptor;
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    /// File extension used for downloads
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        }
    }

    pub fn serialize(&self, descriptor: &DeploymentDescriptor) -> Result<String> {
        match self {
            OutputFormat::Yaml => to_yaml(descriptor),
            OutputFormat::Json => to_json(descriptor),
        }
    }

    pub fn parse(&self, text: &str) -> Result<DeploymentDescriptor> {
        match self {
            OutputFormat::Yaml => from_yaml(text),
            OutputFormat::Json => from_json(text),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            _ => anyhow::bail!("Unsupported output format: {}. Supported: yaml, json", s),
        }
    }
}

pub fn to_yaml(descriptor: &DeploymentDescriptor) -> Result<String> {
    serde_yaml_ng::to_string(descriptor).map_err(|e| ConfigError::Serialization {
        message: e.to_string(),
    })
}

pub fn from_yaml(text: &str) -> Result<DeploymentDescriptor> {
    serde_yaml_ng::from_str(text).map_err(|e| ConfigError::Serialization {
        message: e.to_string(),
    })
}

pub fn to_json(descriptor: &DeploymentDescriptor) -> Result<String> {
    serde_json::to_string_pretty(descriptor).map_err(|e| ConfigError::Serialization {
        message: e.to_string(),
    })
}

pub fn from_json(text: &str) -> Result<DeploymentDescriptor> {
    serde_json::from_str(text).map_err(|e| ConfigError::Serialization {
        message: e.to_string(),
    })
}
