//! Interactive terminal wizards
//!
//! `service` walks through one service's fields and writes its template;
//! `project` collects a Project Profile and writes the artifact bundle.

use anyhow::{Context, Result};
use clap::Subcommand;
use dialoguer::Confirm;
use infragen_config::GeneratorConfig;
use infragen_core::ArtifactBundle;
use std::fs;
use std::path::{Path, PathBuf};

mod names;
mod project;
mod service;

pub use project::ProjectArgs;
pub use service::ServiceArgs;

#[derive(Subcommand, Debug)]
pub enum WizardCommand {
    /// Configure one service and write its CloudFormation template
    Service(ServiceArgs),
    /// Configure a project and write Terraform, IAM and CLI artifacts
    Project(ProjectArgs),
}

impl WizardCommand {
    pub fn run(self, generator: &GeneratorConfig) -> Result<()> {
        match self {
            WizardCommand::Service(args) => service::run(args, generator),
            WizardCommand::Project(args) => project::run(args, generator),
        }
    }
}

/// Ask before replacing `path`; always true with `force`
fn confirm_overwrite(path: &Path, force: bool) -> Result<bool> {
    if force || !path.exists() {
        return Ok(true);
    }
    let overwrite = Confirm::new()
        .with_prompt(format!("{} already exists. Overwrite?", path.display()))
        .default(false)
        .interact()?;
    Ok(overwrite)
}

/// Write every file of `bundle` below `dir`, creating subdirectories
fn write_bundle(dir: &Path, bundle: &ArtifactBundle) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(bundle.len());
    for (name, content) in bundle.iter() {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

/// App and project names end up in resource names and S3 ARNs
#[allow(clippy::ptr_arg)]
fn validate_name(input: &String) -> Result<(), String> {
    if input.is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    if input.len() > 63 {
        return Err("Name must be at most 63 characters".to_string());
    }
    if !input
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("Name must contain only lowercase letters, numbers, and hyphens".to_string());
    }
    if input.starts_with('-') || input.ends_with('-') {
        return Err("Name cannot start or end with a hyphen".to_string());
    }
    Ok(())
}
