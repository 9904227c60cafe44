//! Single-service wizard: collect a Configuration and write its template

use anyhow::{bail, Context, Result};
use clap::Args;
use dialoguer::{Input, Select};
use infragen_config::GeneratorConfig;
use infragen_core::generators::{container_service, serverless_function, virtual_machine};
use infragen_core::{Configuration, OutputFormat, ReferenceData, ServiceType};
use std::fs;
use std::path::PathBuf;

use super::{confirm_overwrite, names, validate_name};

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_INSTANCE_TYPE: &str = "t2.micro";

#[derive(Args, Debug)]
pub struct ServiceArgs {
    /// Service type: ec2, lambda or ecs
    #[arg(long, value_name = "SERVICE")]
    pub service: Option<ServiceType>,

    /// Application name used for resource names
    #[arg(long)]
    pub app_name: Option<String>,

    /// Output format: yaml or json (overrides config file)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Directory to write the template into
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Also save the collected Configuration as JSON
    #[arg(long)]
    pub save_config: bool,

    /// Overwrite existing files without asking
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: ServiceArgs, generator: &GeneratorConfig) -> Result<()> {
    println!();
    println!("infragen wizard - single service template");
    println!();

    let reference = ReferenceData::builtin();
    let service = match args.service {
        Some(service) => {
            if !generator.enabled_services.contains(&service) {
                bail!("Service type '{}' is disabled by configuration", service);
            }
            service
        }
        None => select_service(reference, &generator.enabled_services)?,
    };

    let app_name = match args.app_name {
        Some(name) => {
            validate_name(&name).map_err(|e| anyhow::anyhow!("Invalid app name: {}", e))?;
            name
        }
        None => Input::new()
            .with_prompt("Application name")
            .default(names::generate())
            .validate_with(validate_name)
            .interact_text()?,
    };

    let base = Configuration::new()
        .with("serviceType", service.id())
        .with("appName", app_name.as_str());
    let config = match service {
        ServiceType::VirtualMachine => prompt_virtual_machine(reference, base)?,
        ServiceType::ServerlessFunction => prompt_serverless_function(reference, base)?,
        ServiceType::ContainerService => prompt_container_service(reference, base)?,
    };

    let format = args.format.unwrap_or(generator.output_format);
    let template = generator
        .processor()
        .with_format(format)
        .generate(&config)
        .context("Collected configuration was rejected")?;

    let output_path = args.out_dir.join(template.filename());
    if !confirm_overwrite(&output_path, args.force)? {
        println!("Aborted.");
        return Ok(());
    }

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;
    fs::write(&output_path, &template.text)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    if args.save_config {
        let config_path = args.out_dir.join(format!("{}-{}.json", app_name, service.id()));
        if confirm_overwrite(&config_path, args.force)? {
            let json = serde_json::to_string_pretty(&config)?;
            fs::write(&config_path, json)
                .with_context(|| format!("Failed to write {}", config_path.display()))?;
            println!("Saved configuration to {}", config_path.display());
        }
    }

    println!();
    println!("Created {}", output_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Deploy:");
    println!("     aws cloudformation deploy \\");
    println!("       --template-file {} \\", output_path.display());
    println!("       --stack-name {} \\", app_name);
    println!("       --capabilities CAPABILITY_IAM");
    println!();

    Ok(())
}

fn select_service(reference: &ReferenceData, enabled: &[ServiceType]) -> Result<ServiceType> {
    let services: Vec<_> = reference
        .services()
        .iter()
        .filter(|info| enabled.contains(&info.id))
        .collect();
    if services.is_empty() {
        bail!("No service types are enabled in the configuration");
    }

    let items: Vec<String> = services
        .iter()
        .map(|info| format!("{:<7} - {}", info.name, info.description))
        .collect();
    let selection = Select::new()
        .with_prompt("Service")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(services[selection].id)
}

fn prompt_virtual_machine(
    reference: &ReferenceData,
    config: Configuration,
) -> Result<Configuration> {
    let region = select_region(reference)?;

    let catalog = reference.instance_types();
    let categories: Vec<&str> = catalog.categories().collect();
    let category = Select::new()
        .with_prompt("Instance family")
        .items(&categories)
        .default(0)
        .interact()?;
    let types = catalog.category(categories[category]).unwrap_or_default();
    let instance_type = Select::new()
        .with_prompt("Instance type")
        .items(types)
        .default(default_index(types, DEFAULT_INSTANCE_TYPE))
        .interact()?;

    let volume_size: u64 = Input::new()
        .with_prompt("Root volume size (GiB)")
        .default(virtual_machine::DEFAULT_VOLUME_SIZE)
        .validate_with(|size: &u64| -> Result<(), String> {
            if (1..=16384).contains(size) {
                Ok(())
            } else {
                Err("Volume size must be between 1 and 16384 GiB".to_string())
            }
        })
        .interact_text()?;

    Ok(config
        .with("region", region)
        .with("instanceType", types[instance_type])
        .with("volumeSize", volume_size))
}

fn prompt_serverless_function(
    reference: &ReferenceData,
    config: Configuration,
) -> Result<Configuration> {
    let runtimes = reference.lambda_runtimes();
    let runtime = Select::new()
        .with_prompt("Runtime")
        .items(runtimes)
        .default(0)
        .interact()?;

    let memory: u64 = Input::new()
        .with_prompt("Memory (MB)")
        .default(serverless_function::DEFAULT_MEMORY)
        .validate_with(|mb: &u64| -> Result<(), String> {
            if (128..=10240).contains(mb) {
                Ok(())
            } else {
                Err("Memory must be between 128 and 10240 MB".to_string())
            }
        })
        .interact_text()?;

    let timeout: u64 = Input::new()
        .with_prompt("Timeout (seconds)")
        .default(serverless_function::DEFAULT_TIMEOUT)
        .validate_with(|secs: &u64| -> Result<(), String> {
            if (1..=900).contains(secs) {
                Ok(())
            } else {
                Err("Timeout must be between 1 and 900 seconds".to_string())
            }
        })
        .interact_text()?;

    Ok(config
        .with("runtime", runtimes[runtime])
        .with("memory", memory)
        .with("timeout", timeout))
}

fn prompt_container_service(
    reference: &ReferenceData,
    config: Configuration,
) -> Result<Configuration> {
    let launch_types = reference.ecs_launch_types();
    let launch_type = Select::new()
        .with_prompt("Launch type")
        .items(launch_types)
        .default(0)
        .interact()?;

    let cpu: String = Input::new()
        .with_prompt("Task CPU units")
        .default(container_service::DEFAULT_CPU.to_string())
        .interact_text()?;
    let memory: String = Input::new()
        .with_prompt("Task memory (MiB)")
        .default(container_service::DEFAULT_MEMORY.to_string())
        .interact_text()?;
    let image: String = Input::new()
        .with_prompt("Container image")
        .default(container_service::DEFAULT_CONTAINER_IMAGE.to_string())
        .interact_text()?;

    Ok(config
        .with("launchType", launch_types[launch_type])
        .with("cpu", cpu)
        .with("memory", memory)
        .with("containerImage", image))
}

/// Region picker shared with the project wizard
pub(super) fn select_region(reference: &ReferenceData) -> Result<&'static str> {
    let regions = reference.regions();
    let items = region_items(reference);
    let values: Vec<&str> = regions.iter().map(|region| region.value).collect();
    let selection = Select::new()
        .with_prompt("Region")
        .items(&items)
        .default(default_index(&values, DEFAULT_REGION))
        .interact()?;
    Ok(regions[selection].value)
}

fn region_items(reference: &ReferenceData) -> Vec<String> {
    reference
        .regions()
        .iter()
        .map(|region| format!("{:<15} {}", region.value, region.label))
        .collect()
}

fn default_index(values: &[&str], default: &str) -> usize {
    values.iter().position(|v| *v == default).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_items() {
        let items = region_items(ReferenceData::builtin());
        assert_eq!(items.len(), 18);
        assert!(items[0].starts_with("us-east-1"));
        assert!(items[0].ends_with("US East (N. Virginia)"));
    }

    #[test]
    fn test_default_index() {
        let types = ReferenceData::builtin()
            .instance_types()
            .category("General Purpose")
            .unwrap();
        assert_eq!(default_index(types, "t2.micro"), 0);
        assert_eq!(default_index(types, "t3.small"), 5);
        assert_eq!(default_index(types, "z1d.large"), 0);
    }
}
