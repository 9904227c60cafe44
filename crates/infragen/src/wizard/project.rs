//! Project wizard: collect a Project Profile and write the artifact bundle

use anyhow::{anyhow, Context, Result};
use clap::Args;
use dialoguer::{Confirm, Input, MultiSelect, Select};
use infragen_config::GeneratorConfig;
use infragen_core::artifacts::{
    service_flags, DEFAULT_AVAILABILITY_ZONES, DEFAULT_EC2_INSTANCE_TYPE, DEFAULT_VPC_CIDR,
    ENVIRONMENTS, MAX_AVAILABILITY_ZONES, SERVICE_STEPS,
};
use infragen_core::{ArtifactRenderer, ProjectProfile, ReferenceData};
use std::net::Ipv4Addr;
use std::path::PathBuf;

use super::{confirm_overwrite, names, service::select_region, validate_name, write_bundle};

#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Project name used for resource names and tags
    #[arg(long)]
    pub project_name: Option<String>,

    /// Organization name (prompted when omitted)
    #[arg(long)]
    pub organization: Option<String>,

    /// 12-digit AWS account ID (prompted when omitted)
    #[arg(long, value_name = "ID")]
    pub aws_account_id: Option<String>,

    /// AWS region (prompted when omitted)
    #[arg(long)]
    pub region: Option<String>,

    /// Output directory (default: ./<project>-infra)
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Overwrite existing files without asking
    #[arg(long)]
    pub force: bool,
}

/// Everything the wizard asks, before it becomes a profile
#[derive(Debug, Default)]
struct Answers {
    project_name: String,
    environment: String,
    organization: String,
    aws_account_id: String,
    region: String,
    vpc_cidr: String,
    availability_zones: u64,
    private_subnets: bool,
    public_subnets: bool,
    nat_gateways: bool,
    /// Enabled `use*` keys
    services: Vec<&'static str>,
}

impl Answers {
    /// Every known flag is written, enabled or not, in wizard order
    fn into_profile(self) -> ProjectProfile {
        let mut profile = ProjectProfile::new(self.project_name);
        profile.environment = self.environment;
        profile.organization = self.organization;
        profile.aws_account_id = self.aws_account_id;
        profile.region = self.region;
        profile.vpc_cidr = self.vpc_cidr;

        let profile = profile
            .with_field("availabilityZones", self.availability_zones)
            .with_field("privateSubnets", self.private_subnets)
            .with_field("publicSubnets", self.public_subnets)
            .with_field("natGateways", self.nat_gateways);

        service_flags().fold(profile, |profile, (flag, _)| {
            profile.with_flag(flag, self.services.contains(&flag))
        })
    }
}

pub fn run(args: ProjectArgs, generator: &GeneratorConfig) -> Result<()> {
    println!();
    println!("infragen wizard - project artifacts");
    println!();

    let reference = ReferenceData::builtin();

    println!("Project Basics");
    let project_name = match args.project_name {
        Some(name) => {
            validate_name(&name).map_err(|e| anyhow!("Invalid project name: {}", e))?;
            name
        }
        None => Input::new()
            .with_prompt("Project name")
            .default(names::generate())
            .validate_with(validate_name)
            .interact_text()?,
    };

    let environment = Select::new()
        .with_prompt("Environment")
        .items(ENVIRONMENTS)
        .default(0)
        .interact()?;

    let organization = match args.organization {
        Some(organization) => {
            validate_required(&organization)
                .map_err(|e| anyhow!("Invalid organization: {}", e))?;
            organization
        }
        None => Input::new()
            .with_prompt("Organization name")
            .validate_with(validate_required)
            .interact_text()?,
    };

    let aws_account_id = match args.aws_account_id {
        Some(id) => {
            validate_account_id(&id).map_err(|e| anyhow!("Invalid AWS account ID: {}", e))?;
            id
        }
        None => Input::new()
            .with_prompt("AWS account ID")
            .validate_with(validate_account_id)
            .interact_text()?,
    };

    let region = match args.region {
        Some(region) => {
            if reference.region(&region).is_none() {
                return Err(anyhow!("Unknown region '{}'", region));
            }
            region
        }
        None => select_region(reference)?.to_string(),
    };

    println!();
    println!("Networking Configuration");
    let vpc_cidr: String = Input::new()
        .with_prompt("VPC CIDR block")
        .default(DEFAULT_VPC_CIDR.to_string())
        .validate_with(validate_cidr)
        .interact_text()?;

    let availability_zones: u64 = Input::new()
        .with_prompt("Number of availability zones")
        .default(DEFAULT_AVAILABILITY_ZONES)
        .validate_with(|zones: &u64| -> Result<(), String> {
            if (1..=MAX_AVAILABILITY_ZONES).contains(zones) {
                Ok(())
            } else {
                Err(format!("Choose between 1 and {}", MAX_AVAILABILITY_ZONES))
            }
        })
        .interact_text()?;

    let private_subnets = Confirm::new()
        .with_prompt("Include private subnets?")
        .default(true)
        .interact()?;
    let public_subnets = Confirm::new()
        .with_prompt("Include public subnets?")
        .default(true)
        .interact()?;
    let nat_gateways = Confirm::new()
        .with_prompt("Include NAT gateways?")
        .default(false)
        .interact()?;

    let mut services = Vec::new();
    for step in SERVICE_STEPS {
        println!();
        let labels: Vec<&str> = step.flags.iter().map(|(_, label)| *label).collect();
        let selected = MultiSelect::new()
            .with_prompt(format!("{} (space to toggle, enter to confirm)", step.title))
            .items(&labels)
            .interact()?;
        services.extend(selected.into_iter().map(|index| step.flags[index].0));
    }

    let mut profile = Answers {
        project_name: project_name.clone(),
        environment: ENVIRONMENTS[environment].to_string(),
        organization,
        aws_account_id,
        region,
        vpc_cidr,
        availability_zones,
        private_subnets,
        public_subnets,
        nat_gateways,
        services,
    }
    .into_profile();

    if profile.uses("useEC2") {
        let catalog = reference.instance_types();
        profile.ec2_instance_type = Input::new()
            .with_prompt("EC2 instance type")
            .default(DEFAULT_EC2_INSTANCE_TYPE.to_string())
            .validate_with(|input: &String| -> Result<(), String> {
                if catalog.contains(input) {
                    Ok(())
                } else {
                    Err(format!("Unknown instance type '{}'", input))
                }
            })
            .interact_text()?;
    }

    let renderer = ArtifactRenderer::with_images(generator.image_table())
        .context("Failed to load artifact templates")?;
    let bundle = renderer.bundle(&profile)?;

    let out_dir = args
        .out_dir
        .unwrap_or_else(|| PathBuf::from(format!("{}-infra", project_name)));
    if !confirm_overwrite(&out_dir, args.force)? {
        println!("Aborted.");
        return Ok(());
    }

    let written = write_bundle(&out_dir, &bundle)?;

    println!();
    println!("Created {} files in {}:", written.len(), out_dir.display());
    for name in bundle.names() {
        println!("  {}", name);
    }
    println!();
    println!("Next steps:");
    println!(
        "  1. Review {}",
        out_dir.join("deployment-instructions.md").display()
    );
    println!(
        "  2. cd {} && terraform init && terraform plan",
        out_dir.display()
    );
    println!();

    Ok(())
}

#[allow(clippy::ptr_arg)]
fn validate_required(input: &String) -> Result<(), String> {
    if input.trim().is_empty() {
        return Err("This field is required".to_string());
    }
    Ok(())
}

#[allow(clippy::ptr_arg)]
fn validate_account_id(input: &String) -> Result<(), String> {
    if input.len() != 12 || !input.chars().all(|c| c.is_ascii_digit()) {
        return Err("AWS account IDs are exactly 12 digits".to_string());
    }
    Ok(())
}

/// VPC blocks must be IPv4 with a /16 to /28 prefix
#[allow(clippy::ptr_arg)]
fn validate_cidr(input: &String) -> Result<(), String> {
    let (addr, prefix) = input
        .split_once('/')
        .ok_or_else(|| "CIDR must look like 10.0.0.0/16".to_string())?;
    addr.parse::<Ipv4Addr>()
        .map_err(|_| format!("'{}' is not an IPv4 address", addr))?;
    let prefix: u8 = prefix
        .parse()
        .map_err(|_| format!("'{}' is not a prefix length", prefix))?;
    if !(16..=28).contains(&prefix) {
        return Err("VPC prefix length must be between /16 and /28".to_string());
    }
    Ok(())
}
