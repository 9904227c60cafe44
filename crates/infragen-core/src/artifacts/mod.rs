//! Project artifact rendering
//!
//! Turns a `ProjectProfile` into downloadable text files: a Terraform script
//! set, IAM roles and policies, an AWS CLI script and deployment
//! instructions. Templates are embedded at compile time and rendered with
//! Tera.

mod profile;

pub use profile::{
    service_flags, ProjectProfile, ServiceStep, DEFAULT_AVAILABILITY_ZONES,
    DEFAULT_EC2_INSTANCE_TYPE, DEFAULT_ENVIRONMENT, DEFAULT_REGION, DEFAULT_VPC_CIDR,
    ENVIRONMENTS, MAX_AVAILABILITY_ZONES, SERVICE_STEPS,
};

use crate::error::{ConfigError, Result};
use crate::images::MachineImageTable;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tera::{Context, Tera};
use tracing::debug;

pub const CLI_COMMANDS_FILE: &str = "aws-cli-commands.sh";
pub const INSTRUCTIONS_FILE: &str = "deployment-instructions.md";

/// (output file name, template source)
const TERRAFORM_TEMPLATES: &[(&str, &str)] = &[
    ("main.tf", include_str!("templates/main.tf.tera")),
    ("variables.tf", include_str!("templates/variables.tf.tera")),
    ("outputs.tf", include_str!("templates/outputs.tf.tera")),
    ("README.md", include_str!("templates/README.md.tera")),
];

const IAM_TEMPLATES: &[(&str, &str)] = &[
    ("iam/service-roles.tf", include_str!("templates/iam/service-roles.tf.tera")),
    ("iam/policies.tf", include_str!("templates/iam/policies.tf.tera")),
    ("iam/README.md", include_str!("templates/iam/README.md.tera")),
];

const SCRIPT_TEMPLATES: &[(&str, &str)] = &[
    (CLI_COMMANDS_FILE, include_str!("templates/aws-cli-commands.sh.tera")),
    (INSTRUCTIONS_FILE, include_str!("templates/deployment-instructions.md.tera")),
];

/// Ordered set of generated files, file name to content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactBundle {
    files: Vec<(String, String)>,
}

impl ArtifactBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, replacing any earlier file with the same name
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        let name = name.into();
        let content = content.into();
        match self.files.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = content,
            None => self.files.push((name, content)),
        }
    }

    pub fn extend(&mut self, other: ArtifactBundle) {
        for (name, content) in other.files {
            self.insert(name, content);
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, content)| content.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files
            .iter()
            .map(|(name, content)| (name.as_str(), content.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Serialize for ArtifactBundle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.files.len()))?;
        for (name, content) in &self.files {
            map.serialize_entry(name, content)?;
        }
        map.end()
    }
}

/// Values every artifact template may use
#[derive(Debug, Serialize)]
struct ProfileContext<'a> {
    project_name: &'a str,
    environment: &'a str,
    organization: &'a str,
    aws_account_id: &'a str,
    region: &'a str,
    vpc_cidr: &'a str,
    availability_zones: u64,
    private_subnets: bool,
    public_subnets: bool,
    nat_gateways: bool,
    ec2_instance_type: &'a str,
    image_id: &'a str,
    components: Vec<&'a str>,
    use_ec2: bool,
    use_s3: bool,
    use_rds: bool,
    use_cloudwatch: bool,
}

/// Template registry for project artifacts
pub struct ArtifactRenderer {
    tera: Tera,
    images: MachineImageTable,
}

impl ArtifactRenderer {
    /// Create a renderer with the embedded templates registered
    pub fn new() -> Result<Self> {
        Self::with_images(MachineImageTable::default())
    }

    pub fn with_images(images: MachineImageTable) -> Result<Self> {
        let mut tera = Tera::default();
        let all = TERRAFORM_TEMPLATES
            .iter()
            .chain(IAM_TEMPLATES)
            .chain(SCRIPT_TEMPLATES);
        for (name, source) in all {
            tera.add_raw_template(name, source)
                .map_err(|e| render_error(name, e))?;
        }

        Ok(Self { tera, images })
    }

    /// `main.tf`, `variables.tf`, `outputs.tf` and `README.md`
    pub fn terraform_scripts(&self, profile: &ProjectProfile) -> Result<ArtifactBundle> {
        self.render_set(TERRAFORM_TEMPLATES, profile)
    }

    /// EC2 service role plus S3/RDS/CloudWatch policies for the enabled flags
    pub fn iam_policies(&self, profile: &ProjectProfile) -> Result<ArtifactBundle> {
        self.render_set(IAM_TEMPLATES, profile)
    }

    pub fn cli_commands(&self, profile: &ProjectProfile) -> Result<String> {
        self.render(CLI_COMMANDS_FILE, profile)
    }

    pub fn deployment_instructions(&self, profile: &ProjectProfile) -> Result<String> {
        self.render(INSTRUCTIONS_FILE, profile)
    }

    /// Every artifact for `profile` in one bundle
    pub fn bundle(&self, profile: &ProjectProfile) -> Result<ArtifactBundle> {
        let mut bundle = self.terraform_scripts(profile)?;
        bundle.extend(self.iam_policies(profile)?);
        bundle.extend(self.render_set(SCRIPT_TEMPLATES, profile)?);

        debug!(
            project = %profile.project_name,
            files = bundle.len(),
            "Rendered project artifact bundle"
        );
        Ok(bundle)
    }

    fn render_set(
        &self,
        templates: &[(&str, &str)],
        profile: &ProjectProfile,
    ) -> Result<ArtifactBundle> {
        let mut bundle = ArtifactBundle::new();
        for (name, _) in templates {
            bundle.insert(*name, self.render(name, profile)?);
        }
        Ok(bundle)
    }

    fn render(&self, name: &str, profile: &ProjectProfile) -> Result<String> {
        profile.validate()?;
        let context = self.context(profile).map_err(|e| render_error(name, e))?;
        self.tera
            .render(name, &context)
            .map_err(|e| render_error(name, e))
    }

    fn context(&self, profile: &ProjectProfile) -> tera::Result<Context> {
        let region = profile.region();
        Context::from_serialize(ProfileContext {
            project_name: &profile.project_name,
            environment: profile.environment(),
            organization: &profile.organization,
            aws_account_id: &profile.aws_account_id,
            region,
            vpc_cidr: profile.vpc_cidr(),
            availability_zones: profile.availability_zones(),
            private_subnets: profile.uses("privateSubnets"),
            public_subnets: profile.uses("publicSubnets"),
            nat_gateways: profile.uses("natGateways"),
            ec2_instance_type: profile.ec2_instance_type(),
            image_id: self.images.resolve(region),
            components: profile.components(),
            use_ec2: profile.uses("useEC2"),
            use_s3: profile.uses("useS3"),
            use_rds: profile.uses("useRDS"),
            use_cloudwatch: profile.uses("useCloudWatch"),
        })
    }
}

impl std::fmt::Debug for ArtifactRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactRenderer")
            .field("images", &self.images.version())
            .finish_non_exhaustive()
    }
}

fn render_error(template: &str, err: tera::Error) -> ConfigError {
    use std::error::Error;

    // Tera keeps the useful detail in the source chain
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    ConfigError::Render {
        template: template.to_string(),
        message,
    }
}
