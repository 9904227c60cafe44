//! Project Profile collected by the project wizard

use crate::configuration::is_set;
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_VPC_CIDR: &str = "10.0.0.0/16";
pub const DEFAULT_EC2_INSTANCE_TYPE: &str = "t2.micro";

/// Environments the wizard offers
pub const ENVIRONMENTS: &[&str] = &["development", "staging", "production"];

/// Availability zones the networking step asks for, within `1..=3`
pub const DEFAULT_AVAILABILITY_ZONES: u64 = 2;
pub const MAX_AVAILABILITY_ZONES: u64 = 3;

/// One wizard page of `use*` service flags
#[derive(Debug, Clone, Copy)]
pub struct ServiceStep {
    pub title: &'static str,
    /// `(key, label)` pairs in display order
    pub flags: &'static [(&'static str, &'static str)],
}

pub const SERVICE_STEPS: &[ServiceStep] = &[
    ServiceStep {
        title: "Compute Services",
        flags: &[
            ("useEC2", "EC2 Instances"),
            ("useECS", "Container Services (ECS)"),
            ("useEKS", "Kubernetes (EKS)"),
            ("useLambda", "Serverless Functions"),
            ("useAutoScaling", "Auto Scaling"),
        ],
    },
    ServiceStep {
        title: "Load Balancing & DNS",
        flags: &[
            ("useALB", "Application Load Balancer"),
            ("useNLB", "Network Load Balancer"),
            ("useRoute53", "Route 53 DNS"),
            ("useCloudFront", "CloudFront CDN"),
            ("useACM", "Certificate Manager (ACM)"),
        ],
    },
    ServiceStep {
        title: "Storage Services",
        flags: &[
            ("useS3", "S3 Buckets"),
            ("useRDS", "RDS Database"),
            ("useDynamoDB", "DynamoDB"),
            ("useElastiCache", "ElastiCache"),
            ("useEFS", "Elastic File System"),
        ],
    },
    ServiceStep {
        title: "Security & Monitoring",
        flags: &[
            ("useWAF", "Web Application Firewall"),
            ("useGuardDuty", "GuardDuty"),
            ("useCloudTrail", "CloudTrail"),
            ("useCloudWatch", "CloudWatch"),
            ("useKMS", "KMS Encryption"),
        ],
    },
    ServiceStep {
        title: "Additional Services",
        flags: &[
            ("useSQS", "Simple Queue Service (SQS)"),
            ("useSNS", "Simple Notification Service (SNS)"),
            ("useCognito", "Cognito User Pools"),
            ("useSecretsManager", "Secrets Manager"),
            ("useCodePipeline", "CodePipeline (CI/CD)"),
        ],
    },
];

/// Every service flag across all steps, in wizard order
pub fn service_flags() -> impl Iterator<Item = (&'static str, &'static str)> {
    SERVICE_STEPS.iter().flat_map(|step| step.flags.iter().copied())
}

/// Project-wide settings plus boolean `use*` service flags.
///
/// Unknown keys are kept in `extra`; any `use`-prefixed key holding a truthy
/// value counts as an enabled component. The networking answers
/// (`availabilityZones`, `privateSubnets`, `publicSubnets`, `natGateways`)
/// also live in `extra`, since form inputs submit them as strings or bools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProfile {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub aws_account_id: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub vpc_cidr: String,
    #[serde(default)]
    pub ec2_instance_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectProfile {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            ..Default::default()
        }
    }

    /// Builder-style flag setter
    pub fn with_flag(mut self, flag: impl Into<String>, enabled: bool) -> Self {
        self.extra.insert(flag.into(), Value::Bool(enabled));
        self
    }

    /// Builder-style setter for any other profile key kept in `extra`
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.project_name.trim().is_empty() {
            return Err(ConfigError::missing(
                &["projectName"],
                "Missing required field: projectName",
            ));
        }
        Ok(())
    }

    pub fn environment(&self) -> &str {
        or_default(&self.environment, DEFAULT_ENVIRONMENT)
    }

    pub fn region(&self) -> &str {
        or_default(&self.region, DEFAULT_REGION)
    }

    pub fn vpc_cidr(&self) -> &str {
        or_default(&self.vpc_cidr, DEFAULT_VPC_CIDR)
    }

    pub fn ec2_instance_type(&self) -> &str {
        or_default(&self.ec2_instance_type, DEFAULT_EC2_INSTANCE_TYPE)
    }

    /// `availabilityZones` as a number or numeric string, clamped to `1..=3`
    pub fn availability_zones(&self) -> u64 {
        let zones = match self.extra.get("availabilityZones") {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        zones
            .filter(|zones| *zones > 0)
            .unwrap_or(DEFAULT_AVAILABILITY_ZONES)
            .min(MAX_AVAILABILITY_ZONES)
    }

    pub fn uses(&self, flag: &str) -> bool {
        self.extra.get(flag).is_some_and(is_set)
    }

    /// Enabled components, `useS3` -> `S3`, in submission order
    pub fn components(&self) -> Vec<&str> {
        self.extra
            .iter()
            .filter(|(_, value)| is_set(value))
            .filter_map(|(key, _)| key.strip_prefix("use"))
            .filter(|name| !name.is_empty())
            .collect()
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}
