//! Static reference tables offered to the wizard
//!
//! Regions, instance types, runtimes, launch types and the service catalog.
//! All tables are read-only and live for the whole process.

use crate::service::ServiceType;
use once_cell::sync::Lazy;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub id: ServiceType,
    pub name: &'static str,
    pub description: &'static str,
    pub config_options: &'static [&'static str],
}

/// Instance types grouped by category, in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceTypeCatalog(&'static [(&'static str, &'static [&'static str])]);

impl InstanceTypeCatalog {
    pub fn categories(&self) -> impl Iterator<Item = &'static str> {
        self.0.iter().map(|(category, _)| *category)
    }

    pub fn category(&self, name: &str) -> Option<&'static [&'static str]> {
        self.0
            .iter()
            .find(|(category, _)| *category == name)
            .map(|(_, types)| *types)
    }

    pub fn contains(&self, instance_type: &str) -> bool {
        self.0
            .iter()
            .any(|(_, types)| types.contains(&instance_type))
    }
}

impl Serialize for InstanceTypeCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, types) in self.0 {
            map.serialize_entry(category, types)?;
        }
        map.end()
    }
}

const REGIONS: &[Region] = &[
    Region {
        value: "us-east-1",
        label: "US East (N. Virginia)",
    },
    Region {
        value: "us-east-2",
        label: "US East (Ohio)",
    },
    Region {
        value: "us-west-1",
        label: "US West (N. California)",
    },
    Region {
        value: "us-west-2",
        label: "US West (Oregon)",
    },
    Region {
        value: "af-south-1",
        label: "Africa (Cape Town)",
    },
    Region {
        value: "ap-east-1",
        label: "Asia Pacific (Hong Kong)",
    },
    Region {
        value: "ap-south-1",
        label: "Asia Pacific (Mumbai)",
    },
    Region {
        value: "ap-northeast-1",
        label: "Asia Pacific (Tokyo)",
    },
    Region {
        value: "ap-northeast-2",
        label: "Asia Pacific (Seoul)",
    },
    Region {
        value: "ap-southeast-1",
        label: "Asia Pacific (Singapore)",
    },
    Region {
        value: "ap-southeast-2",
        label: "Asia Pacific (Sydney)",
    },
    Region {
        value: "ca-central-1",
        label: "Canada (Central)",
    },
    Region {
        value: "eu-central-1",
        label: "Europe (Frankfurt)",
    },
    Region {
        value: "eu-west-1",
        label: "Europe (Ireland)",
    },
    Region {
        value: "eu-west-2",
        label: "Europe (London)",
    },
    Region {
        value: "eu-west-3",
        label: "Europe (Paris)",
    },
    Region {
        value: "eu-north-1",
        label: "Europe (Stockholm)",
    },
    Region {
        value: "sa-east-1",
        label: "South America (São Paulo)",
    },
];

const INSTANCE_TYPES: &[(&str, &[&str])] = &[
    (
        "General Purpose",
        &[
            "t2.micro",
            "t2.small",
            "t2.medium",
            "t2.large",
            "t3.micro",
            "t3.small",
            "t3.medium",
            "t3.large",
            "m5.large",
            "m5.xlarge",
            "m5.2xlarge",
        ],
    ),
    (
        "Compute Optimized",
        &[
            "c5.large",
            "c5.xlarge",
            "c5.2xlarge",
            "c6g.large",
            "c6g.xlarge",
            "c6g.2xlarge",
        ],
    ),
    (
        "Memory Optimized",
        &[
            "r5.large",
            "r5.xlarge",
            "r5.2xlarge",
            "r6g.large",
            "r6g.xlarge",
            "r6g.2xlarge",
        ],
    ),
];

const LAMBDA_RUNTIMES: &[&str] = &[
    "nodejs18.x",
    "nodejs16.x",
    "python3.9",
    "python3.8",
    "java11",
    "java8",
    "dotnet6",
    "go1.x",
    "ruby2.7",
];

const ECS_LAUNCH_TYPES: &[&str] = &["FARGATE", "EC2"];

const SERVICES: &[ServiceInfo] = &[
    ServiceInfo {
        id: ServiceType::VirtualMachine,
        name: "EC2",
        description: "Virtual servers in the cloud",
        config_options: &["instance-type", "region", "volume-size"],
    },
    ServiceInfo {
        id: ServiceType::ServerlessFunction,
        name: "Lambda",
        description: "Run code without thinking about servers",
        config_options: &["runtime", "memory", "timeout"],
    },
    ServiceInfo {
        id: ServiceType::ContainerService,
        name: "ECS",
        description: "Run containerized applications",
        config_options: &["launch-type", "container-config", "task-size"],
    },
];

static BUILTIN: Lazy<ReferenceData> = Lazy::new(|| ReferenceData {
    regions: REGIONS,
    instance_types: InstanceTypeCatalog(INSTANCE_TYPES),
    lambda_runtimes: LAMBDA_RUNTIMES,
    ecs_launch_types: ECS_LAUNCH_TYPES,
    services: SERVICES,
});

/// Handle to the process-wide reference tables
#[derive(Debug, Clone, Copy)]
pub struct ReferenceData {
    regions: &'static [Region],
    instance_types: InstanceTypeCatalog,
    lambda_runtimes: &'static [&'static str],
    ecs_launch_types: &'static [&'static str],
    services: &'static [ServiceInfo],
}

/// Body of `GET /config-options`
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOptions {
    pub regions: &'static [Region],
    pub instance_types: InstanceTypeCatalog,
    pub lambda_runtimes: &'static [&'static str],
    pub ecs_launch_types: &'static [&'static str],
}

impl ReferenceData {
    pub fn builtin() -> &'static ReferenceData {
        &BUILTIN
    }

    pub fn regions(&self) -> &'static [Region] {
        self.regions
    }

    pub fn region(&self, value: &str) -> Option<&'static Region> {
        self.regions.iter().find(|region| region.value == value)
    }

    pub fn instance_types(&self) -> InstanceTypeCatalog {
        self.instance_types
    }

    pub fn lambda_runtimes(&self) -> &'static [&'static str] {
        self.lambda_runtimes
    }

    pub fn ecs_launch_types(&self) -> &'static [&'static str] {
        self.ecs_launch_types
    }

    /// Full service catalog
    pub fn services(&self) -> &'static [ServiceInfo] {
        self.services
    }

    pub fn service(&self, service: ServiceType) -> Option<&'static ServiceInfo> {
        self.services.iter().find(|info| info.id == service)
    }

    pub fn config_options(&self) -> ConfigOptions {
        ConfigOptions {
            regions: self.regions,
            instance_types: self.instance_types,
            lambda_runtimes: self.lambda_runtimes,
            ecs_launch_types: self.ecs_launch_types,
        }
    }
}
