//! Service type discriminator
//!
//! The `serviceType` field of a Configuration selects both the validation
//! rules and the template generator. Canonical identifiers are the ones the
//! service catalog publishes (`ec2`, `lambda`, `ecs`); the descriptive names
//! are accepted as aliases.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "ec2", alias = "virtual-machine")]
    VirtualMachine,
    #[serde(rename = "lambda", alias = "serverless-function")]
    ServerlessFunction,
    #[serde(rename = "ecs", alias = "container-service")]
    ContainerService,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [
        ServiceType::VirtualMachine,
        ServiceType::ServerlessFunction,
        ServiceType::ContainerService,
    ];

    /// Canonical wire identifier
    pub fn id(&self) -> &'static str {
        match self {
            ServiceType::VirtualMachine => "ec2",
            ServiceType::ServerlessFunction => "lambda",
            ServiceType::ContainerService => "ecs",
        }
    }

    /// Descriptive alias accepted alongside the canonical id
    pub fn alias(&self) -> &'static str {
        match self {
            ServiceType::VirtualMachine => "virtual-machine",
            ServiceType::ServerlessFunction => "serverless-function",
            ServiceType::ContainerService => "container-service",
        }
    }

    /// Fields that must be present, beyond `serviceType` and `appName`
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            ServiceType::VirtualMachine => &["instanceType", "region"],
            ServiceType::ServerlessFunction => &["runtime"],
            ServiceType::ContainerService => &["launchType"],
        }
    }

    pub(crate) fn missing_fields_message(&self) -> &'static str {
        match self {
            ServiceType::VirtualMachine => "EC2 requires instanceType and region",
            ServiceType::ServerlessFunction => "Lambda requires runtime",
            ServiceType::ContainerService => "ECS requires launchType",
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for ServiceType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceType::ALL
            .into_iter()
            .find(|service| service.id() == s || service.alias() == s)
            .ok_or_else(|| ConfigError::InvalidServiceType {
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_type_from_str() {
        assert_eq!(
            "ec2".parse::<ServiceType>().unwrap(),
            ServiceType::VirtualMachine
        );
        assert_eq!(
            "virtual-machine".parse::<ServiceType>().unwrap(),
            ServiceType::VirtualMachine
        );
        assert_eq!(
            "lambda".parse::<ServiceType>().unwrap(),
            ServiceType::ServerlessFunction
        );
        assert_eq!(
            "serverless-function".parse::<ServiceType>().unwrap(),
            ServiceType::ServerlessFunction
        );
        assert_eq!(
            "ecs".parse::<ServiceType>().unwrap(),
            ServiceType::ContainerService
        );
        assert_eq!(
            "container-service".parse::<ServiceType>().unwrap(),
            ServiceType::ContainerService
        );
    }

    #[test]
    fn test_unknown_service_type_is_invalid() {
        let err = "EC2".parse::<ServiceType>().unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidServiceType {
                value: "EC2".into()
            }
        );
        assert!("".parse::<ServiceType>().is_err());
    }

    #[test]
    fn test_serde_uses_canonical_ids() {
        let json = serde_json::to_string(&ServiceType::ServerlessFunction).unwrap();
        assert_eq!(json, "\"lambda\"");

        let parsed: ServiceType = serde_json::from_str("\"container-service\"").unwrap();
        assert_eq!(parsed, ServiceType::ContainerService);
    }
}
