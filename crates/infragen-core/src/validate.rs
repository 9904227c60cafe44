// Configuration validation
//
// Field-presence checks keyed by the service type. Generators rely on this
// having run first and never re-check their required fields.

use crate::configuration::Configuration;
use crate::error::{ConfigError, Result};
use crate::service::ServiceType;
use serde_json::Value;

/// Validate a Configuration and return the service type it selects
pub fn validate(config: &Configuration) -> Result<ServiceType> {
    let (Some(service_type), Some(_)) = (config.service_type(), config.app_name()) else {
        return Err(ConfigError::missing(
            &["serviceType", "appName"],
            "Missing required fields: serviceType and appName",
        ));
    };

    let service = match service_type {
        Value::String(id) => id.parse::<ServiceType>()?,
        other => {
            return Err(ConfigError::InvalidServiceType {
                value: other.to_string(),
            })
        }
    };

    let required = service.required_fields();
    if required.iter().any(|field| !config.is_present(field)) {
        return Err(ConfigError::missing(
            required,
            service.missing_fields_message(),
        ));
    }

    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(service_type: &str, app_name: &str) -> Configuration {
        Configuration::new()
            .with("serviceType", service_type)
            .with("appName", app_name)
    }

    #[test]
    fn test_missing_service_type_or_app_name() {
        let err = validate(&Configuration::new().with("appName", "x")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequiredField { .. }));
        assert_eq!(err.to_string(), "Missing required fields: serviceType and appName");

        let err = validate(&Configuration::new().with("serviceType", "ec2")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequiredField { .. }));

        let err = validate(&config("lambda", "")).unwrap_err();
        assert_eq!(err.missing_fields(), &["serviceType", "appName"]);
    }

    #[test]
    fn test_virtual_machine_requires_instance_type_and_region() {
        let err = validate(&config("ec2", "y")).unwrap_err();
        assert_eq!(err.missing_fields(), &["instanceType", "region"]);
        assert_eq!(err.to_string(), "EC2 requires instanceType and region");

        let only_region = config("virtual-machine", "y").with("region", "us-east-1");
        let err = validate(&only_region).unwrap_err();
        assert_eq!(err.missing_fields(), &["instanceType", "region"]);

        let only_type = config("ec2", "y").with("instanceType", "t2.micro");
        assert!(validate(&only_type).is_err());

        let complete = only_type.with("region", "eu-west-1");
        assert_eq!(validate(&complete).unwrap(), ServiceType::VirtualMachine);
    }

    #[test]
    fn test_serverless_function_requires_runtime() {
        let err = validate(&config("lambda", "fn1")).unwrap_err();
        assert_eq!(err.missing_fields(), &["runtime"]);
        assert_eq!(err.to_string(), "Lambda requires runtime");

        let ok = config("serverless-function", "fn1").with("runtime", "python3.9");
        assert_eq!(validate(&ok).unwrap(), ServiceType::ServerlessFunction);
    }

    #[test]
    fn test_container_service_requires_launch_type() {
        let err = validate(&config("ecs", "web")).unwrap_err();
        assert_eq!(err.missing_fields(), &["launchType"]);
        assert_eq!(err.to_string(), "ECS requires launchType");

        let ok = config("ecs", "web").with("launchType", "FARGATE");
        assert_eq!(validate(&ok).unwrap(), ServiceType::ContainerService);
    }

    #[test]
    fn test_unknown_service_type() {
        for value in ["gke", "EC2", "rds", "virtual_machine"] {
            let err = validate(&config(value, "app")).unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidServiceType {
                    value: value.to_string()
                }
            );
        }

        let numeric = Configuration::new()
            .with("serviceType", 7)
            .with("appName", "app");
        assert!(matches!(
            validate(&numeric),
            Err(ConfigError::InvalidServiceType { .. })
        ));
    }

    #[test]
    fn test_runtime_is_not_checked_against_reference_list() {
        let config = config("lambda", "fn1").with("runtime", "cobol85");
        assert!(validate(&config).is_ok());
    }
}
