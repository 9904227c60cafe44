//! Error types for configuration validation and template generation

use crate::service::ServiceType;
use thiserror::Error;

/// Errors produced while turning a Configuration into a template.
///
/// All of them are local to a single request and are reported back to the
/// caller as a client error. None are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// One or more fields required for the service type are absent or empty
    #[error("{message}")]
    MissingRequiredField {
        fields: Vec<&'static str>,
        message: &'static str,
    },

    /// `serviceType` is not one of the recognized identifiers
    #[error("Invalid service type")]
    InvalidServiceType { value: String },

    /// `serviceType` is recognized but generation for it is switched off
    #[error("Unsupported service type")]
    UnsupportedServiceType { service: ServiceType },

    /// Descriptor could not be converted to text
    #[error("Failed to serialize deployment descriptor: {message}")]
    Serialization { message: String },

    /// A project artifact template failed to render
    #[error("Failed to render {template}: {message}")]
    Render { template: String, message: String },
}

impl ConfigError {
    pub(crate) fn missing(fields: &[&'static str], message: &'static str) -> Self {
        Self::MissingRequiredField {
            fields: fields.to_vec(),
            message,
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        400
    }

    /// Error type string for logs and metrics labels
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::MissingRequiredField { .. } => "MissingRequiredField",
            Self::InvalidServiceType { .. } => "InvalidServiceType",
            Self::UnsupportedServiceType { .. } => "UnsupportedServiceType",
            Self::Serialization { .. } => "Serialization",
            Self::Render { .. } => "Render",
        }
    }

    /// Names of the missing fields, empty for every other variant
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            Self::MissingRequiredField { fields, .. } => fields,
            _ => &[],
        }
    }
}

/// Result type alias for ConfigError
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_wire_contract() {
        let err = ConfigError::missing(
            &["serviceType", "appName"],
            "Missing required fields: serviceType and appName",
        );
        assert_eq!(
            err.to_string(),
            "Missing required fields: serviceType and appName"
        );
        assert_eq!(err.missing_fields(), &["serviceType", "appName"]);

        let err = ConfigError::InvalidServiceType {
            value: "gke".into(),
        };
        assert_eq!(err.to_string(), "Invalid service type");
        assert!(err.missing_fields().is_empty());

        let err = ConfigError::UnsupportedServiceType {
            service: ServiceType::ContainerService,
        };
        assert_eq!(err.to_string(), "Unsupported service type");
    }

    #[test]
    fn test_error_types() {
        let err = ConfigError::Serialization {
            message: "boom".into(),
        };
        assert_eq!(err.error_type(), "Serialization");
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("boom"));

        let err = ConfigError::Render {
            template: "main.tf".into(),
            message: "unexpected end".into(),
        };
        assert_eq!(err.error_type(), "Render");
        assert!(err.to_string().contains("main.tf"));
    }
}
