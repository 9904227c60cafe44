//! Request processing: validate, generate, serialize
//!
//! The processor is the single entry point used by the HTTP service and the
//! CLI. Every failure is turned into a `GenerateResponse::Failure`; nothing
//! escapes as a panic or an unhandled error.

use crate::configuration::Configuration;
use crate::descriptor::DeploymentDescriptor;
use crate::error::{ConfigError, Result};
use crate::generators;
use crate::images::MachineImageTable;
use crate::serialize::OutputFormat;
use crate::service::ServiceType;
use crate::validate::validate;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::debug;

/// A successfully generated template
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTemplate {
    pub service: ServiceType,
    pub app_name: String,
    pub format: OutputFormat,
    pub descriptor: DeploymentDescriptor,
    /// `descriptor` serialized in `format`
    pub text: String,
}

impl GeneratedTemplate {
    /// Suggested download name, `{appName}-{serviceType}-config.{ext}`
    pub fn filename(&self) -> String {
        download_filename(&self.app_name, self.service, self.format)
    }
}

pub fn download_filename(app_name: &str, service: ServiceType, format: OutputFormat) -> String {
    format!("{}-{}-config.{}", app_name, service.id(), format.extension())
}

/// Wire response of `POST /generate-config`
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateResponse {
    Success(GeneratedTemplate),
    Failure(ConfigError),
}

impl GenerateResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerateResponse::Success(_))
    }

    pub fn status_code(&self) -> u16 {
        match self {
            GenerateResponse::Success(_) => 200,
            GenerateResponse::Failure(err) => err.status_code(),
        }
    }
}

impl From<Result<GeneratedTemplate>> for GenerateResponse {
    fn from(result: Result<GeneratedTemplate>) -> Self {
        match result {
            Ok(template) => GenerateResponse::Success(template),
            Err(err) => GenerateResponse::Failure(err),
        }
    }
}

impl Serialize for GenerateResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            GenerateResponse::Success(template) => {
                let mut state = serializer.serialize_struct("GenerateResponse", 3)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("config", &template.text)?;
                state.serialize_field("json", &template.descriptor)?;
                state.end()
            }
            GenerateResponse::Failure(err) => {
                let mut state = serializer.serialize_struct("GenerateResponse", 2)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", &err.to_string())?;
                state.end()
            }
        }
    }
}

/// Validator + generators + serializer, with the runtime switches applied
#[derive(Debug, Clone)]
pub struct TemplateProcessor {
    images: MachineImageTable,
    enabled_services: Vec<ServiceType>,
    format: OutputFormat,
}

impl TemplateProcessor {
    pub fn new(enabled_services: Vec<ServiceType>) -> Self {
        Self {
            images: MachineImageTable::default(),
            enabled_services,
            format: OutputFormat::default(),
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_images(mut self, images: MachineImageTable) -> Self {
        self.images = images;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn enabled_services(&self) -> &[ServiceType] {
        &self.enabled_services
    }

    pub fn is_enabled(&self, service: ServiceType) -> bool {
        self.enabled_services.contains(&service)
    }

    /// Validate `config` and build its template
    pub fn generate(&self, config: &Configuration) -> Result<GeneratedTemplate> {
        let service = validate(config)?;
        if !self.is_enabled(service) {
            return Err(ConfigError::UnsupportedServiceType { service });
        }

        let descriptor = generators::generate(service, config, &self.images);
        let text = self.format.serialize(&descriptor)?;

        debug!(
            service = %service,
            format = %self.format,
            bytes = text.len(),
            "Generated deployment descriptor"
        );

        Ok(GeneratedTemplate {
            service,
            app_name: config.text("appName"),
            format: self.format,
            descriptor,
            text,
        })
    }

    /// Same as `generate`, folded into a wire response
    pub fn handle(&self, config: &Configuration) -> GenerateResponse {
        self.generate(config).into()
    }
}

impl Default for TemplateProcessor {
    fn default() -> Self {
        Self::new(ServiceType::ALL.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_response_shape() {
        let config = Configuration::new()
            .with("serviceType", "ecs")
            .with("appName", "web")
            .with("launchType", "FARGATE");

        let response = TemplateProcessor::default().handle(&config);
        assert!(response.is_success());
        assert_eq!(response.status_code(), 200);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert!(json["config"].as_str().unwrap().contains("ECSTaskDefinition"));
        assert_eq!(json["json"]["Resources"]["ECSCluster"]["Type"], "AWS::ECS::Cluster");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_response_shape() {
        let config = Configuration::new().with("appName", "x");
        let response = TemplateProcessor::default().handle(&config);
        assert!(!response.is_success());
        assert_eq!(response.status_code(), 400);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            json!({"success": false, "error": "Missing required fields: serviceType and appName"})
        );
    }

    #[test]
    fn test_disabled_service_is_unsupported() {
        let processor = TemplateProcessor::new(vec![ServiceType::VirtualMachine]);
        let config = Configuration::new()
            .with("serviceType", "lambda")
            .with("appName", "fn1")
            .with("runtime", "go1.x");

        let err = processor.generate(&config).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnsupportedServiceType {
                service: ServiceType::ServerlessFunction
            }
        );
        assert_eq!(err.to_string(), "Unsupported service type");
    }

    #[test]
    fn test_validation_runs_before_enablement_check() {
        let processor = TemplateProcessor::new(vec![]);
        let config = Configuration::new()
            .with("serviceType", "lambda")
            .with("appName", "fn1");
        assert!(matches!(
            processor.generate(&config),
            Err(ConfigError::MissingRequiredField { .. })
        ));
    }

    #[test]
    fn test_filename_and_format() {
        let config = Configuration::new()
            .with("serviceType", "virtual-machine")
            .with("appName", "demo")
            .with("instanceType", "t3.small")
            .with("region", "eu-west-1");

        let yaml = TemplateProcessor::default().generate(&config).unwrap();
        assert_eq!(yaml.filename(), "demo-ec2-config.yaml");
        assert_eq!(yaml.app_name, "demo");

        let json = TemplateProcessor::default()
            .with_format(OutputFormat::Json)
            .generate(&config)
            .unwrap();
        assert_eq!(json.filename(), "demo-ec2-config.json");
        assert!(json.text.trim_start().starts_with('{'));
        assert_eq!(json.descriptor, yaml.descriptor);
    }

    #[test]
    fn test_custom_image_table() {
        let images =
            MachineImageTable::from_entries("custom", [("us-east-1", "ami-custom")]).unwrap();
        let processor = TemplateProcessor::default().with_images(images);
        let config = Configuration::new()
            .with("serviceType", "ec2")
            .with("appName", "demo")
            .with("instanceType", "t2.micro")
            .with("region", "us-west-2");

        let template = processor.generate(&config).unwrap();
        assert_eq!(
            template.descriptor.resource("EC2Instance").unwrap()["Properties"]["ImageId"],
            "ami-custom"
        );
    }
}
