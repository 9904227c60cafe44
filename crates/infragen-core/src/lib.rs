// infragen-core - Configuration validation and template generation
//
// This crate contains the PURE generation logic: a submitted Configuration
// is validated against its service type, mapped to a CloudFormation-style
// Deployment Descriptor and serialized to YAML or JSON.
// No I/O, no async, no runtime dependencies.
//
// Everything here is a deterministic function of the input Configuration and
// the read-only reference tables, so callers may share a processor freely
// across threads.

pub mod artifacts;
pub mod configuration;
pub mod descriptor;
pub mod error;
pub mod generators;
pub mod images;
pub mod processor;
pub mod reference;
pub mod serialize;
pub mod service;
pub mod validate;

// Re-export commonly used types
pub use artifacts::{ArtifactBundle, ArtifactRenderer, ProjectProfile};
pub use configuration::Configuration;
pub use descriptor::DeploymentDescriptor;
pub use error::{ConfigError, Result};
pub use images::MachineImageTable;
pub use processor::{download_filename, GenerateResponse, GeneratedTemplate, TemplateProcessor};
pub use reference::{ConfigOptions, ReferenceData};
pub use serialize::OutputFormat;
pub use service::ServiceType;
pub use validate::validate;
