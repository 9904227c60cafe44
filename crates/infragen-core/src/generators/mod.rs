//! Template generators, one per service type
//!
//! Each generator is a pure function of an already validated Configuration.
//! Optional fields fall back to fixed defaults; present values are copied
//! into the descriptor verbatim.

pub mod container_service;
pub mod serverless_function;
pub mod virtual_machine;

use crate::configuration::Configuration;
use crate::descriptor::DeploymentDescriptor;
use crate::images::MachineImageTable;
use crate::service::ServiceType;

/// `AWSTemplateFormatVersion` stamped on every descriptor
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// Build the descriptor for `service`
pub fn generate(
    service: ServiceType,
    config: &Configuration,
    images: &MachineImageTable,
) -> DeploymentDescriptor {
    match service {
        ServiceType::VirtualMachine => virtual_machine::generate(config, images),
        ServiceType::ServerlessFunction => serverless_function::generate(config),
        ServiceType::ContainerService => container_service::generate(config),
    }
}
