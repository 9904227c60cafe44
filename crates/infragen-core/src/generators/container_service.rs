//! ECS cluster and task definition template

use super::TEMPLATE_FORMAT_VERSION;
use crate::configuration::Configuration;
use crate::descriptor::DeploymentDescriptor;
use serde_json::json;

// Task size defaults are strings, as CloudFormation expects for Fargate
pub const DEFAULT_CPU: &str = "256";
pub const DEFAULT_MEMORY: &str = "512";
pub const DEFAULT_CONTAINER_IMAGE: &str = "nginx:latest";
pub const CONTAINER_PORT: u16 = 80;
pub const NETWORK_MODE: &str = "awsvpc";

pub fn generate(config: &Configuration) -> DeploymentDescriptor {
    let app_name = config.text("appName");

    DeploymentDescriptor::new(json!({
        "AWSTemplateFormatVersion": TEMPLATE_FORMAT_VERSION,
        "Description": format!("ECS cluster deployment for {}", app_name),
        "Resources": {
            "ECSCluster": {
                "Type": "AWS::ECS::Cluster",
                "Properties": {
                    "ClusterName": config.value("appName"),
                },
            },
            "ECSTaskDefinition": {
                "Type": "AWS::ECS::TaskDefinition",
                "Properties": {
                    "Family": format!("{}-task", app_name),
                    "RequiresCompatibilities": [config.value("launchType")],
                    "NetworkMode": NETWORK_MODE,
                    "Cpu": config.value_or("cpu", DEFAULT_CPU),
                    "Memory": config.value_or("memory", DEFAULT_MEMORY),
                    "ContainerDefinitions": [{
                        "Name": config.value("appName"),
                        "Image": config.value_or("containerImage", DEFAULT_CONTAINER_IMAGE),
                        "PortMappings": [{
                            "ContainerPort": CONTAINER_PORT,
                            "Protocol": "tcp",
                        }],
                    }],
                },
            },
        },
    }))
}
