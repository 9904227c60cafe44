//! Generated Deployment Descriptor
//!
//! A CloudFormation-style nested tree. Keys keep their insertion order so the
//! serialized text reads top to bottom the way the generator built it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentDescriptor(Value);

impl DeploymentDescriptor {
    pub(crate) fn new(tree: Value) -> Self {
        Self(tree)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn description(&self) -> Option<&str> {
        self.0.get("Description").and_then(Value::as_str)
    }

    /// Resource by logical id
    pub fn resource(&self, logical_id: &str) -> Option<&Value> {
        self.0.get("Resources")?.get(logical_id)
    }

    /// Logical ids of all resources, in template order
    pub fn resource_ids(&self) -> Vec<&str> {
        self.0
            .get("Resources")
            .and_then(Value::as_object)
            .map(|resources| resources.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// `Default` of a template parameter
    pub fn parameter_default(&self, name: &str) -> Option<&Value> {
        self.0.get("Parameters")?.get(name)?.get("Default")
    }
}

impl From<DeploymentDescriptor> for Value {
    fn from(descriptor: DeploymentDescriptor) -> Self {
        descriptor.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        let descriptor = DeploymentDescriptor::new(json!({
            "Description": "demo",
            "Parameters": {"VolumeSize": {"Type": "Number", "Default": 8}},
            "Resources": {
                "B": {"Type": "AWS::ECS::Cluster"},
                "A": {"Type": "AWS::ECS::TaskDefinition"},
            },
        }));

        assert_eq!(descriptor.description(), Some("demo"));
        assert_eq!(descriptor.parameter_default("VolumeSize"), Some(&json!(8)));
        assert_eq!(descriptor.parameter_default("InstanceType"), None);
        assert_eq!(descriptor.resource_ids(), vec!["B", "A"]);
        assert_eq!(
            descriptor.resource("A").unwrap()["Type"],
            "AWS::ECS::TaskDefinition"
        );
        assert!(descriptor.resource("C").is_none());
    }
}
