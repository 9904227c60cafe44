//! EC2 instance template

use super::TEMPLATE_FORMAT_VERSION;
use crate::configuration::Configuration;
use crate::descriptor::DeploymentDescriptor;
use crate::images::MachineImageTable;
use serde_json::json;

/// Root volume size in GiB when `volumeSize` is not given
pub const DEFAULT_VOLUME_SIZE: u64 = 8;

pub const ROOT_DEVICE_NAME: &str = "/dev/xvda";

pub fn generate(config: &Configuration, images: &MachineImageTable) -> DeploymentDescriptor {
    let app_name = config.text("appName");
    let image_id = images.resolve(&config.text("region"));

    DeploymentDescriptor::new(json!({
        "AWSTemplateFormatVersion": TEMPLATE_FORMAT_VERSION,
        "Description": format!("EC2 instance deployment for {}", app_name),
        "Parameters": {
            "InstanceType": {
                "Type": "String",
                "Default": config.value("instanceType"),
            },
            "VolumeSize": {
                "Type": "Number",
                "Default": config.value_or("volumeSize", DEFAULT_VOLUME_SIZE),
            },
        },
        "Resources": {
            "EC2Instance": {
                "Type": "AWS::EC2::Instance",
                "Properties": {
                    "InstanceType": {"Ref": "InstanceType"},
                    "ImageId": image_id,
                    "BlockDeviceMappings": [{
                        "DeviceName": ROOT_DEVICE_NAME,
                        "Ebs": {
                            "VolumeSize": {"Ref": "VolumeSize"},
                        },
                    }],
                },
            },
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn demo() -> Configuration {
        Configuration::new()
            .with("serviceType", "virtual-machine")
            .with("appName", "demo")
            .with("instanceType", "t2.micro")
            .with("region", "us-east-1")
    }

    #[test]
    fn test_defaults() {
        let descriptor = generate(&demo(), MachineImageTable::builtin());

        assert_eq!(
            descriptor.description(),
            Some("EC2 instance deployment for demo")
        );
        assert_eq!(descriptor.parameter_default("InstanceType"), Some(&json!("t2.micro")));
        assert_eq!(descriptor.parameter_default("VolumeSize"), Some(&json!(8)));

        let instance = descriptor.resource("EC2Instance").unwrap();
        assert_eq!(instance["Type"], "AWS::EC2::Instance");
        assert_eq!(instance["Properties"]["ImageId"], "ami-0c55b159cbfafe1f0");
        assert_eq!(
            instance["Properties"]["InstanceType"],
            json!({"Ref": "InstanceType"})
        );
        assert_eq!(
            instance["Properties"]["BlockDeviceMappings"][0]["Ebs"]["VolumeSize"],
            json!({"Ref": "VolumeSize"})
        );

        let properties = instance["Properties"].as_object().unwrap();
        let keys: Vec<&str> = properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["InstanceType", "ImageId", "BlockDeviceMappings"]);
        assert_eq!(
            descriptor.as_value()["Parameters"]["InstanceType"],
            json!({"Type": "String", "Default": "t2.micro"})
        );
        assert_eq!(
            descriptor.as_value()["Parameters"]["VolumeSize"],
            json!({"Type": "Number", "Default": 8})
        );
    }

    #[test]
    fn test_volume_size_override() {
        let descriptor = generate(&demo().with("volumeSize", 50), MachineImageTable::builtin());
        assert_eq!(descriptor.parameter_default("VolumeSize"), Some(&json!(50)));
    }

    #[test]
    fn test_image_follows_region() {
        let images = MachineImageTable::builtin();

        let west = generate(&demo().with("region", "us-west-2"), images);
        assert_eq!(
            west.resource("EC2Instance").unwrap()["Properties"]["ImageId"],
            "ami-0735c191cf914754d"
        );

        // Known region without an image entry
        let mumbai = generate(&demo().with("region", "ap-south-1"), images);
        assert_eq!(
            mumbai.resource("EC2Instance").unwrap()["Properties"]["ImageId"],
            images.resolve("us-east-1")
        );
    }
}
