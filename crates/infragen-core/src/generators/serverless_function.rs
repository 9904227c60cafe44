//! Lambda function template with its execution role

use super::TEMPLATE_FORMAT_VERSION;
use crate::configuration::Configuration;
use crate::descriptor::DeploymentDescriptor;
use serde_json::json;

pub const DEFAULT_HANDLER: &str = "index.handler";
/// Seconds
pub const DEFAULT_TIMEOUT: u64 = 3;
/// MB
pub const DEFAULT_MEMORY: u64 = 128;

pub const BASIC_EXECUTION_POLICY_ARN: &str =
    "arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole";

const PLACEHOLDER_CODE: &str = "exports.handler = async (event) => { return { statusCode: 200, body: \"Hello from Lambda!\" }; }";

/// `runtime` is copied as given; it is not checked against the runtime list.
pub fn generate(config: &Configuration) -> DeploymentDescriptor {
    DeploymentDescriptor::new(json!({
        "AWSTemplateFormatVersion": TEMPLATE_FORMAT_VERSION,
        "Description": format!("Lambda function deployment for {}", config.text("appName")),
        "Resources": {
            "LambdaFunction": {
                "Type": "AWS::Lambda::Function",
                "Properties": {
                    "FunctionName": config.value("appName"),
                    "Handler": config.value_or("handler", DEFAULT_HANDLER),
                    "Role": {"Fn::GetAtt": ["LambdaExecutionRole", "Arn"]},
                    "Code": {
                        "ZipFile": PLACEHOLDER_CODE,
                    },
                    "Runtime": config.value("runtime"),
                    "Timeout": config.value_or("timeout", DEFAULT_TIMEOUT),
                    "MemorySize": config.value_or("memory", DEFAULT_MEMORY),
                },
            },
            "LambdaExecutionRole": {
                "Type": "AWS::IAM::Role",
                "Properties": {
                    "AssumeRolePolicyDocument": {
                        "Version": "2012-10-17",
                        "Statement": [{
                            "Effect": "Allow",
                            "Principal": {"Service": ["lambda.amazonaws.com"]},
                            "Action": ["sts:AssumeRole"],
                        }],
                    },
                    "ManagedPolicyArns": [BASIC_EXECUTION_POLICY_ARN],
                },
            },
        },
    }))
}
