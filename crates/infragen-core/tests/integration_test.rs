// Integration tests for infragen-core
//
// Drives the public API the way the HTTP service does: a JSON Configuration
// goes in, a serialized Deployment Descriptor (or an error) comes out.

use infragen_core::serialize::{from_yaml, to_yaml};
use infragen_core::{
    validate, ConfigError, Configuration, GenerateResponse, MachineImageTable, OutputFormat,
    ServiceType, TemplateProcessor,
};
use serde_json::{json, Value};

fn config(value: Value) -> Configuration {
    serde_json::from_value(value).expect("configuration must be a JSON object")
}

fn scenario_a() -> Configuration {
    config(json!({
        "serviceType": "virtual-machine",
        "appName": "demo",
        "instanceType": "t2.micro",
        "region": "us-east-1"
    }))
}

fn scenario_b() -> Configuration {
    config(json!({
        "serviceType": "serverless-function",
        "appName": "fn1",
        "runtime": "python3.9"
    }))
}

fn scenario_c() -> Configuration {
    config(json!({
        "serviceType": "container-service",
        "appName": "web",
        "launchType": "FARGATE"
    }))
}

#[test]
fn test_virtual_machine_scenario() {
    let template = TemplateProcessor::default()
        .generate(&scenario_a())
        .expect("scenario A should generate");
    let descriptor = template.descriptor.as_value();

    assert_eq!(template.service, ServiceType::VirtualMachine);
    assert_eq!(
        descriptor["Resources"]["EC2Instance"]["Properties"]["ImageId"],
        MachineImageTable::builtin().resolve("us-east-1")
    );
    assert_eq!(descriptor["Parameters"]["InstanceType"]["Default"], "t2.micro");
    assert_eq!(descriptor["Parameters"]["VolumeSize"]["Default"], 8);
}

#[test]
fn test_serverless_function_scenario() {
    let template = TemplateProcessor::default()
        .generate(&scenario_b())
        .expect("scenario B should generate");
    let resources = &template.descriptor.as_value()["Resources"];
    let function = &resources["LambdaFunction"]["Properties"];

    assert_eq!(function["Handler"], "index.handler");
    assert_eq!(function["Timeout"], 3);
    assert_eq!(function["MemorySize"], 128);
    assert_eq!(function["Runtime"], "python3.9");
    assert_eq!(
        function["Role"]["Fn::GetAtt"],
        json!(["LambdaExecutionRole", "Arn"])
    );
    assert_eq!(resources["LambdaExecutionRole"]["Type"], "AWS::IAM::Role");
}

#[test]
fn test_container_service_scenario() {
    let template = TemplateProcessor::default()
        .generate(&scenario_c())
        .expect("scenario C should generate");
    let task = &template.descriptor.as_value()["Resources"]["ECSTaskDefinition"]["Properties"];

    assert_eq!(task["Cpu"], "256");
    assert_eq!(task["Memory"], "512");
    let containers = task["ContainerDefinitions"].as_array().unwrap();
    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0]["Name"], "web");
    assert_eq!(containers[0]["Image"], "nginx:latest");
    assert_eq!(containers[0]["PortMappings"][0]["ContainerPort"], 80);
}

#[test]
fn test_missing_service_type_scenario() {
    let err = validate(&config(json!({"appName": "x"}))).unwrap_err();
    assert!(matches!(err, ConfigError::MissingRequiredField { .. }));
    assert_eq!(err.to_string(), "Missing required fields: serviceType and appName");
}

#[test]
fn test_virtual_machine_missing_fields_scenario() {
    let err = validate(&config(json!({"serviceType": "ec2", "appName": "y"}))).unwrap_err();
    assert_eq!(err.missing_fields(), &["instanceType", "region"]);
    assert_eq!(err.to_string(), "EC2 requires instanceType and region");
}

#[test]
fn test_unknown_service_type() {
    let response = TemplateProcessor::default().handle(&config(json!({
        "serviceType": "kubernetes",
        "appName": "k"
    })));
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"success": false, "error": "Invalid service type"})
    );
}

#[test]
fn test_yaml_round_trip_for_every_generator() {
    let processor = TemplateProcessor::default();
    for configuration in [scenario_a(), scenario_b(), scenario_c()] {
        let template = processor.generate(&configuration).unwrap();
        let parsed = from_yaml(&template.text).unwrap();
        assert_eq!(parsed, template.descriptor, "{}", template.service);
        assert_eq!(to_yaml(&parsed).unwrap(), template.text);
    }
}

#[test]
fn test_generation_is_deterministic() {
    let processor = TemplateProcessor::default();
    for configuration in [scenario_a(), scenario_b(), scenario_c()] {
        let first = processor.generate(&configuration).unwrap();
        let second = processor.generate(&configuration).unwrap();
        assert_eq!(first.text, second.text);
    }
}

#[test]
fn test_descriptor_does_not_leak_unrelated_fields() {
    let with_noise = scenario_c()
        .with("runtime", "nodejs18.x")
        .with("instanceType", "m5.large");
    let plain = TemplateProcessor::default().generate(&scenario_c()).unwrap();
    let noisy = TemplateProcessor::default().generate(&with_noise).unwrap();
    assert_eq!(plain.descriptor, noisy.descriptor);
}

#[test]
fn test_json_output_matches_response_payload() {
    let processor = TemplateProcessor::default().with_format(OutputFormat::Json);
    let response = processor.handle(&scenario_b());
    let GenerateResponse::Success(template) = &response else {
        panic!("expected success, got {:?}", response);
    };

    let payload = serde_json::to_value(&response).unwrap();
    let from_text: Value = serde_json::from_str(&template.text).unwrap();
    assert_eq!(payload["json"], from_text);
    assert_eq!(template.filename(), "fn1-lambda-config.json");
}
