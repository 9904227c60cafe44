use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use infragen::build_router;
use infragen_config::RuntimeConfig;
use infragen_core::ServiceType;
use serde_json::{json, Value};
use tower::ServiceExt;

fn router() -> Router {
    build_router(&RuntimeConfig::default()).unwrap()
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(response).await
}

async fn post(app: Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap();
    read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = get(router(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy"}));
}

#[tokio::test]
async fn test_list_services() {
    let (status, body) = get(router(), "/services").await;
    assert_eq!(status, StatusCode::OK);

    let services = body["services"].as_array().unwrap();
    let ids: Vec<&str> = services.iter().map(|s| s["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["ec2", "lambda", "ecs"]);
    assert_eq!(services[1]["name"], "Lambda");
    assert_eq!(
        services[0]["configOptions"],
        json!(["instance-type", "region", "volume-size"])
    );
}

#[tokio::test]
async fn test_list_services_hides_disabled() {
    let mut config = RuntimeConfig::default();
    config.generator.enabled_services = vec![ServiceType::ContainerService];
    let app = build_router(&config).unwrap();

    let (_, body) = get(app, "/services").await;
    assert_eq!(body["services"].as_array().unwrap().len(), 1);
    assert_eq!(body["services"][0]["id"], "ecs");
}

#[tokio::test]
async fn test_config_options() {
    let (status, body) = get(router(), "/config-options").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["regions"].as_array().unwrap().len(), 18);
    assert_eq!(body["regions"][0]["value"], "us-east-1");
    assert_eq!(body["instanceTypes"]["Compute Optimized"][0], "c5.large");
    assert_eq!(body["lambdaRuntimes"].as_array().unwrap().len(), 9);
    assert_eq!(body["ecsLaunchTypes"], json!(["FARGATE", "EC2"]));
}

#[tokio::test]
async fn test_generate_config_success() {
    let payload = json!({
        "serviceType": "ec2",
        "appName": "demo",
        "instanceType": "t2.micro",
        "region": "us-east-1",
    });
    let (status, body) = post(router(), "/generate-config", payload.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["json"]["Resources"]["EC2Instance"]["Properties"]["ImageId"],
        "ami-0c55b159cbfafe1f0"
    );
    let yaml = body["config"].as_str().unwrap();
    assert!(yaml.contains("AWS::EC2::Instance"));
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_generate_config_missing_fields() {
    let (status, body) = post(router(), "/generate-config", r#"{"serviceType": "ec2"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"success": false, "error": "Missing required fields: serviceType and appName"})
    );

    let payload = json!({"serviceType": "ec2", "appName": "y"});
    let (status, body) = post(router(), "/generate-config", payload.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "EC2 requires instanceType and region");
}

#[tokio::test]
async fn test_generate_config_invalid_service_type() {
    let payload = json!({"serviceType": "s3", "appName": "bucket"});
    let (status, body) = post(router(), "/generate-config", payload.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "error": "Invalid service type"}));
}

#[tokio::test]
async fn test_generate_config_disabled_service() {
    let mut config = RuntimeConfig::default();
    config.generator.enabled_services = vec![ServiceType::VirtualMachine];
    let app = build_router(&config).unwrap();

    let payload = json!({"serviceType": "lambda", "appName": "fn1", "runtime": "go1.x"});
    let (status, body) = post(app, "/generate-config", payload.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unsupported service type");
}

#[tokio::test]
async fn test_generate_config_malformed_body() {
    let (status, body) = post(router(), "/generate-config", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON body"));
}

#[tokio::test]
async fn test_payload_limit() {
    let mut config = RuntimeConfig::default();
    config.request.max_payload_bytes = 64;
    let app = build_router(&config).unwrap();

    let payload = json!({"serviceType": "ecs", "appName": "x".repeat(128)});
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/generate-config")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_generate_artifacts() {
    let payload = json!({
        "projectName": "shop",
        "environment": "production",
        "region": "eu-west-1",
        "useEC2": true,
        "useS3": true,
        "useRDS": false,
    });
    let (status, body) = post(router(), "/generate-artifacts", payload.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let files = body["files"].as_object().unwrap();
    assert_eq!(files.len(), 9);
    assert!(files["main.tf"].as_str().unwrap().contains("shop-vpc"));
    assert!(files["iam/policies.tf"].as_str().unwrap().contains("s3:"));
    assert!(files["aws-cli-commands.sh"]
        .as_str()
        .unwrap()
        .contains("--region eu-west-1"));
}

#[tokio::test]
async fn test_generate_artifacts_requires_project_name() {
    let (status, body) = post(router(), "/generate-artifacts", r#"{"useS3": true}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"success": false, "error": "Missing required field: projectName"})
    );
}

#[tokio::test]
async fn test_cors_preflight() {
    let response = router()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/generate-config")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
