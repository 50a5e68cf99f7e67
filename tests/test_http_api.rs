//! HTTP API tests
//!
//! Drive the full filter stack with `warp::test` so status codes, JSON
//! shapes and CORS behave the way a browser client sees them.


use serde_json::{json, Value};
use std::sync::Arc;
use test_helpers::stock_service;
use urban_assistant::config::ServerSection;
use urban_assistant::observability::HealthState;
use urban_assistant::transport::routes;
use warp::http::StatusCode;

fn server_section() -> ServerSection {
    ServerSection::default()
}

async fn post_chat(body: &str) -> (StatusCode, Value) {
    let health = Arc::new(HealthState::new("test", 6));
    let filters = routes(stock_service(), health, &server_section());

    let response = warp::test::request()
        .method("POST")
        .path("/api/chatbot")
        .header("content-type", "application/json")
        .body(body.to_string())
        .reply(&filters)
        .await;

    let json = serde_json::from_slice(response.body()).unwrap();
    (response.status(), json)
}

#[tokio::test]
async fn test_valid_query_returns_200() {
    let (status, body) = post_chat(r#"{"query":"go to dashboard","scope":"city42"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Taking you to the dashboard page.",
            "action": "navigate",
            "target": "/urban/city42/dashboard"
        })
    );
}

#[tokio::test]
async fn test_missing_query_returns_400() {
    for payload in [r#"{}"#, r#"{"query":""}"#, r#"{"role":"developer"}"#] {
        let (status, body) = post_chat(payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(body, json!({"success": false, "message": "Query is required"}));
    }
}

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let (status, body) = post_chat("{query: traffic").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "I encountered an error processing your request. Please try again."
    );
}

#[tokio::test]
async fn test_legacy_field_names_accepted() {
    let (status, body) =
        post_chat(r#"{"query":"traffic status","userRole":"developer","urbanId":"metro"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "navigate");
    assert_eq!(body["feature"], "traffic-analysis");
    assert_eq!(body["target"], "/urban/metro/dashboard");
}

#[tokio::test]
async fn test_user_traffic_is_info_with_data() {
    let (status, body) = post_chat(r#"{"query":"Traffic Status"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "info");
    assert_eq!(body["data"]["status"], "moderate");
    assert!(body.get("target").is_none());
}

#[tokio::test]
async fn test_live_and_ready_probes() {
    let health = Arc::new(HealthState::new("test", 6));
    let filters = routes(stock_service(), health.clone(), &server_section());

    let live = warp::test::request().path("/live").reply(&filters).await;
    assert_eq!(live.status(), StatusCode::OK);

    let ready = warp::test::request().path("/ready").reply(&filters).await;
    assert_eq!(ready.status(), StatusCode::SERVICE_UNAVAILABLE);

    health.set_ready(true);
    let ready = warp::test::request().path("/ready").reply(&filters).await;
    assert_eq!(ready.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_endpoint_reports_queries() {
    let health = Arc::new(HealthState::new("test", 6));
    let filters = routes(stock_service(), health, &server_section());

    warp::test::request()
        .method("POST")
        .path("/api/chatbot")
        .body(r#"{"query":"food"}"#)
        .reply(&filters)
        .await;

    let response = warp::test::request().path("/metrics").reply(&filters).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert!(body["queries"]["received"].as_u64().unwrap() >= 1);
    assert!(body["intents"]["food"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_cors_preflight_for_allowed_origin() {
    let server = ServerSection {
        allowed_origins: vec!["https://city.example".to_string()],
        ..Default::default()
    };
    let filters = routes(stock_service(), Arc::new(HealthState::new("test", 6)), &server);

    let allowed = warp::test::request()
        .method("OPTIONS")
        .path("/api/chatbot")
        .header("origin", "https://city.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .reply(&filters)
        .await;
    assert_eq!(allowed.status(), StatusCode::OK);
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "https://city.example"
    );

    let denied = warp::test::request()
        .method("OPTIONS")
        .path("/api/chatbot")
        .header("origin", "https://elsewhere.example")
        .header("access-control-request-method", "POST")
        .reply(&filters)
        .await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_validated_origins_build_the_filter_stack() {
    use urban_assistant::config::AssistantConfig;

    let config = AssistantConfig::from_toml_str(
        "[server]\nallowed_origins = [\"https://city.example\", \"http://localhost:5173\"]\n",
    )
    .unwrap();
    let filters = routes(
        stock_service(),
        Arc::new(HealthState::new("test", 6)),
        &config.server,
    );

    let response = warp::test::request()
        .method("OPTIONS")
        .path("/api/chatbot")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .reply(&filters)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Origins the CORS filter cannot parse never make it past validation
    let rejected = AssistantConfig::from_toml_str(
        "[server]\nallowed_origins = [\"https://city.example?x=1\"]\n",
    );
    assert!(rejected.is_err());
}
