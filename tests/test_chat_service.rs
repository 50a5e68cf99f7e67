//! Chat service tests
//!
//! Decoding, defaults and status mapping, independent of the HTTP layer.


use std::sync::Arc;
use test_helpers::stock_service;
use urban_assistant::config::{AssistantConfig, DefaultsSection};
use urban_assistant::routing::{Intent, IntentRouter, Role, RoutingResult};
use urban_assistant::service::{ChatRequest, ChatService};
use urban_assistant::testing::{CountingRule, FixedRule};
use warp::http::StatusCode;

#[test]
fn test_request_decoding_with_aliases() {
    let request: ChatRequest =
        serde_json::from_str(r#"{"query":"q","userRole":"developer","urbanId":"c1"}"#).unwrap();

    assert_eq!(
        request,
        ChatRequest::new("q").with_role("developer").with_scope("c1")
    );
}

#[test]
fn test_unknown_fields_are_ignored() {
    let reply = stock_service().handle(br#"{"query":"events","sessionId":"abc","extra":[1]}"#);
    assert_eq!(reply.status, StatusCode::OK);
}

#[test]
fn test_scope_default_from_config() {
    let config = AssistantConfig::from_toml_str("[defaults]\nscope = \"springfield\"\n").unwrap();
    let service = ChatService::new(
        Arc::new(IntentRouter::from_config(&config)),
        config.defaults.clone(),
    );

    let reply = service.route_request(&ChatRequest::new("go to living"));
    assert_eq!(reply.body.target(), Some("/urban/springfield/living"));
}

#[test]
fn test_role_is_case_insensitive() {
    let service = stock_service();
    for label in ["developer", "DEVELOPER", " Developer "] {
        let reply = service.route_request(&ChatRequest::new("parking").with_role(label));
        assert_eq!(reply.body.feature(), Some("parking-analysis"), "{label}");
    }
}

#[test]
fn test_injected_rules_reach_the_service() {
    let counting = CountingRule::new();
    let router = IntentRouter::with_rules(vec![
        Box::new(counting.clone()),
        Box::new(FixedRule::new(
            Intent::Food,
            "tacos",
            RoutingResult::navigate("Tacos ahead.", "/tacos"),
        )),
    ]);
    let service = ChatService::new(Arc::new(router), DefaultsSection::default());

    let reply = service.handle(br#"{"query":"Tacos tonight?"}"#);
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body.target(), Some("/tacos"));
    assert_eq!(counting.evaluations(), 1);

    // Rejected queries never reach the rules
    service.handle(br#"{"query":"   "}"#);
    assert_eq!(counting.evaluations(), 1);
}

#[test]
fn test_context_defaults() {
    let defaults = DefaultsSection {
        role: Role::Developer,
        scope: "metro".to_string(),
    };
    let service = ChatService::new(Arc::new(IntentRouter::default()), defaults);

    let ctx = service.context_for(&ChatRequest::new("x"));
    assert_eq!(ctx.role, Role::Developer);
    assert_eq!(ctx.scope, "metro");

    // An explicit role overrides the default, even when it is not "developer"
    let ctx = service.context_for(&ChatRequest::new("x").with_role("guest"));
    assert_eq!(ctx.role, Role::User);
}
