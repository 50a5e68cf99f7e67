//! Chat request handling
//!
//! Sits between the transport and the router: decodes the request body,
//! fills in defaults, routes the query and maps the outcome to a status
//! code. Logging and metrics for each query happen here so every entry
//! point (HTTP or CLI) reports the same way.

use crate::config::DefaultsSection;
use crate::error::{AssistantError, AssistantResult};
use crate::observability::health::HealthState;
use crate::observability::metrics::metrics;
use crate::query_span;
use crate::routing::{IntentRouter, Role, RoutingContext, RoutingResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;
use warp::http::StatusCode;

/// Body of `POST /api/chatbot`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default, alias = "userRole")]
    pub role: Option<String>,
    #[serde(default, alias = "urbanId")]
    pub scope: Option<String>,
}

impl ChatRequest {
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn with_role<S: Into<String>>(mut self, role: S) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_scope<S: Into<String>>(mut self, scope: S) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Parse a JSON request body
    pub fn decode(body: &[u8]) -> AssistantResult<Self> {
        serde_json::from_slice(body).map_err(|e| AssistantError::malformed_request(e.to_string()))
    }
}

/// Status code plus the JSON body to send back
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub status: StatusCode,
    pub body: RoutingResult,
}

impl ChatReply {
    fn ok(body: RoutingResult) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    fn bad_request(error: &AssistantError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: RoutingResult::rejected(error.client_message()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success() && self.body.success
    }
}

/// Request handler shared by every connection
#[derive(Debug, Clone)]
pub struct ChatService {
    router: Arc<IntentRouter>,
    defaults: DefaultsSection,
    health: Option<Arc<HealthState>>,
}

impl ChatService {
    pub fn new(router: Arc<IntentRouter>, defaults: DefaultsSection) -> Self {
        Self {
            router,
            defaults,
            health: None,
        }
    }

    /// Report handled queries to the given health state
    pub fn with_health(mut self, health: Arc<HealthState>) -> Self {
        self.health = Some(health);
        self
    }

    /// Decode a raw JSON body and route it
    pub fn handle(&self, body: &[u8]) -> ChatReply {
        match ChatRequest::decode(body) {
            Ok(request) => self.route_request(&request),
            Err(error) => {
                metrics().malformed_request();
                warn!(
                    error = %error,
                    body_bytes = body.len(),
                    "Rejecting undecodable chat request"
                );
                ChatReply::bad_request(&error)
            }
        }
    }

    /// Context for a request, with blank fields replaced by configured defaults
    pub fn context_for(&self, request: &ChatRequest) -> RoutingContext {
        let role = match non_blank(request.role.as_deref()) {
            Some(label) => Role::from_label(label),
            None => self.defaults.role,
        };
        let scope = non_blank(request.scope.as_deref()).unwrap_or(self.defaults.scope.as_str());

        RoutingContext::new(role, scope.trim())
    }

    /// Route an already decoded request
    pub fn route_request(&self, request: &ChatRequest) -> ChatReply {
        let request_id = Uuid::new_v4();
        let ctx = self.context_for(request);
        let span = query_span!(
            request_id = %request_id,
            role = %ctx.role,
            scope = %ctx.scope
        );
        let _enter = span.enter();

        metrics().query_received();
        if let Some(health) = &self.health {
            health.record_query();
        }

        let started = Instant::now();
        let outcome = self.router.resolve(request.query.as_deref(), &ctx);
        let elapsed = started.elapsed();

        match outcome.intent {
            Some(intent) => {
                metrics().query_routed(intent, elapsed);
                info!(
                    intent = %intent,
                    action = outcome.result.action_kind().map(|kind| kind.as_str()),
                    target = outcome.result.target(),
                    elapsed_us = elapsed.as_micros() as u64,
                    "Query routed"
                );
                ChatReply::ok(outcome.result)
            }
            None => {
                metrics().query_rejected();
                debug!("Query missing or blank");
                ChatReply {
                    status: StatusCode::BAD_REQUEST,
                    body: outcome.result,
                }
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
