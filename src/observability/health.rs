//! Health, readiness and metrics endpoints
//!
//! Mounted next to the chat endpoint so operators and container
//! orchestrators can probe the same listener.

use crate::observability::metrics::{current_timestamp, metrics};
use serde::Serialize;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::Filter;

/// Shared health state, updated by the server and the chat service
#[derive(Debug)]
pub struct HealthState {
    service: String,
    rule_count: usize,
    ready: AtomicBool,
    last_query_at: AtomicU64,
}

impl HealthState {
    pub fn new(service: impl Into<String>, rule_count: usize) -> Self {
        Self {
            service: service.into(),
            rule_count,
            ready: AtomicBool::new(false),
            last_query_at: AtomicU64::new(0),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Flip readiness; set once the listener is bound and cleared on shutdown
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Relaxed);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    pub fn record_query(&self) {
        self.last_query_at
            .store(current_timestamp(), Ordering::Relaxed);
    }

    /// Unix seconds of the last handled query, `None` before the first one
    pub fn last_query_at(&self) -> Option<u64> {
        match self.last_query_at.load(Ordering::Relaxed) {
            0 => None,
            ts => Some(ts),
        }
    }

    fn check_router(&self) -> HealthCheck {
        if self.rule_count > 0 {
            HealthCheck::healthy(format!("{} intent rules loaded", self.rule_count))
        } else {
            HealthCheck::degraded("No intent rules loaded, every query answers with help")
        }
    }

    fn check_listener(&self) -> HealthCheck {
        if self.is_ready() {
            HealthCheck::healthy("Accepting requests")
        } else {
            HealthCheck::degraded("Listener not bound yet")
        }
    }

    pub fn status(&self) -> HealthStatus {
        let mut checks = BTreeMap::new();
        checks.insert("router".to_string(), self.check_router());
        checks.insert("listener".to_string(), self.check_listener());

        let status = if checks.values().all(|check| check.status == "healthy") {
            "healthy"
        } else {
            "degraded"
        };

        HealthStatus {
            status: status.to_string(),
            service: self.service.clone(),
            timestamp: current_timestamp(),
            uptime_seconds: metrics().uptime_seconds(),
            last_query_at: self.last_query_at(),
            checks,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: Option<String>,
    pub last_check: u64,
}

impl HealthCheck {
    fn healthy(message: impl Into<String>) -> Self {
        Self::with_status("healthy", message)
    }

    fn degraded(message: impl Into<String>) -> Self {
        Self::with_status("degraded", message)
    }

    fn with_status(status: &str, message: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            message: Some(message.into()),
            last_check: current_timestamp(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub timestamp: u64,
    pub uptime_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_query_at: Option<u64>,
    pub checks: BTreeMap<String, HealthCheck>,
}

#[derive(Debug, Serialize)]
struct ReadinessResponse {
    ready: bool,
    timestamp: u64,
}

#[derive(Debug, Serialize)]
struct LivenessResponse {
    alive: bool,
    timestamp: u64,
}

#[derive(Debug, Serialize)]
struct ApiDocumentationResponse {
    service: String,
    endpoints: BTreeMap<&'static str, &'static str>,
}

fn with_state(
    state: Arc<HealthState>,
) -> impl Filter<Extract = (Arc<HealthState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// GET filters for `/health`, `/ready`, `/live`, `/metrics` and `/`
pub fn health_routes(
    state: Arc<HealthState>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    // GET /health - overall status with per-component checks
    let health_route = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(|state: Arc<HealthState>| async move {
            let status = state.status();
            let code = if status.status == "healthy" {
                StatusCode::OK
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            };
            Ok::<_, Infallible>(warp::reply::with_status(warp::reply::json(&status), code))
        });

    // GET /metrics - metrics snapshot
    let metrics_route = warp::path("metrics")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(|| async move {
            let snapshot = metrics().get_metrics();
            Ok::<_, Infallible>(warp::reply::json(&snapshot))
        });

    // GET /ready - readiness probe
    let ready_route = warp::path("ready")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(|state: Arc<HealthState>| async move {
            let ready = state.is_ready();
            let response = ReadinessResponse {
                ready,
                timestamp: current_timestamp(),
            };
            let code = if ready {
                StatusCode::OK
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            };
            Ok::<_, Infallible>(warp::reply::with_status(warp::reply::json(&response), code))
        });

    // GET /live - liveness probe
    let live_route = warp::path("live")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(|| async move {
            let response = LivenessResponse {
                alive: true,
                timestamp: current_timestamp(),
            };
            Ok::<_, Infallible>(warp::reply::json(&response))
        });

    // GET / - endpoint index
    let root_route = warp::path::end()
        .and(warp::get())
        .and(with_state(state))
        .and_then(|state: Arc<HealthState>| async move {
            let mut endpoints = BTreeMap::new();
            endpoints.insert("/api/chatbot", "POST a query, receive a routing result");
            endpoints.insert("/health", "Overall health status with detailed checks");
            endpoints.insert("/metrics", "Query and routing metrics");
            endpoints.insert("/ready", "Readiness probe");
            endpoints.insert("/live", "Liveness probe");

            let response = ApiDocumentationResponse {
                service: state.service().to_string(),
                endpoints,
            };
            Ok::<_, Infallible>(warp::reply::json(&response))
        });

    health_route
        .or(metrics_route)
        .or(ready_route)
        .or(live_route)
        .or(root_route)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_toggle() {
        let state = HealthState::new("urban-assistant", 6);
        assert!(!state.is_ready());

        state.set_ready(true);
        assert!(state.is_ready());

        state.set_ready(false);
        assert!(!state.is_ready());
    }

    #[test]
    fn test_last_query_timestamp() {
        let state = HealthState::new("urban-assistant", 6);
        assert_eq!(state.last_query_at(), None);

        state.record_query();
        assert!(state.last_query_at().is_some());
    }

    #[test]
    fn test_overall_health_status() {
        let state = HealthState::new("urban-assistant", 6);

        let status = state.status();
        assert_eq!(status.status, "degraded");
        assert_eq!(status.checks["listener"].status, "degraded");
        assert_eq!(status.checks["router"].status, "healthy");

        state.set_ready(true);
        let status = state.status();
        assert_eq!(status.status, "healthy");
        assert_eq!(status.service, "urban-assistant");
    }

    #[test]
    fn test_empty_router_is_degraded() {
        let state = HealthState::new("urban-assistant", 0);
        state.set_ready(true);
        assert_eq!(state.status().checks["router"].status, "degraded");
    }

    #[tokio::test]
    async fn test_live_route() {
        let routes = health_routes(Arc::new(HealthState::new("test", 1)));

        let response = warp::test::request()
            .method("GET")
            .path("/live")
            .reply(&routes)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["alive"], true);
    }

    #[tokio::test]
    async fn test_ready_route_follows_state() {
        let state = Arc::new(HealthState::new("test", 1));
        let routes = health_routes(state.clone());

        let response = warp::test::request().path("/ready").reply(&routes).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.set_ready(true);
        let response = warp::test::request().path("/ready").reply(&routes).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_index_lists_endpoints() {
        let routes = health_routes(Arc::new(HealthState::new("test", 1)));

        let response = warp::test::request().path("/").reply(&routes).await;
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["service"], "test");
        assert!(body["endpoints"]["/api/chatbot"].is_string());
    }
}
