//! Urban Assistant
//!
//! Intent router and chat endpoint for an urban intelligence dashboard.
//!
//! # Overview
//!
//! A free-text query, the caller's role and a city scope go in; a message
//! plus an optional navigation or info directive comes out. The crate
//! provides:
//! - A pure, priority-ordered intent router with injectable keyword and
//!   destination tables
//! - A chat service that decodes requests, applies defaults and records
//!   metrics
//! - A warp HTTP server with health, readiness and metrics endpoints
//! - TOML configuration and structured logging
//!
//! # Quick Start
//!
//! ```rust
//! use urban_assistant::routing::{IntentRouter, Role, RoutingContext};
//!
//! let router = IntentRouter::default();
//! let ctx = RoutingContext::new(Role::User, "demo-city");
//!
//! let result = router.route(Some("Find apartments near Area Y"), &ctx);
//! assert!(result.success);
//! assert_eq!(result.target(), Some("/urban/demo-city/living"));
//!
//! let json = serde_json::to_value(&result).unwrap();
//! assert_eq!(json["action"], "navigate");
//! assert_eq!(json["filterParams"]["area"], "area-y");
//! ```

pub mod config;
pub mod error;
pub mod observability;
pub mod routing;
pub mod service;
pub mod testing;
pub mod transport;

pub use config::{AssistantConfig, ConfigError};
pub use error::{AssistantError, AssistantResult};
pub use routing::{IntentRouter, Role, RoutingContext, RoutingResult};
pub use service::{ChatReply, ChatRequest, ChatService};
pub use transport::HttpServer;
