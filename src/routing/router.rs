//! Intent router
//!
//! Maps a free-text query plus a [`RoutingContext`] to a [`RoutingResult`].
//! The router is a pure function of its inputs: it holds only immutable
//! tables built at construction, does no I/O, and can be shared freely
//! across threads.
//!
//! # Example
//!
//! ```rust
//! use urban_assistant::routing::{IntentRouter, Role, RoutingContext};
//!
//! let router = IntentRouter::default();
//! let ctx = RoutingContext::new(Role::Developer, "city42");
//!
//! let result = router.route(Some("Traffic status"), &ctx);
//! assert_eq!(result.target(), Some("/urban/city42/dashboard"));
//! assert_eq!(result.feature(), Some("traffic-analysis"));
//! ```

use super::catalog::CityCatalog;
use super::context::RoutingContext;
use super::query::NormalizedQuery;
use super::result::RoutingResult;
use super::rules::{help_result, standard_rules, Intent, IntentRule};
use crate::config::AssistantConfig;
use crate::error::AssistantError;
use std::fmt;

/// Result of routing one query, with the intent that produced it.
/// `intent` is `None` when the query was rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOutcome {
    pub intent: Option<Intent>,
    pub result: RoutingResult,
}

/// Ordered rule list with a help fallback
pub struct IntentRouter {
    rules: Vec<Box<dyn IntentRule>>,
}

impl IntentRouter {
    /// Router over the stock rules, built from configured tables and catalog
    pub fn new(config: &AssistantConfig, catalog: &CityCatalog) -> Self {
        Self::with_rules(standard_rules(
            &config.intents,
            &config.destinations,
            catalog,
        ))
    }

    /// Router over the stock rules with the default catalog
    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(config, &CityCatalog::default())
    }

    /// Router over an arbitrary rule list, evaluated in the given order
    pub fn with_rules(rules: Vec<Box<dyn IntentRule>>) -> Self {
        Self { rules }
    }

    /// Intents in evaluation order; help is always implicitly last
    pub fn rule_order(&self) -> Vec<Intent> {
        self.rules.iter().map(|rule| rule.intent()).collect()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Route a query, returning only the wire result
    pub fn route(&self, query: Option<&str>, ctx: &RoutingContext) -> RoutingResult {
        self.resolve(query, ctx).result
    }

    /// Route a query and report which intent answered.
    ///
    /// Missing or blank queries are rejected with a `success: false` result;
    /// this never panics or returns an error.
    pub fn resolve(&self, query: Option<&str>, ctx: &RoutingContext) -> RouteOutcome {
        match query.and_then(NormalizedQuery::parse) {
            Some(normalized) => self.classify(&normalized, ctx),
            None => RouteOutcome {
                intent: None,
                result: RoutingResult::rejected(AssistantError::missing_query().client_message()),
            },
        }
    }

    /// Route an already normalized query
    pub fn classify(&self, query: &NormalizedQuery, ctx: &RoutingContext) -> RouteOutcome {
        for rule in &self.rules {
            if !rule.matches(query) {
                continue;
            }
            if let Some(result) = rule.respond(query, ctx) {
                return RouteOutcome {
                    intent: Some(rule.intent()),
                    result,
                };
            }
        }

        RouteOutcome {
            intent: Some(Intent::Help),
            result: help_result(),
        }
    }
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::from_config(&AssistantConfig::default())
    }
}

impl fmt::Debug for IntentRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentRouter")
            .field("rules", &self.rule_order())
            .finish()
    }
}
