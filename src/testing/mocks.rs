//! Mock intent rules for router tests
//!
//! Lets tests assemble routers with arbitrary rule lists to exercise
//! ordering and fall-through without depending on the stock keyword tables.

use crate::routing::{Intent, IntentRule, NormalizedQuery, RoutingContext, RoutingResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Matches when the query contains `trigger` and always answers with a
/// fixed result
#[derive(Debug, Clone)]
pub struct FixedRule {
    intent: Intent,
    trigger: String,
    result: RoutingResult,
}

impl FixedRule {
    pub fn new(intent: Intent, trigger: &str, result: RoutingResult) -> Self {
        Self {
            intent,
            trigger: trigger.to_lowercase(),
            result,
        }
    }
}

impl IntentRule for FixedRule {
    fn intent(&self) -> Intent {
        self.intent
    }

    fn matches(&self, query: &NormalizedQuery) -> bool {
        query.contains(&self.trigger)
    }

    fn respond(&self, _query: &NormalizedQuery, _ctx: &RoutingContext) -> Option<RoutingResult> {
        Some(self.result.clone())
    }
}

/// Matches on `trigger` but never produces a response
#[derive(Debug, Clone)]
pub struct DecliningRule {
    intent: Intent,
    trigger: String,
}

impl DecliningRule {
    pub fn new(intent: Intent, trigger: &str) -> Self {
        Self {
            intent,
            trigger: trigger.to_lowercase(),
        }
    }
}

impl IntentRule for DecliningRule {
    fn intent(&self) -> Intent {
        self.intent
    }

    fn matches(&self, query: &NormalizedQuery) -> bool {
        query.contains(&self.trigger)
    }

    fn respond(&self, _query: &NormalizedQuery, _ctx: &RoutingContext) -> Option<RoutingResult> {
        None
    }
}

/// Never matches; counts how often it was consulted
#[derive(Debug, Clone, Default)]
pub struct CountingRule {
    pub evaluations: Arc<AtomicUsize>,
}

impl CountingRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::SeqCst)
    }
}

impl IntentRule for CountingRule {
    fn intent(&self) -> Intent {
        Intent::Help
    }

    fn matches(&self, _query: &NormalizedQuery) -> bool {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        false
    }

    fn respond(&self, _query: &NormalizedQuery, _ctx: &RoutingContext) -> Option<RoutingResult> {
        None
    }
}
