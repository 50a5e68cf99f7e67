//! Thread-safe metrics collection system
//!
//! Atomic counters for query throughput plus mutex-protected collections
//! for latency samples and per-intent counts. Nothing here feeds back into
//! routing decisions.

use crate::routing::Intent;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Latency samples kept for percentile calculation
const MAX_LATENCY_SAMPLES: usize = 1000;

/// Global metrics collector instance
pub static METRICS: Lazy<MetricsCollector> = Lazy::new(MetricsCollector::new);

/// Get reference to global metrics collector
pub fn metrics() -> &'static MetricsCollector {
    &METRICS
}

/// Thread-safe metrics collector using atomics and mutexes
pub struct MetricsCollector {
    queries_received: AtomicU64,
    queries_routed: AtomicU64,
    queries_rejected: AtomicU64,
    malformed_requests: AtomicU64,

    // Routing latency in microseconds
    routing_times: Mutex<Vec<u64>>,
    intent_counts: Mutex<BTreeMap<Intent, u64>>,

    server_state: Mutex<String>,
    uptime_start: AtomicU64,
    state_transitions: AtomicU64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            queries_received: AtomicU64::new(0),
            queries_routed: AtomicU64::new(0),
            queries_rejected: AtomicU64::new(0),
            malformed_requests: AtomicU64::new(0),
            routing_times: Mutex::new(Vec::new()),
            intent_counts: Mutex::new(BTreeMap::new()),
            server_state: Mutex::new("initializing".to_string()),
            uptime_start: AtomicU64::new(current_timestamp()),
            state_transitions: AtomicU64::new(0),
        }
    }

    pub fn query_received(&self) {
        self.queries_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn query_routed(&self, intent: Intent, duration: Duration) {
        self.queries_routed.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut counts) = self.intent_counts.lock() {
            *counts.entry(intent).or_insert(0) += 1;
        }

        self.record_routing_time(duration);
    }

    pub fn query_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn malformed_request(&self) {
        self.malformed_requests.fetch_add(1, Ordering::Relaxed);
    }

    fn record_routing_time(&self, duration: Duration) {
        if let Ok(mut times) = self.routing_times.lock() {
            times.push(duration.as_micros() as u64);

            if times.len() > MAX_LATENCY_SAMPLES {
                times.remove(0);
            }
        }
    }

    pub fn set_server_state(&self, state: &str) {
        if let Ok(mut current_state) = self.server_state.lock() {
            if *current_state != state {
                self.state_transitions.fetch_add(1, Ordering::Relaxed);
                *current_state = state.to_string();
            }
        }
    }

    pub fn server_state(&self) -> String {
        self.server_state
            .lock()
            .map(|s| s.clone())
            .unwrap_or_else(|_| "unknown".to_string())
    }

    pub fn uptime_seconds(&self) -> u64 {
        current_timestamp().saturating_sub(self.uptime_start.load(Ordering::Relaxed))
    }

    // Reset all metrics (useful for testing)
    pub fn reset(&self) {
        self.queries_received.store(0, Ordering::Relaxed);
        self.queries_routed.store(0, Ordering::Relaxed);
        self.queries_rejected.store(0, Ordering::Relaxed);
        self.malformed_requests.store(0, Ordering::Relaxed);
        self.state_transitions.store(0, Ordering::Relaxed);
        self.uptime_start
            .store(current_timestamp(), Ordering::Relaxed);

        if let Ok(mut times) = self.routing_times.lock() {
            times.clear();
        }
        if let Ok(mut counts) = self.intent_counts.lock() {
            counts.clear();
        }
        if let Ok(mut state) = self.server_state.lock() {
            *state = "initializing".to_string();
        }
    }

    /// Average and p50/p95/p99 routing latency in microseconds
    fn calculate_routing_time_statistics(&self) -> (f64, f64, f64, f64) {
        let Ok(times) = self.routing_times.lock() else {
            return (0.0, 0.0, 0.0, 0.0);
        };
        if times.is_empty() {
            return (0.0, 0.0, 0.0, 0.0);
        }

        let mut sorted_times = times.clone();
        sorted_times.sort_unstable();

        let avg = sorted_times.iter().sum::<u64>() as f64 / sorted_times.len() as f64;
        (
            avg,
            percentile(&sorted_times, 50.0),
            percentile(&sorted_times, 95.0),
            percentile(&sorted_times, 99.0),
        )
    }

    fn intent_snapshot(&self) -> BTreeMap<String, u64> {
        self.intent_counts
            .lock()
            .map(|counts| {
                counts
                    .iter()
                    .map(|(intent, count)| (intent.as_str().to_string(), *count))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get complete metrics snapshot
    pub fn get_metrics(&self) -> MetricsSnapshot {
        let (avg_routing_time_us, p50, p95, p99) = self.calculate_routing_time_statistics();

        MetricsSnapshot {
            queries: QueryMetrics {
                received: self.queries_received.load(Ordering::Relaxed),
                routed: self.queries_routed.load(Ordering::Relaxed),
                rejected: self.queries_rejected.load(Ordering::Relaxed),
                malformed: self.malformed_requests.load(Ordering::Relaxed),
                avg_routing_time_us,
                routing_time_p50_us: p50,
                routing_time_p95_us: p95,
                routing_time_p99_us: p99,
            },
            intents: self.intent_snapshot(),
            lifecycle: LifecycleMetrics {
                current_state: self.server_state(),
                uptime_seconds: self.uptime_seconds(),
                state_transitions: self.state_transitions.load(Ordering::Relaxed),
            },
            timestamp: current_timestamp(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

// Public metrics structures
#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub queries: QueryMetrics,
    /// Routed query count per intent label
    pub intents: BTreeMap<String, u64>,
    pub lifecycle: LifecycleMetrics,
    pub timestamp: u64,
}

#[derive(Debug, Serialize)]
pub struct QueryMetrics {
    pub received: u64,
    pub routed: u64,
    pub rejected: u64,
    pub malformed: u64,
    pub avg_routing_time_us: f64,
    pub routing_time_p50_us: f64,
    pub routing_time_p95_us: f64,
    pub routing_time_p99_us: f64,
}

#[derive(Debug, Serialize)]
pub struct LifecycleMetrics {
    pub current_state: String,
    pub uptime_seconds: u64,
    pub state_transitions: u64,
}

pub(crate) fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn percentile(sorted_data: &[u64], percentile: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }

    let len = sorted_data.len();
    let index = (percentile / 100.0) * (len - 1) as f64;

    if index.fract() == 0.0 {
        sorted_data[index as usize] as f64
    } else {
        let lower_value = sorted_data[index.floor() as usize] as f64;
        let upper_value = sorted_data[index.ceil() as usize] as f64;

        lower_value + (upper_value - lower_value) * index.fract()
    }
}
