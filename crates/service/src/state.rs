//! Shared Application State
//!
//! The prover is immutable after startup; only the request counters change.

use council_whitelist::MembershipProver;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    /// Whitelist built once at startup
    prover: MembershipProver,
    /// Membership checks served
    checks: AtomicU64,
    /// Checks that returned `true`
    granted: AtomicU64,
    /// Service start time
    start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state around a ready prover
    #[must_use]
    pub fn new(prover: MembershipProver) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                prover,
                checks: AtomicU64::new(0),
                granted: AtomicU64::new(0),
                start_time: std::time::Instant::now(),
            }),
        }
    }

    #[must_use]
    pub fn prover(&self) -> &MembershipProver {
        &self.inner.prover
    }

    /// Run a membership check and record its outcome
    pub fn check(&self, identity: &str) -> bool {
        let is_member = self.inner.prover.is_member(identity);

        self.inner.checks.fetch_add(1, Ordering::Relaxed);
        if is_member {
            self.inner.granted.fetch_add(1, Ordering::Relaxed);
        }
        let result = if is_member { "member" } else { "non_member" };
        metrics::counter!("whitelist_checks_total", "result" => result).increment(1);

        is_member
    }

    /// Get uptime in seconds
    #[must_use]
    pub fn uptime_secs(&self) -> u64 {
        self.inner.start_time.elapsed().as_secs()
    }

    /// Snapshot of the request counters
    #[must_use]
    pub fn check_counts(&self) -> CheckCounts {
        let total = self.inner.checks.load(Ordering::Relaxed);
        let granted = self.inner.granted.load(Ordering::Relaxed);
        CheckCounts {
            total,
            granted,
            denied: total.saturating_sub(granted),
        }
    }
}

/// Counts of membership checks by outcome
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckCounts {
    pub total: u64,
    pub granted: u64,
    pub denied: u64,
}
