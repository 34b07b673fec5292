//! Budget tracking for MCP sessions.
//!
//! Tracks cumulative spending and call counts against an optional
//! user-set ceiling so AI assistants don't overspend on paid inference.
//! The guard is advisory: it gates calls before they are made but does not
//! prevent concurrent completions from overshooting the ceiling slightly,
//! and the actual charge is authorized by the wallet regardless.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use inferpay_types::{micro_to_usd, usd_to_micro, Amount, MICRO_PER_USD};

use crate::error::{McpError, McpResult};

/// Result of a budget check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetCheck {
    /// Whether a metered call may proceed.
    pub allowed: bool,
    /// Remaining budget in USD; `None` when no limit is set. May be
    /// negative once the ceiling has been overshot.
    pub remaining_usd: Option<f64>,
}

/// Session budget guard.
///
/// `spent` and `calls` only ever increase; there is no refund and no reset
/// short of a process restart. The limit may be changed at any time without
/// affecting what was already recorded.
#[derive(Debug)]
pub struct BudgetGuard {
    /// Optional spending ceiling in micro-USD.
    limit: RwLock<Option<Amount>>,
    /// Cumulative spend in micro-USD.
    spent: AtomicU64,
    /// Number of metered calls recorded.
    calls: AtomicU64,
}

impl BudgetGuard {
    /// Create an unlimited guard.
    pub fn new() -> Self {
        Self {
            limit: RwLock::new(None),
            spent: AtomicU64::new(0),
            calls: AtomicU64::new(0),
        }
    }

    /// Create a guard with an initial spending limit in USD.
    pub fn with_limit(limit_usd: f64) -> McpResult<Self> {
        let guard = Self::new();
        guard.set_limit(limit_usd)?;
        Ok(guard)
    }

    /// Set the spending limit. Fails for non-positive amounts, leaving the
    /// current limit unchanged.
    pub fn set_limit(&self, amount_usd: f64) -> McpResult<()> {
        if !(amount_usd > 0.0) {
            return Err(McpError::InvalidArgument(format!(
                "budget limit must be a positive amount in USD, got {}",
                amount_usd
            )));
        }

        if let Ok(mut limit) = self.limit.write() {
            *limit = Some(usd_to_micro(amount_usd));
        }
        Ok(())
    }

    /// Remove the spending limit. Always succeeds.
    pub fn clear_limit(&self) {
        if let Ok(mut limit) = self.limit.write() {
            *limit = None;
        }
    }

    /// Record the cost of one completed metered call.
    ///
    /// Must be invoked at most once per successfully completed paid call;
    /// idempotency is the caller's responsibility. The increment is a single
    /// synchronous atomic add, so interleaved completions cannot lose
    /// updates.
    pub fn record_spend(&self, cost_usd: f64) {
        self.spent
            .fetch_add(usd_to_micro(cost_usd), Ordering::Relaxed);
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Check whether a metered call may proceed. Pure read, never fails.
    pub fn check(&self) -> BudgetCheck {
        match self.limit() {
            None => BudgetCheck {
                allowed: true,
                remaining_usd: None,
            },
            Some(limit) => {
                let remaining = limit as i128 - self.spent() as i128;
                BudgetCheck {
                    allowed: remaining > 0,
                    remaining_usd: Some(signed_micro_to_usd(remaining)),
                }
            }
        }
    }

    /// The current limit in micro-USD, if set.
    pub fn limit(&self) -> Option<Amount> {
        self.limit.read().ok().and_then(|l| *l)
    }

    /// The current limit in USD, if set.
    pub fn limit_usd(&self) -> Option<f64> {
        self.limit().map(micro_to_usd)
    }

    /// Cumulative spend in micro-USD.
    pub fn spent(&self) -> Amount {
        self.spent.load(Ordering::Relaxed)
    }

    /// Cumulative spend in USD.
    pub fn spent_usd(&self) -> f64 {
        micro_to_usd(self.spent())
    }

    /// Number of metered calls recorded.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Remaining budget in USD; `None` when unlimited, negative when the
    /// ceiling has been overshot.
    pub fn remaining_usd(&self) -> Option<f64> {
        self.limit()
            .map(|limit| signed_micro_to_usd(limit as i128 - self.spent() as i128))
    }
}

impl Default for BudgetGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a signed micro-USD value to USD.
fn signed_micro_to_usd(micro: i128) -> f64 {
    micro as f64 / MICRO_PER_USD as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_new_guard_is_unlimited() {
        let guard = BudgetGuard::new();

        assert_eq!(guard.limit(), None);
        assert_eq!(guard.spent(), 0);
        assert_eq!(guard.calls(), 0);

        let check = guard.check();
        assert!(check.allowed);
        assert_eq!(check.remaining_usd, None);
    }

    #[test]
    fn test_unlimited_always_allowed_regardless_of_spend() {
        let guard = BudgetGuard::new();
        guard.record_spend(100.0);
        guard.record_spend(250.0);

        let check = guard.check();
        assert!(check.allowed);
        assert_eq!(check.remaining_usd, None);
    }

    #[test]
    fn test_record_spend_accumulates() {
        let guard = BudgetGuard::new();

        guard.record_spend(0.002);
        assert_eq!(guard.spent(), 2_000);
        assert_eq!(guard.calls(), 1);

        // Interleaved checks don't disturb the counters
        let _ = guard.check();
        guard.record_spend(0.01);
        let _ = guard.check();
        guard.record_spend(0.05);

        assert_eq!(guard.spent(), 62_000);
        assert_eq!(guard.calls(), 3);
    }

    #[test]
    fn test_under_limit_allowed_with_remaining() {
        let guard = BudgetGuard::with_limit(1.0).unwrap();
        guard.record_spend(0.4);

        let check = guard.check();
        assert!(check.allowed);
        assert!(approx(check.remaining_usd.unwrap(), 0.6));
    }

    #[test]
    fn test_spend_at_or_over_limit_blocks() {
        let guard = BudgetGuard::with_limit(1.0).unwrap();
        guard.record_spend(1.0);

        // remaining == 0 is not allowed
        let check = guard.check();
        assert!(!check.allowed);
        assert!(approx(check.remaining_usd.unwrap(), 0.0));

        guard.record_spend(0.5);
        let check = guard.check();
        assert!(!check.allowed);
        assert!(approx(check.remaining_usd.unwrap(), -0.5));
    }

    #[test]
    fn test_set_limit_rejects_non_positive() {
        let guard = BudgetGuard::with_limit(2.0).unwrap();

        assert!(guard.set_limit(0.0).is_err());
        assert!(guard.set_limit(-5.0).is_err());
        assert!(guard.set_limit(f64::NAN).is_err());

        // Limit unchanged by the failed calls
        assert_eq!(guard.limit(), Some(2_000_000));
    }

    #[test]
    fn test_set_limit_does_not_touch_spent() {
        let guard = BudgetGuard::with_limit(1.0).unwrap();
        guard.record_spend(0.75);

        guard.set_limit(10.0).unwrap();
        assert_eq!(guard.spent(), 750_000);
        assert_eq!(guard.calls(), 1);
        assert!(approx(guard.remaining_usd().unwrap(), 9.25));
    }

    #[test]
    fn test_clear_limit_restores_unlimited() {
        let guard = BudgetGuard::with_limit(0.5).unwrap();
        guard.record_spend(0.5);
        assert!(!guard.check().allowed);

        guard.clear_limit();
        let check = guard.check();
        assert!(check.allowed);
        assert_eq!(check.remaining_usd, None);
    }

    #[test]
    fn test_overshoot_scenario() {
        // Limit 1.00, spends 0.60 / 0.30 / 0.15
        let guard = BudgetGuard::with_limit(1.0).unwrap();

        guard.record_spend(0.60);
        assert!(guard.check().allowed);

        guard.record_spend(0.30);
        assert!(guard.check().allowed);

        guard.record_spend(0.15);
        assert_eq!(guard.spent(), 1_050_000);
        assert_eq!(guard.calls(), 3);

        let check = guard.check();
        assert!(!check.allowed);
        assert!(approx(check.remaining_usd.unwrap(), -0.05));
    }

    #[test]
    fn test_with_limit_rejects_non_positive() {
        assert!(BudgetGuard::with_limit(0.0).is_err());
        assert!(BudgetGuard::with_limit(-1.0).is_err());
    }
}
