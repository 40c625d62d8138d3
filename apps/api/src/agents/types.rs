use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of one autonomous bidding decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidDecision {
    /// Do nothing this turn (leading, or no lot live)
    Hold,
    /// Drop out of the current lot
    Pass,
    /// Raise to the given amount
    Bid(Decimal),
}

impl BidDecision {
    /// True for decisions that issue a command
    pub fn is_action(&self) -> bool {
        !matches!(self, BidDecision::Hold)
    }
}

/// Tuning for the coordinator's round-robin loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Lower bound of the pause between two agents' actions
    pub min_delay: Duration,
    /// Upper bound of the pause between two agents' actions
    pub max_delay: Duration,
    /// Safety cap on full passes over the agents for one lot
    pub max_round_iterations: usize,
    /// Fixes every random choice when set
    pub seed: Option<u64>,
}

impl CoordinatorConfig {
    /// Configuration without pacing, for deterministic-speed runs
    pub fn immediate(seed: u64) -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            seed: Some(seed),
            ..Self::default()
        }
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(120),
            max_delay: Duration::from_millis(300),
            max_round_iterations: 200,
            seed: None,
        }
    }
}

/// Tiered minimum raise over `current`
///
/// +10 below 200, +25 below 800, +50 from 800 upwards.
pub fn bid_increment(current: Decimal) -> Decimal {
    if current < Decimal::from(200) {
        Decimal::from(10)
    } else if current < Decimal::from(800) {
        Decimal::from(25)
    } else {
        Decimal::from(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bid_increment_tiers() {
        assert_eq!(bid_increment(Decimal::from(0)), Decimal::from(10));
        assert_eq!(bid_increment(Decimal::from(199)), Decimal::from(10));
        assert_eq!(bid_increment(Decimal::from(200)), Decimal::from(25));
        assert_eq!(bid_increment(Decimal::from(799)), Decimal::from(25));
        assert_eq!(bid_increment(Decimal::from(800)), Decimal::from(50));
        assert_eq!(bid_increment(Decimal::from(5000)), Decimal::from(50));
    }

    #[test]
    fn test_hold_is_not_an_action() {
        assert!(!BidDecision::Hold.is_action());
        assert!(BidDecision::Pass.is_action());
        assert!(BidDecision::Bid(Decimal::ONE).is_action());
    }
}
