use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::types::{bid_increment, BidDecision};
use crate::domain::auction::{
    AuctionEvent, AuctionEventKind, AuctionSnapshot, AuctionState, PlayerRole, Team,
};

const AGGRESSION_RANGE: (f64, f64) = (0.45, 0.90);
const ROLE_WEIGHT_RANGE: (f64, f64) = (0.75, 1.40);
const CONTEST_BOOST_RANGE: (f64, f64) = (1.20, 1.55);
const RIVAL_BID_CONTEST_CHANCE: f64 = 0.18;
const CONTESTED_RAISE_CHANCE: f64 = 0.40;
const INTEREST_SPREAD: f64 = 2.2;

/// Autonomous bidding policy for one team
///
/// Personality (aggression and per-role preference) is drawn once at
/// construction and fixed for the run. A transient "contested" flag makes the
/// bidder willing to go higher and occasionally jump the price; it is rolled
/// on nomination, may flip on when a rival bids, and clears on resolution.
#[derive(Debug, Clone)]
pub struct AiBidder {
    team_id: Uuid,
    team_name: String,
    aggression: f64,
    role_weights: HashMap<PlayerRole, f64>,
    contested: bool,
    rng: StdRng,
}

impl AiBidder {
    /// Create a bidder with a personality derived from `seed`
    pub fn new(team_id: Uuid, team_name: impl Into<String>, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let aggression = draw(&mut rng, AGGRESSION_RANGE);
        let role_weights = PlayerRole::ALL
            .iter()
            .map(|role| (*role, draw(&mut rng, ROLE_WEIGHT_RANGE)))
            .collect();

        Self {
            team_id,
            team_name: team_name.into(),
            aggression,
            role_weights,
            contested: false,
            rng,
        }
    }

    pub fn team_id(&self) -> Uuid {
        self.team_id
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    pub fn aggression(&self) -> f64 {
        self.aggression
    }

    pub fn is_contested(&self) -> bool {
        self.contested
    }

    /// Update the transient contested flag from an auction event
    pub fn observe(&mut self, event: &AuctionEvent) {
        match &event.kind {
            AuctionEventKind::Nominated { .. } => {
                let chance = 0.12 + self.aggression * 0.22;
                self.contested = self.rng.gen_bool(chance);
            }
            AuctionEventKind::BidPlaced { team_id, .. } => {
                if *team_id != self.team_id && self.rng.gen_bool(RIVAL_BID_CONTEST_CHANCE) {
                    self.contested = true;
                }
            }
            AuctionEventKind::Sold { .. } | AuctionEventKind::Unsold { .. } => {
                self.contested = false;
            }
            AuctionEventKind::Started { .. } | AuctionEventKind::Finished => {}
        }
    }

    /// Decide what to do about the live lot
    ///
    /// `team` must be this bidder's team as seen in `snapshot`.
    pub fn decide(&mut self, team: &Team, snapshot: &AuctionSnapshot) -> BidDecision {
        if snapshot.state != AuctionState::Bidding {
            return BidDecision::Hold;
        }
        let Some(player) = snapshot.current_player.as_ref() else {
            return BidDecision::Hold;
        };
        if snapshot.current_highest_bidder_team_id == Some(self.team_id) {
            return BidDecision::Hold;
        }

        let current_highest = snapshot.current_highest_bid;
        let minimum_bid = match current_highest {
            Some(highest) => highest + bid_increment(highest),
            None => player.base_price(),
        };
        let purse = team.purse_remaining();

        if purse < minimum_bid {
            return BidDecision::Pass;
        }

        let role_weight = self.role_weights.get(&player.role()).copied().unwrap_or(1.0);
        let boost = if self.contested {
            draw(&mut self.rng, CONTEST_BOOST_RANGE)
        } else {
            1.0
        };
        let interest = role_weight * self.aggression * boost;
        // Whole units, but never below base so fractional prices can open.
        let interest_cap = (player.base_price() * to_decimal(1.0 + interest * INTEREST_SPREAD))
            .floor()
            .max(player.base_price());
        let ceiling = purse.min(interest_cap);

        let contest_threshold = 0.35 + role_weight * 0.30 + self.aggression * 0.25;
        let contest_roll: f64 = self.rng.gen();
        if !self.contested && contest_roll > contest_threshold {
            return BidDecision::Pass;
        }

        if ceiling < minimum_bid {
            return BidDecision::Pass;
        }

        let mut amount = minimum_bid;
        if self.contested && self.rng.gen_bool(CONTESTED_RAISE_CHANCE) {
            let steps: i64 = self.rng.gen_range(1..=2);
            amount += bid_increment(minimum_bid) * Decimal::from(steps);
        }
        let amount = amount.min(ceiling);

        if current_highest.is_some_and(|highest| amount <= highest) {
            return BidDecision::Pass;
        }

        BidDecision::Bid(amount)
    }
}

fn draw(rng: &mut StdRng, (low, high): (f64, f64)) -> f64 {
    low + rng.gen::<f64>() * (high - low)
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64_retain(value).unwrap_or(Decimal::ONE)
}
