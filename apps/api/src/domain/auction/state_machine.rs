use std::collections::{HashMap, HashSet, VecDeque};

use rust_decimal::Decimal;
use uuid::Uuid;

use super::errors::{AuctionError, AuctionResult};
use super::events::{AuctionEvent, AuctionEventKind};
use super::player::Player;
use super::snapshot::AuctionSnapshot;
use super::team::Team;
use super::value_objects::AuctionState;
use crate::events::EventBus;

/// Bidding state for the player currently under the hammer
#[derive(Debug, Clone)]
struct Lot {
    player: Player,
    highest_bid: Option<Decimal>,
    highest_bidder: Option<Uuid>,
    passed: HashSet<Uuid>,
    finalized: bool,
}

impl Lot {
    fn open(player: Player) -> Self {
        Self {
            player,
            highest_bid: None,
            highest_bidder: None,
            passed: HashSet::new(),
            finalized: false,
        }
    }

    /// The leader is the only team that has not passed
    fn only_leader_remaining(&self, team_count: usize) -> bool {
        match self.highest_bidder {
            Some(leader) => {
                self.passed.len() + 1 == team_count && !self.passed.contains(&leader)
            }
            None => false,
        }
    }
}

/// Single source of truth for an auction run
///
/// Owns teams, the FIFO player queue and the live lot. Every accepted command
/// publishes its events on the [`EventBus`] before returning, so subscribers
/// observe events in exactly the order the transitions happened.
///
/// # Invariants
/// - Purse remaining never goes negative
/// - Accepted bids within one lot are strictly increasing
/// - The current leader cannot pass
/// - The passed set is reset only when a new lot opens
/// - `Bidding` implies a live, unfinalized lot
///
/// The machine is synchronous and `&mut self`; concurrent callers go through
/// [`super::service::AuctionService`], which serializes access.
pub struct AuctionStateMachine {
    state: AuctionState,
    teams: Vec<Team>,
    team_index: HashMap<Uuid, usize>,
    queue: VecDeque<Player>,
    lot: Option<Lot>,
    bus: EventBus,
}

impl AuctionStateMachine {
    pub fn new(bus: EventBus) -> Self {
        Self {
            state: AuctionState::NotStarted,
            teams: Vec::new(),
            team_index: HashMap::new(),
            queue: VecDeque::new(),
            lot: None,
            bus,
        }
    }

    pub fn state(&self) -> AuctionState {
        self.state
    }

    /// Starts the auction with the given teams and player queue
    ///
    /// # Business Rules
    /// - Only valid before the auction has started
    /// - At least one team, no duplicate team or player ids
    /// - An empty player queue finishes the auction immediately
    pub fn start(&mut self, teams: Vec<Team>, players: Vec<Player>) -> AuctionResult<()> {
        if self.state != AuctionState::NotStarted {
            return Err(AuctionError::invalid_state(format!(
                "Auction already started (state: {})",
                self.state
            )));
        }

        if teams.is_empty() {
            return Err(AuctionError::invalid_argument(
                "At least one team is required to start the auction",
            ));
        }

        let mut team_index = HashMap::with_capacity(teams.len());
        for (position, team) in teams.iter().enumerate() {
            if team_index.insert(team.id(), position).is_some() {
                return Err(AuctionError::invalid_argument(format!(
                    "Duplicate team id detected: {}",
                    team.id()
                )));
            }
        }

        let mut player_ids = HashSet::with_capacity(players.len());
        for player in &players {
            if !player_ids.insert(player.id()) {
                return Err(AuctionError::invalid_argument(format!(
                    "Duplicate player id detected: {}",
                    player.id()
                )));
            }
        }

        self.teams = teams;
        self.team_index = team_index;
        self.queue = players.into();
        self.lot = None;

        tracing::info!(
            teams = self.teams.len(),
            players = self.queue.len(),
            "auction started"
        );
        self.transition(
            AuctionState::Nomination,
            AuctionEventKind::Started {
                team_count: self.teams.len(),
                player_count: self.queue.len(),
            },
        );

        if self.queue.is_empty() {
            self.finish();
        }

        Ok(())
    }

    /// Opens the next lot, finalizing an unfinalized resolved lot first
    pub fn nominate_next(&mut self) -> AuctionResult<()> {
        match self.state {
            AuctionState::NotStarted => {
                return Err(AuctionError::invalid_state("Auction has not been started"))
            }
            AuctionState::Bidding => {
                return Err(AuctionError::invalid_state(
                    "Cannot nominate next player while bidding is active",
                ))
            }
            AuctionState::Finished => {
                return Err(AuctionError::invalid_state("Auction is already finished"))
            }
            AuctionState::Nomination | AuctionState::Sold | AuctionState::Unsold => {}
        }

        if self.state.is_resolved() && self.lot.as_ref().is_some_and(|lot| !lot.finalized) {
            self.finalize_sale()?;
        }

        let Some(player) = self.queue.pop_front() else {
            self.lot = None;
            self.finish();
            return Ok(());
        };

        tracing::info!(player = %player.id(), name = player.name(), "player nominated");
        let kind = AuctionEventKind::Nominated {
            player_id: player.id(),
            name: player.name().to_string(),
            base_price: player.base_price(),
        };
        self.lot = Some(Lot::open(player));
        self.transition(AuctionState::Bidding, kind);

        Ok(())
    }

    /// Records a bid from `team_id`
    ///
    /// # Business Rules
    /// - Team must be known and must not have passed on this lot
    /// - Amount must be positive, above the current highest bid and within purse
    /// - Resolves the lot immediately when every other team has already passed
    pub fn place_bid(&mut self, team_id: Uuid, amount: Decimal) -> AuctionResult<()> {
        self.ensure_bidding()?;
        let purse = self.team(team_id)?.purse_remaining();
        let team_count = self.teams.len();
        let lot = self.live_lot_mut()?;

        if lot.passed.contains(&team_id) {
            return Err(AuctionError::invalid_state(
                "Team has already passed for the current player",
            ));
        }

        if amount <= Decimal::ZERO {
            return Err(AuctionError::invalid_state(
                "Bid amount must be greater than zero",
            ));
        }

        if let Some(highest) = lot.highest_bid {
            if amount <= highest {
                return Err(AuctionError::invalid_state(format!(
                    "Bid must be strictly higher than the current highest bid of {}",
                    highest
                )));
            }
        }

        if amount > purse {
            return Err(AuctionError::invalid_state(format!(
                "Team does not have enough purse remaining for this bid ({} < {})",
                purse, amount
            )));
        }

        lot.highest_bid = Some(amount);
        lot.highest_bidder = Some(team_id);
        let resolved = lot.only_leader_remaining(team_count);

        tracing::debug!(team = %team_id, %amount, "bid accepted");
        self.publish(AuctionEventKind::BidPlaced { team_id, amount });

        if resolved {
            self.resolve_sold()?;
        }

        Ok(())
    }

    /// Records that `team_id` drops out of the current lot
    ///
    /// Passing twice is a no-op. Resolves the lot to Sold when only the leader
    /// is left, or to Unsold when everyone passed without a bid.
    pub fn pass(&mut self, team_id: Uuid) -> AuctionResult<()> {
        self.ensure_bidding()?;
        self.team(team_id)?;
        let team_count = self.teams.len();
        let lot = self.live_lot_mut()?;

        if lot.highest_bidder == Some(team_id) {
            return Err(AuctionError::invalid_state(
                "Current highest bidder cannot pass",
            ));
        }

        if !lot.passed.insert(team_id) {
            return Ok(());
        }

        tracing::debug!(team = %team_id, passed = lot.passed.len(), "team passed");

        if lot.only_leader_remaining(team_count) {
            return self.resolve_sold();
        }

        if lot.highest_bidder.is_none() && lot.passed.len() == team_count {
            self.resolve_unsold()?;
        }

        Ok(())
    }

    /// Commits the outcome of the current lot into team and player state
    ///
    /// Idempotent once the lot is finalized. A lot still in Bidding is
    /// resolved first: Sold to the leader if there is one, Unsold otherwise.
    pub fn finalize_sale(&mut self) -> AuctionResult<()> {
        if self.state == AuctionState::NotStarted {
            return Err(AuctionError::invalid_state("Auction has not been started"));
        }

        let Some(lot) = self.lot.as_ref() else {
            return Err(AuctionError::invalid_state("No active player to finalize"));
        };

        if lot.finalized {
            return Ok(());
        }

        if self.state == AuctionState::Bidding {
            if lot.highest_bidder.is_some() {
                self.resolve_sold()?;
            } else {
                self.resolve_unsold()?;
            }
        }

        match self.state {
            AuctionState::Sold => self.apply_sold(),
            AuctionState::Unsold => {
                let lot = self.live_lot_mut()?;
                lot.player.mark_unsold();
                lot.finalized = true;
                tracing::info!(player = %lot.player.id(), "lot finalized unsold");
                Ok(())
            }
            other => Err(AuctionError::invalid_state(format!(
                "Current auction state ({}) does not allow sale finalization",
                other
            ))),
        }
    }

    /// Deep copy of the current state
    pub fn snapshot(&self) -> AuctionSnapshot {
        AuctionSnapshot {
            state: self.state,
            teams: self.teams.clone(),
            remaining_players: self.queue.iter().cloned().collect(),
            current_player: self.lot.as_ref().map(|lot| lot.player.clone()),
            current_highest_bid: self.lot.as_ref().and_then(|lot| lot.highest_bid),
            current_highest_bidder_team_id: self.lot.as_ref().and_then(|lot| lot.highest_bidder),
        }
    }

    // ===== Internals =====

    fn apply_sold(&mut self) -> AuctionResult<()> {
        let lot = self
            .lot
            .as_ref()
            .ok_or_else(|| AuctionError::invalid_state("No active player to finalize"))?;
        let (Some(winner), Some(price)) = (lot.highest_bidder, lot.highest_bid) else {
            return Err(AuctionError::invalid_state(
                "Cannot finalize sold player without a highest bid and bidder",
            ));
        };

        let mut player = lot.player.clone();
        player.mark_sold(winner, price);

        let position = *self
            .team_index
            .get(&winner)
            .ok_or_else(|| AuctionError::invalid_state(format!("Unknown team id: {}", winner)))?;
        self.teams[position].acquire(player.clone(), price)?;

        let lot = self.live_lot_mut()?;
        lot.player = player;
        lot.finalized = true;

        tracing::info!(player = %lot.player.id(), team = %winner, %price, "lot finalized sold");
        Ok(())
    }

    fn resolve_sold(&mut self) -> AuctionResult<()> {
        let lot = self.live_lot_mut()?;
        let (Some(team_id), Some(sold_price)) = (lot.highest_bidder, lot.highest_bid) else {
            return Err(AuctionError::invalid_state(
                "Cannot resolve a sale without a highest bid and bidder",
            ));
        };
        let player_id = lot.player.id();

        tracing::info!(player = %player_id, team = %team_id, %sold_price, "player sold");
        self.transition(
            AuctionState::Sold,
            AuctionEventKind::Sold {
                player_id,
                team_id,
                sold_price,
            },
        );
        Ok(())
    }

    fn resolve_unsold(&mut self) -> AuctionResult<()> {
        let player_id = self.live_lot_mut()?.player.id();

        tracing::info!(player = %player_id, "player unsold");
        self.transition(AuctionState::Unsold, AuctionEventKind::Unsold { player_id });
        Ok(())
    }

    fn finish(&mut self) {
        tracing::info!("auction finished");
        self.transition(AuctionState::Finished, AuctionEventKind::Finished);
    }

    fn transition(&mut self, next: AuctionState, kind: AuctionEventKind) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        self.state = next;
        self.publish(kind);
    }

    fn publish(&self, kind: AuctionEventKind) {
        self.bus.publish(AuctionEvent::now(kind));
    }

    fn ensure_bidding(&self) -> AuctionResult<()> {
        if self.state != AuctionState::Bidding {
            return Err(AuctionError::invalid_state(format!(
                "Bidding is not active (state: {})",
                self.state
            )));
        }
        Ok(())
    }

    fn team(&self, team_id: Uuid) -> AuctionResult<&Team> {
        self.team_index
            .get(&team_id)
            .map(|&position| &self.teams[position])
            .ok_or_else(|| AuctionError::invalid_state(format!("Unknown team id: {}", team_id)))
    }

    fn live_lot_mut(&mut self) -> AuctionResult<&mut Lot> {
        self.lot
            .as_mut()
            .ok_or_else(|| AuctionError::invalid_state("No current player is nominated"))
    }
}
