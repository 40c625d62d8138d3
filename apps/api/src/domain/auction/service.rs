use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::errors::AuctionResult;
use super::player::Player;
use super::snapshot::AuctionSnapshot;
use super::state_machine::AuctionStateMachine;
use super::team::Team;
use crate::events::{EventBus, Subscription};

/// Linearizable command surface over the auction state machine
///
/// Commands take the write lock for exactly the duration of one transition
/// (including event publication); snapshots take the read lock and copy.
/// Callers never hold the lock between calls, so a task may sleep between
/// commands without blocking anyone else.
pub struct AuctionService {
    machine: RwLock<AuctionStateMachine>,
    bus: EventBus,
}

impl AuctionService {
    pub fn new(bus: EventBus) -> Self {
        Self {
            machine: RwLock::new(AuctionStateMachine::new(bus.clone())),
            bus,
        }
    }

    /// Subscribes to the events this auction publishes
    pub fn subscribe(&self) -> Subscription {
        self.bus.subscribe()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub async fn start(&self, teams: Vec<Team>, players: Vec<Player>) -> AuctionResult<()> {
        self.machine.write().await.start(teams, players)
    }

    pub async fn nominate_next(&self) -> AuctionResult<()> {
        self.machine.write().await.nominate_next()
    }

    pub async fn place_bid(&self, team_id: Uuid, amount: Decimal) -> AuctionResult<()> {
        self.machine.write().await.place_bid(team_id, amount)
    }

    pub async fn pass(&self, team_id: Uuid) -> AuctionResult<()> {
        self.machine.write().await.pass(team_id)
    }

    pub async fn finalize_sale(&self) -> AuctionResult<()> {
        self.machine.write().await.finalize_sale()
    }

    pub async fn snapshot(&self) -> AuctionSnapshot {
        self.machine.read().await.snapshot()
    }
}
