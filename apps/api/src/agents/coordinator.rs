use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::bidder::AiBidder;
use super::errors::{AgentError, AgentResult};
use super::registry::BidderRegistry;
use super::types::{BidDecision, CoordinatorConfig};
use crate::domain::auction::{AuctionEvent, AuctionEventKind, AuctionService};
use crate::events::Subscription;

/// Drives every autonomous team's bids from auction events
///
/// The coordinator runs as a single background task that owns all agent
/// state. Bidding rounds run inline on that task, so at most one round is
/// ever in flight. Events that arrive while a round is running are fed to the
/// agents immediately and queued for reaction once the round returns.
pub struct AiBiddingCoordinator {
    auction: Arc<AuctionService>,
    registry: BidderRegistry,
    config: CoordinatorConfig,
    subscription: Subscription,
    cancel: CancellationToken,
    bidders: HashMap<Uuid, AiBidder>,
    passed: HashSet<Uuid>,
    backlog: VecDeque<AuctionEvent>,
    rng: StdRng,
}

/// Owner's handle on a running coordinator
pub struct CoordinatorHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl CoordinatorHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the coordinator and waits for its task to exit
    ///
    /// Any in-progress round observes the cancellation at its next check
    /// point; the event subscription is released before this returns.
    pub async fn shutdown(self) -> AgentResult<()> {
        self.cancel.cancel();
        self.task.await?;
        Ok(())
    }
}

impl AiBiddingCoordinator {
    /// Subscribes to `auction` and starts the coordinator task
    ///
    /// The subscription is registered before this returns, so every event
    /// published afterwards reaches the coordinator.
    pub fn spawn(
        auction: Arc<AuctionService>,
        registry: BidderRegistry,
        config: CoordinatorConfig,
    ) -> AgentResult<CoordinatorHandle> {
        if config.min_delay > config.max_delay {
            return Err(AgentError::ConfigError(format!(
                "min delay {:?} exceeds max delay {:?}",
                config.min_delay, config.max_delay
            )));
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let cancel = CancellationToken::new();
        let coordinator = Self {
            subscription: auction.subscribe(),
            auction,
            registry,
            config,
            cancel: cancel.clone(),
            bidders: HashMap::new(),
            passed: HashSet::new(),
            backlog: VecDeque::new(),
            rng,
        };

        let task = tokio::spawn(coordinator.run());

        Ok(CoordinatorHandle { cancel, task })
    }

    async fn run(mut self) {
        tracing::info!(subscription = %self.subscription.id(), "AI bidding coordinator started");

        while let Some(event) = self.next_event().await {
            self.react(event).await;
        }

        let Self { subscription, .. } = self;
        let discarded = subscription.unsubscribe();
        tracing::info!(discarded, "AI bidding coordinator stopped");
    }

    /// Next event to react to, or None once cancelled or the bus is gone
    async fn next_event(&mut self) -> Option<AuctionEvent> {
        if self.cancel.is_cancelled() {
            return None;
        }
        if let Some(event) = self.backlog.pop_front() {
            return Some(event);
        }

        let event = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            event = self.subscription.recv() => event,
        }?;
        self.ingest(&event);

        Some(event)
    }

    async fn react(&mut self, event: AuctionEvent) {
        match event.kind {
            AuctionEventKind::Started { .. } => {
                self.create_bidders().await;
                self.passed.clear();
            }
            AuctionEventKind::Nominated { player_id, .. } => {
                self.passed.clear();
                self.run_round(player_id).await;
            }
            AuctionEventKind::Sold { .. } | AuctionEventKind::Unsold { .. } => {
                self.passed.clear();
            }
            AuctionEventKind::BidPlaced { team_id, .. } => {
                // Own bids are already answered by the round that placed them.
                if !self.bidders.contains_key(&team_id) {
                    self.answer_outside_bid(team_id).await;
                }
            }
            AuctionEventKind::Finished => {
                tracing::debug!("auction finished, coordinator idle");
            }
        }
    }

    /// Reopens the round when a human team bids on the live lot
    async fn answer_outside_bid(&mut self, team_id: Uuid) {
        let Some(player_id) = self.auction.snapshot().await.current_player_id() else {
            return;
        };
        tracing::debug!(%team_id, %player_id, "answering outside bid");
        self.run_round(player_id).await;
    }

    /// Feeds an event to every agent as soon as it is received
    fn ingest(&mut self, event: &AuctionEvent) {
        for bidder in self.bidders.values_mut() {
            bidder.observe(event);
        }
    }

    /// Drains events published since the last check without reacting yet
    fn pump(&mut self) {
        while let Some(event) = self.subscription.try_recv() {
            self.ingest(&event);
            self.backlog.push_back(event);
        }
    }

    async fn create_bidders(&mut self) {
        let snapshot = self.auction.snapshot().await;

        self.bidders.clear();
        for team in snapshot.teams.iter().filter(|t| self.registry.is_autonomous(t.id())) {
            let bidder = AiBidder::new(team.id(), team.name(), self.rng.gen());
            tracing::info!(
                team_id = %bidder.team_id(),
                team = %bidder.team_name(),
                aggression = bidder.aggression(),
                "AI bidder ready"
            );
            self.bidders.insert(bidder.team_id(), bidder);
        }
    }

    /// Round-robin over the autonomous teams until the lot settles
    async fn run_round(&mut self, player_id: Uuid) {
        if self.bidders.is_empty() {
            return;
        }

        for iteration in 0..self.config.max_round_iterations {
            if !self.auction.snapshot().await.is_bidding_on(player_id) {
                return;
            }

            let mut order: Vec<Uuid> = self
                .bidders
                .keys()
                .filter(|id| !self.passed.contains(*id))
                .copied()
                .collect();
            order.sort();
            order.shuffle(&mut self.rng);

            let mut acted = false;
            for team_id in order {
                if self.cancel.is_cancelled() {
                    return;
                }
                self.pump();

                let snapshot = self.auction.snapshot().await;
                if !snapshot.is_bidding_on(player_id) {
                    return;
                }
                let (Some(team), Some(bidder)) =
                    (snapshot.team(team_id), self.bidders.get_mut(&team_id))
                else {
                    continue;
                };

                let decision = bidder.decide(team, &snapshot);
                if !decision.is_action() {
                    continue;
                }

                acted = true;
                self.apply(team_id, decision).await;
                if !self.pause().await {
                    return;
                }
            }

            if !acted {
                tracing::debug!(%player_id, iteration, "bidding round settled");
                return;
            }
        }

        tracing::warn!(
            %player_id,
            cap = self.config.max_round_iterations,
            "bidding round hit the iteration cap"
        );
    }

    async fn apply(&mut self, team_id: Uuid, decision: BidDecision) {
        let result = match decision {
            BidDecision::Bid(amount) => self.auction.place_bid(team_id, amount).await,
            BidDecision::Pass => {
                self.passed.insert(team_id);
                self.auction.pass(team_id).await
            }
            BidDecision::Hold => return,
        };

        if let Err(e) = result {
            tracing::debug!(%team_id, ?decision, error = %e, "AI command rejected");
        }
    }

    /// Sleeps a random pacing delay; false when cancelled meanwhile
    async fn pause(&mut self) -> bool {
        let delay = self
            .rng
            .gen_range(self.config.min_delay..=self.config.max_delay);

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }
}
