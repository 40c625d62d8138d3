use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::errors::{AuctionError, AuctionResult};
use super::player::Player;

/// A bidding team
///
/// # Invariants
/// - Name cannot be blank
/// - Purse remaining is never negative
/// - Squad keeps players in the order they were won
///
/// Copies handed out in snapshots are detached from the live auction;
/// only the state machine mutates its own team values.
///
/// # Example
/// ```
/// use auction_api::domain::auction::Team;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let team = Team::new(Uuid::new_v4(), "Chargers", Decimal::from(1000)).expect("valid team");
/// assert_eq!(team.purse_remaining(), Decimal::from(1000));
/// assert!(team.squad().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Team {
    id: Uuid,
    name: String,
    purse_remaining: Decimal,
    squad: Vec<Player>,
}

impl Team {
    /// Creates a team with an empty squad
    ///
    /// # Returns
    /// * `Ok(Team)` - New team
    /// * `Err(AuctionError::InvalidArgument)` - Blank name or negative purse
    pub fn new(id: Uuid, name: impl Into<String>, purse: Decimal) -> AuctionResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AuctionError::invalid_argument("Team name cannot be empty"));
        }

        if purse < Decimal::ZERO {
            return Err(AuctionError::invalid_argument(format!(
                "Team {} purse cannot be negative",
                id
            )));
        }

        Ok(Self {
            id,
            name: name.trim().to_string(),
            purse_remaining: purse,
            squad: Vec::new(),
        })
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn purse_remaining(&self) -> Decimal {
        self.purse_remaining
    }

    /// Players won so far, in purchase order
    pub fn squad(&self) -> &[Player] {
        &self.squad
    }

    /// Returns true if the team could pay `amount` right now
    pub fn can_afford(&self, amount: Decimal) -> bool {
        self.purse_remaining >= amount
    }

    // ===== Mutation (state machine only) =====

    /// Debits the purse and appends the purchased player to the squad
    pub(crate) fn acquire(&mut self, player: Player, price: Decimal) -> AuctionResult<()> {
        if !self.can_afford(price) {
            return Err(AuctionError::invalid_state(format!(
                "Insufficient purse at finalize: team {} has {}, owes {}",
                self.id, self.purse_remaining, price
            )));
        }

        self.purse_remaining -= price;
        self.squad.push(player);
        Ok(())
    }
}
