use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::errors::{AuctionError, AuctionResult};
use super::value_objects::PlayerRole;

/// A player offered for sale
///
/// # Invariants
/// - Name cannot be blank
/// - Base price is strictly positive
/// - Sold price and buyer are set together, and only by sale finalization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    id: Uuid,
    name: String,
    role: PlayerRole,
    base_price: Decimal,
    sold_price: Option<Decimal>,
    sold_to_team_id: Option<Uuid>,
}

impl Player {
    /// Creates an unsold player
    ///
    /// # Returns
    /// * `Ok(Player)` - New player
    /// * `Err(AuctionError::InvalidArgument)` - Blank name or non-positive base price
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        role: PlayerRole,
        base_price: Decimal,
    ) -> AuctionResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AuctionError::invalid_argument(format!(
                "Player name is required for player id {}",
                id
            )));
        }

        if base_price <= Decimal::ZERO {
            return Err(AuctionError::invalid_argument(format!(
                "Base price must be greater than zero for player id {}",
                id
            )));
        }

        Ok(Self {
            id,
            name: name.trim().to_string(),
            role,
            base_price,
            sold_price: None,
            sold_to_team_id: None,
        })
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> PlayerRole {
        self.role
    }

    pub fn base_price(&self) -> Decimal {
        self.base_price
    }

    pub fn sold_price(&self) -> Option<Decimal> {
        self.sold_price
    }

    pub fn sold_to_team_id(&self) -> Option<Uuid> {
        self.sold_to_team_id
    }

    pub fn is_sold(&self) -> bool {
        self.sold_to_team_id.is_some()
    }

    // ===== Mutation (state machine only) =====

    pub(crate) fn mark_sold(&mut self, team_id: Uuid, price: Decimal) {
        self.sold_price = Some(price);
        self.sold_to_team_id = Some(team_id);
    }

    pub(crate) fn mark_unsold(&mut self) {
        self.sold_price = None;
        self.sold_to_team_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_player_with_valid_price() {
        let id = Uuid::new_v4();
        let player = Player::new(id, " Opener ", PlayerRole::Batsman, Decimal::from(20)).unwrap();

        assert_eq!(player.id(), id);
        assert_eq!(player.name(), "Opener");
        assert_eq!(player.role(), PlayerRole::Batsman);
        assert_eq!(player.base_price(), Decimal::from(20));
        assert!(!player.is_sold());
        assert!(player.sold_price().is_none());
    }

    #[test]
    fn create_player_with_zero_price_fails() {
        let result = Player::new(Uuid::new_v4(), "Free", PlayerRole::Bowler, Decimal::ZERO);

        assert!(matches!(result, Err(AuctionError::InvalidArgument(_))));
    }

    #[test]
    fn create_player_with_blank_name_fails() {
        let result = Player::new(Uuid::new_v4(), "", PlayerRole::Bowler, Decimal::ONE);

        assert!(matches!(result, Err(AuctionError::InvalidArgument(_))));
    }

    #[test]
    fn mark_sold_then_unsold_clears_both_fields() {
        let mut player =
            Player::new(Uuid::new_v4(), "Keeper", PlayerRole::WicketKeeper, Decimal::ONE).unwrap();
        let team_id = Uuid::new_v4();

        player.mark_sold(team_id, Decimal::from(7));
        assert_eq!(player.sold_to_team_id(), Some(team_id));
        assert_eq!(player.sold_price(), Some(Decimal::from(7)));

        player.mark_unsold();
        assert!(player.sold_to_team_id().is_none());
        assert!(player.sold_price().is_none());
    }
}
