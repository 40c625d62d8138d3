use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::auction::{AuctionError, Player, PlayerRole};

/// Raw roster entry as supplied by an external source
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerRecord {
    pub id: u32,
    pub name: String,
    pub role: String,
    pub base_price: Decimal,
}

impl PlayerRecord {
    /// Validates the record and maps it into a domain [`Player`]
    ///
    /// The numeric record id becomes a deterministic player id, so the same
    /// roster always yields the same identities.
    pub fn into_player(self) -> Result<Player, AuctionError> {
        let role: PlayerRole = self
            .role
            .parse()
            .map_err(|e: String| AuctionError::invalid_argument(format!("Player {}: {}", self.id, e)))?;

        Player::new(player_id(self.id), self.name, role, self.base_price)
    }
}

/// Deterministic player identity for a roster record id
pub fn player_id(record_id: u32) -> Uuid {
    Uuid::from_u128(u128::from(record_id))
}

/// Errors raised while loading a roster
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Failed to read roster {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed roster: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] AuctionError),
}

/// Source of the players put up for auction
#[async_trait]
pub trait PlayerRoster: Send + Sync {
    /// Loads the raw roster records in nomination order
    async fn load_records(&self) -> Result<Vec<PlayerRecord>, RosterError>;

    /// Loads and validates the roster into players, in nomination order
    async fn load_players(&self) -> Result<Vec<Player>, RosterError> {
        self.load_records()
            .await?
            .into_iter()
            .map(|record| record.into_player().map_err(RosterError::from))
            .collect()
    }
}
