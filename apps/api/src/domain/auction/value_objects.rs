use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents the lifecycle state of an auction run
///
/// # State Transitions
/// ```text
/// NotStarted -> Nomination -> Bidding -> Sold   -> Bidding | Finished
///                   |            +---> Unsold -> Bidding | Finished
///                   +---> Finished
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionState {
    /// No auction has been started yet
    #[default]
    NotStarted,
    /// Started, waiting for the first player to be nominated
    Nomination,
    /// A lot is live and accepting bids
    Bidding,
    /// The current lot resolved to its highest bidder
    Sold,
    /// The current lot resolved without any bid
    Unsold,
    /// The player queue is exhausted
    Finished,
}

impl AuctionState {
    /// Checks if a transition from current state to next state is valid
    ///
    /// # Valid Transitions
    /// - NotStarted -> Nomination
    /// - Nomination -> Bidding | Finished
    /// - Bidding -> Sold | Unsold
    /// - Sold -> Bidding | Finished
    /// - Unsold -> Bidding | Finished
    ///
    /// # Example
    /// ```
    /// use auction_api::domain::auction::value_objects::AuctionState;
    ///
    /// assert!(AuctionState::Sold.can_transition_to(AuctionState::Bidding));
    /// assert!(!AuctionState::Bidding.can_transition_to(AuctionState::Finished));
    /// ```
    pub fn can_transition_to(&self, next: AuctionState) -> bool {
        use AuctionState::*;
        matches!(
            (self, next),
            (NotStarted, Nomination)
                | (Nomination, Bidding)
                | (Nomination, Finished)
                | (Bidding, Sold)
                | (Bidding, Unsold)
                | (Sold, Bidding)
                | (Sold, Finished)
                | (Unsold, Bidding)
                | (Unsold, Finished)
        )
    }

    /// Returns true once the current lot has left Bidding
    pub fn is_resolved(&self) -> bool {
        matches!(self, AuctionState::Sold | AuctionState::Unsold)
    }
}

impl fmt::Display for AuctionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuctionState::NotStarted => write!(f, "not_started"),
            AuctionState::Nomination => write!(f, "nomination"),
            AuctionState::Bidding => write!(f, "bidding"),
            AuctionState::Sold => write!(f, "sold"),
            AuctionState::Unsold => write!(f, "unsold"),
            AuctionState::Finished => write!(f, "finished"),
        }
    }
}

/// Playing role of a player, used by autonomous bidders to weight interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerRole {
    Batsman,
    Bowler,
    AllRounder,
    WicketKeeper,
}

impl PlayerRole {
    pub const ALL: [PlayerRole; 4] = [
        PlayerRole::Batsman,
        PlayerRole::Bowler,
        PlayerRole::AllRounder,
        PlayerRole::WicketKeeper,
    ];
}

impl fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerRole::Batsman => write!(f, "Batsman"),
            PlayerRole::Bowler => write!(f, "Bowler"),
            PlayerRole::AllRounder => write!(f, "AllRounder"),
            PlayerRole::WicketKeeper => write!(f, "WicketKeeper"),
        }
    }
}

impl FromStr for PlayerRole {
    type Err = String;

    /// Parses a role name, ignoring case, spaces and hyphens
    /// (`"All-Rounder"`, `"wicket keeper"` and `"BOWLER"` are all accepted).
    fn from_str(role: &str) -> Result<Self, Self::Err> {
        let normalized: String = role
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != ' ')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "batsman" => Ok(PlayerRole::Batsman),
            "bowler" => Ok(PlayerRole::Bowler),
            "allrounder" => Ok(PlayerRole::AllRounder),
            "wicketkeeper" => Ok(PlayerRole::WicketKeeper),
            "" => Err("Player role is required".to_string()),
            _ => Err(format!("Unsupported player role '{}'", role)),
        }
    }
}
