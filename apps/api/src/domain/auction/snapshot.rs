use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::player::Player;
use super::team::Team;
use super::value_objects::AuctionState;

/// Point-in-time, detached copy of the whole auction
///
/// Nothing in a snapshot aliases the live state machine; holding one never
/// blocks commands and never observes a half-applied mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuctionSnapshot {
    pub state: AuctionState,
    pub teams: Vec<Team>,
    pub remaining_players: Vec<Player>,
    pub current_player: Option<Player>,
    pub current_highest_bid: Option<Decimal>,
    pub current_highest_bidder_team_id: Option<Uuid>,
}

impl AuctionSnapshot {
    pub fn team(&self, team_id: Uuid) -> Option<&Team> {
        self.teams.iter().find(|team| team.id() == team_id)
    }

    pub fn current_player_id(&self) -> Option<Uuid> {
        self.current_player.as_ref().map(Player::id)
    }

    /// True while `player_id` is the live lot and still accepting bids
    pub fn is_bidding_on(&self, player_id: Uuid) -> bool {
        self.state == AuctionState::Bidding && self.current_player_id() == Some(player_id)
    }
}
