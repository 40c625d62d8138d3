// Repository ports
// Interfaces the domain depends on; adapters live in infrastructure

pub mod player_roster;

pub use player_roster::{player_id, PlayerRecord, PlayerRoster, RosterError};
