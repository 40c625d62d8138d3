// Roster adapters
// Implementations of the PlayerRoster port

pub mod json_player_roster;

pub use json_player_roster::JsonPlayerRoster;
