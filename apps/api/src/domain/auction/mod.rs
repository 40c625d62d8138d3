// Auction domain module
// Contains the bidding state machine, its entities, value objects and domain events

pub mod errors;
pub mod events;
pub mod player;
pub mod service;
pub mod snapshot;
pub mod state_machine;
pub mod team;
pub mod value_objects;

// Re-export main types for convenience
pub use errors::{AuctionError, AuctionResult};
pub use events::{AuctionEvent, AuctionEventKind};
pub use player::Player;
pub use service::AuctionService;
pub use snapshot::AuctionSnapshot;
pub use state_machine::AuctionStateMachine;
pub use team::Team;
pub use value_objects::{AuctionState, PlayerRole};
