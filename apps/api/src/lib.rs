//! Player Auction API Library
//!
//! This library provides the core functionality for the player auction
//! service, including the bidding state machine, the event bus, the
//! autonomous bidding agents and the HTTP adapters.

pub mod agents;
pub mod api;
pub mod config;
pub mod domain;
pub mod events;
pub mod infrastructure;
