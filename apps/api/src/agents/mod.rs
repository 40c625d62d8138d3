// Autonomous bidding agents
//
// Each AI-controlled team gets an AiBidder with a fixed personality; the
// coordinator listens to auction events and drives their bids.

pub mod bidder;
pub mod coordinator;
pub mod errors;
pub mod registry;
pub mod types;

// Re-export main types
pub use bidder::AiBidder;
pub use coordinator::{AiBiddingCoordinator, CoordinatorHandle};
pub use errors::{AgentError, AgentResult};
pub use registry::BidderRegistry;
pub use types::{bid_increment, BidDecision, CoordinatorConfig};
