// Event distribution
//
// Fans auction domain events out to independent in-process consumers
// (the AI coordinator, live stream clients).

pub mod bus;

pub use bus::{EventBus, Subscription};
