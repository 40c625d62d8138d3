use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Domain events published by the auction state machine
///
/// These events represent the observable moments of an auction run.
/// They are used for:
/// - Driving autonomous bidders
/// - Streaming live updates to remote viewers
///
/// # Example
/// ```
/// use auction_api::domain::auction::events::{AuctionEvent, AuctionEventKind};
///
/// let event = AuctionEvent::now(AuctionEventKind::Finished);
/// assert_eq!(event.event_type(), "Finished");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuctionEvent {
    /// When the transition that produced this event happened
    pub occurred_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: AuctionEventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum AuctionEventKind {
    /// Fired once when the auction is started
    Started {
        team_count: usize,
        player_count: usize,
    },
    /// Fired when a player is put up for bidding
    Nominated {
        player_id: Uuid,
        name: String,
        base_price: Decimal,
    },
    /// Fired for every accepted bid
    BidPlaced { team_id: Uuid, amount: Decimal },
    /// Fired when a lot resolves to its highest bidder
    Sold {
        player_id: Uuid,
        team_id: Uuid,
        sold_price: Decimal,
    },
    /// Fired when a lot resolves without any bid
    Unsold { player_id: Uuid },
    /// Fired when the player queue is exhausted
    Finished,
}

impl AuctionEvent {
    pub fn new(kind: AuctionEventKind, occurred_at: DateTime<Utc>) -> Self {
        Self { occurred_at, kind }
    }

    /// Stamps `kind` with the current time
    pub fn now(kind: AuctionEventKind) -> Self {
        Self::new(kind, Utc::now())
    }

    /// Returns the event-type tag used on the wire
    pub fn event_type(&self) -> &'static str {
        match self.kind {
            AuctionEventKind::Started { .. } => "Started",
            AuctionEventKind::Nominated { .. } => "Nominated",
            AuctionEventKind::BidPlaced { .. } => "BidPlaced",
            AuctionEventKind::Sold { .. } => "Sold",
            AuctionEventKind::Unsold { .. } => "Unsold",
            AuctionEventKind::Finished => "Finished",
        }
    }
}
