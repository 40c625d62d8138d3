use std::sync::Arc;

use tokio::sync::Mutex;

use crate::agents::BidderRegistry;
use crate::config::AppConfig;
use crate::domain::auction::AuctionService;
use crate::domain::repositories::PlayerRoster;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub auction: Arc<AuctionService>,
    pub registry: BidderRegistry,
    pub roster: Arc<dyn PlayerRoster>,
    pub config: Arc<AppConfig>,
    /// Held across the whole start path so classification and start commit together
    pub(crate) start_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        auction: Arc<AuctionService>,
        registry: BidderRegistry,
        roster: Arc<dyn PlayerRoster>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            auction,
            registry,
            roster,
            config,
            start_lock: Arc::new(Mutex::new(())),
        }
    }
}
