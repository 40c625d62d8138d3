use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

/// Records which teams are driven by autonomous bidders
///
/// Teams not registered as autonomous are human-controlled. The registry is
/// cloned into the HTTP layer and the coordinator; clones share state.
#[derive(Debug, Clone, Default)]
pub struct BidderRegistry {
    autonomous: Arc<RwLock<HashSet<Uuid>>>,
}

impl BidderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `team_id` as human-controlled
    pub fn register_human(&self, team_id: Uuid) {
        self.write().remove(&team_id);
    }

    /// Marks `team_id` as driven by an autonomous bidder
    pub fn register_autonomous(&self, team_id: Uuid) {
        self.write().insert(team_id);
    }

    /// Forgets every registration
    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn is_autonomous(&self, team_id: Uuid) -> bool {
        self.read().contains(&team_id)
    }

    pub fn autonomous_team_ids(&self) -> Vec<Uuid> {
        self.read().iter().copied().collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashSet<Uuid>> {
        self.autonomous.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashSet<Uuid>> {
        self.autonomous.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
