//! Short-lived fall damage immunity grants.

use scc::HashMap;
use uuid::Uuid;

/// Per-player grant timestamps, in milliseconds since the Unix epoch.
///
/// A player has at most one grant; granting again overwrites it. Grants never
/// expire on their own: [`InvulnerabilityTable::is_protected`] compares the
/// age at read time, and only [`InvulnerabilityTable::revoke`] removes them.
pub struct InvulnerabilityTable {
    grants: HashMap<Uuid, u64>,
}

impl InvulnerabilityTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grants: HashMap::new(),
        }
    }

    /// Records a grant for `player` at `now`, replacing any earlier one.
    pub fn grant(&self, player: Uuid, now: u64) {
        loop {
            if self
                .grants
                .update_sync(&player, |_, granted_at| *granted_at = now)
                .is_some()
            {
                return;
            }
            if self.grants.insert_sync(player, now).is_ok() {
                return;
            }
        }
    }

    /// When `player` was last granted immunity, if ever.
    #[must_use]
    pub fn granted_at(&self, player: &Uuid) -> Option<u64> {
        self.grants.read_sync(player, |_, granted_at| *granted_at)
    }

    /// Whether `player` holds a grant no older than `window` milliseconds.
    ///
    /// A grant stamped after `now` counts as brand new.
    #[must_use]
    pub fn is_protected(&self, player: &Uuid, now: u64, window: u64) -> bool {
        self.granted_at(player)
            .is_some_and(|granted_at| now.saturating_sub(granted_at) <= window)
    }

    /// Removes the grant for `player`. Returns true if there was one.
    pub fn revoke(&self, player: &Uuid) -> bool {
        self.grants.remove_sync(player).is_some()
    }

    /// Number of stored grants, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Returns true if no grants are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Drops every grant.
    pub fn clear(&self) {
        self.grants.clear_sync();
    }
}

impl Default for InvulnerabilityTable {
    fn default() -> Self {
        Self::new()
    }
}
