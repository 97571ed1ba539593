use crate::grid::{GridDomain, PinReason, PinnedKey};
use crate::resources::ResourceKey;

impl GridDomain {
    pub fn pin(&mut self, key: ResourceKey, reason: PinReason, tick: u64) {
        if self.pinned.iter().any(|pin| pin.key == key) {
            return;
        }
        self.pinned.push(PinnedKey {
            key,
            reason,
            since: tick,
        });
    }

    pub fn unpin(&mut self, key: &ResourceKey) {
        self.pinned.retain(|pin| pin.key != *key);
    }

    /// Drops crafting pins whose key left the table. Pins placed by a user
    /// stay until the user removes them.
    pub fn prune_pins(&mut self) {
        let entries = &self.entries;
        let serial_by_key = &self.serial_by_key;
        self.pinned.retain(|pin| {
            if pin.reason == PinReason::User {
                return true;
            }
            serial_by_key
                .get(&pin.key)
                .map(|serial| entries.contains_key(serial))
                .unwrap_or(false)
        });
    }
}
