use crate::grid::GridDomain;
use crate::resources::ResourceKey;

impl GridDomain {
    /// Serials a key occupies in the table. Kinds flagged fuzzy match every
    /// durability and modifier variant sharing the primary kind; everything
    /// else matches the exact key only. The primary-key index is rebuilt
    /// lazily after new keys appear.
    pub fn candidates(&mut self, key: &ResourceKey, fuzzy: bool) -> Vec<u64> {
        if !fuzzy {
            return self.serial_by_key.get(key).copied().into_iter().collect();
        }
        if self.index_dirty {
            self.index.clear();
            for (key, serial) in self.serial_by_key.iter() {
                self.index.entry(key.primary()).or_default().push(*serial);
            }
            for serials in self.index.values_mut() {
                serials.sort_unstable();
            }
            self.index_dirty = false;
        }
        self.index.get(&key.primary()).cloned().unwrap_or_default()
    }
}
