use std::collections::HashMap;

use fabric::grid::{GridEntry, GridUpdate};
use fabric::resources::ResourceKey;
use log::debug;

/// Client-side replica of the server grid, keyed by serial. Keys arrive once
/// per serial; later rows carry only the numbers. Only meaningful rows are
/// retained, a row that drops to zero on every count leaves the mirror.
#[derive(Default)]
pub struct GridMirror {
    pub entries: HashMap<u64, GridEntry>,
}

impl GridMirror {
    pub fn apply(&mut self, update: &GridUpdate) {
        if update.full_replace {
            self.entries.clear();
        }
        for row in &update.rows {
            if let Some(entry) = self.entries.get_mut(&row.serial) {
                entry.stored = row.stored;
                entry.requestable = row.requestable;
                entry.craftable = row.craftable;
                if let Some(key) = &row.key {
                    entry.key = Some(key.clone());
                }
                if !entry.meaningful() {
                    self.entries.remove(&row.serial);
                }
                continue;
            }
            // the key reveal was lost, a later full replace recovers it
            if row.key.is_none() {
                debug!("Unable to apply row {}, key unknown", row.serial);
                continue;
            }
            let entry = GridEntry {
                serial: row.serial,
                key: row.key.clone(),
                stored: row.stored,
                requestable: row.requestable,
                craftable: row.craftable,
            };
            if entry.meaningful() {
                self.entries.insert(row.serial, entry);
            }
        }
    }

    pub fn entry_by_key(&self, key: &ResourceKey) -> Option<&GridEntry> {
        self.entries
            .values()
            .find(|entry| entry.key.as_ref() == Some(key))
    }
}
