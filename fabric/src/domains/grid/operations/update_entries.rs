use std::collections::{BTreeSet, HashSet};

use crate::grid::{GridDomain, GridEntry, GridUpdate, GridUpdateRow};
use crate::resources::{KeyCounter, ResourceKey};

impl GridDomain {
    /// Folds the latest network content into the table and returns the rows
    /// that changed. Serials are allocated in key order so repeated runs over
    /// the same content produce the same numbering. A key that leaves the
    /// network keeps its serial and gets one zeroed row; viewers drop the
    /// row on that, so a revival of the same serial carries the key again.
    pub fn update_content(
        &mut self,
        stored: &KeyCounter,
        requestable: &KeyCounter,
        craftable: &HashSet<ResourceKey>,
    ) -> GridUpdate {
        let mut keys: BTreeSet<&ResourceKey> = BTreeSet::new();
        keys.extend(stored.keys());
        keys.extend(requestable.keys());
        keys.extend(craftable.iter());

        let mut rows = vec![];
        let mut live = HashSet::new();
        for key in keys {
            let serial = match self.serial_by_key.get(key) {
                Some(serial) => *serial,
                None => {
                    let serial = self.serials.one(|value| value as u64);
                    self.serial_by_key.insert(key.clone(), serial);
                    self.index_dirty = true;
                    serial
                }
            };
            live.insert(serial);
            let entry = GridEntry {
                serial,
                key: Some(key.clone()),
                stored: stored.get(key),
                requestable: requestable.get(key),
                craftable: craftable.contains(key),
            };
            let changed = match self.entries.get(&serial) {
                Some(known) => {
                    known.stored != entry.stored
                        || known.requestable != entry.requestable
                        || known.craftable != entry.craftable
                }
                None => true,
            };
            if changed {
                let key = if self.keys_sent.insert(serial) {
                    entry.key.clone()
                } else {
                    None
                };
                rows.push(GridUpdateRow {
                    serial,
                    key,
                    stored: entry.stored,
                    requestable: entry.requestable,
                    craftable: entry.craftable,
                });
                self.entries.insert(serial, entry);
            }
        }

        let vanished: Vec<u64> = self
            .entries
            .keys()
            .filter(|serial| !live.contains(serial))
            .copied()
            .collect();
        for serial in vanished {
            self.entries.remove(&serial);
            self.keys_sent.remove(&serial);
            rows.push(GridUpdateRow {
                serial,
                key: None,
                stored: 0,
                requestable: 0,
                craftable: false,
            });
        }

        GridUpdate {
            full_replace: false,
            rows,
        }
    }

    /// Complete state for a freshly connected viewer, keys included.
    pub fn snapshot(&mut self) -> GridUpdate {
        let mut rows: Vec<GridUpdateRow> = self
            .entries
            .values()
            .map(|entry| GridUpdateRow {
                serial: entry.serial,
                key: entry.key.clone(),
                stored: entry.stored,
                requestable: entry.requestable,
                craftable: entry.craftable,
            })
            .collect();
        rows.sort_by_key(|row| row.serial);
        GridUpdate {
            full_replace: true,
            rows,
        }
    }
}
