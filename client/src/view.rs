use std::collections::HashSet;

use fabric::api::{SortDirection, SortField};
use fabric::data::Knowledge;
use fabric::grid::{GridEntry, GridUpdate, PinReason, PinnedKey};
use fabric::resources::{Matter, ResourceKey};

use crate::mirror::GridMirror;

pub const PINNED_ROW_WIDTH: usize = 9;

/// One renderable cell of the table. Serial 0 marks a placeholder: either a
/// pinned key with nothing behind it, or a vacated slot held in place while
/// the view is paused.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSlot {
    pub serial: u64,
    pub key: Option<ResourceKey>,
    pub stored: i64,
    pub requestable: i64,
    pub craftable: bool,
    pub pinned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    All,
    StoredOnly,
    CraftableOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatterFilter {
    All,
    Items,
    Fluids,
}

/// What the viewer actually sees: the mirror filtered, sorted and split into
/// a pinned row and the main table. While paused, incoming updates change
/// numbers in place but never rearrange slots.
pub struct GridView {
    pub known: Knowledge,
    pub mirror: GridMirror,
    pinned: Vec<PinnedKey>,
    view: Vec<ViewSlot>,
    pinned_row: Vec<ViewSlot>,
    paused: bool,
    search: String,
    sort_field: SortField,
    sort_direction: SortDirection,
    partition: Option<HashSet<ResourceKey>>,
    display: DisplayMode,
    matter: MatterFilter,
}

impl GridView {
    pub fn new(known: Knowledge) -> Self {
        Self {
            known,
            mirror: GridMirror::default(),
            pinned: vec![],
            view: vec![],
            pinned_row: vec![],
            paused: false,
            search: String::new(),
            sort_field: SortField::Name,
            sort_direction: SortDirection::Ascending,
            partition: None,
            display: DisplayMode::All,
            matter: MatterFilter::All,
        }
    }

    pub fn apply(&mut self, update: &GridUpdate) {
        self.mirror.apply(update);
        if self.paused {
            self.reconcile_paused();
        } else {
            self.rebuild();
        }
    }

    /// Pins come from the server as the authoritative list. Changing them is
    /// an explicit viewer action, so the table rearranges even while paused.
    pub fn set_pinned(&mut self, keys: Vec<PinnedKey>) {
        self.pinned = keys;
        self.rebuild();
    }

    pub fn pin(&mut self, key: ResourceKey, tick: u64) {
        if self.pinned.iter().any(|pin| pin.key == key) {
            return;
        }
        self.pinned.push(PinnedKey {
            key,
            reason: PinReason::User,
            since: tick,
        });
        self.rebuild();
    }

    pub fn unpin(&mut self, key: &ResourceKey) {
        self.pinned.retain(|pin| pin.key != *key);
        self.rebuild();
    }

    pub fn set_search_string(&mut self, text: &str) {
        self.search = text.to_lowercase();
        self.rebuild();
    }

    pub fn set_sort_order(&mut self, field: SortField, direction: SortDirection) {
        self.sort_field = field;
        self.sort_direction = direction;
        self.rebuild();
    }

    pub fn set_display(&mut self, display: DisplayMode) {
        self.display = display;
        self.rebuild();
    }

    pub fn set_matter(&mut self, matter: MatterFilter) {
        self.matter = matter;
        self.rebuild();
    }

    /// Restricts the table to an explicit key set, on top of other filters.
    pub fn set_partition(&mut self, partition: Option<HashSet<ResourceKey>>) {
        self.partition = partition;
        self.rebuild();
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if !paused {
            self.rebuild();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn size(&self) -> usize {
        self.pinned_row.len() + self.view.len()
    }

    /// Pinned row occupies the leading indexes.
    pub fn get(&self, index: usize) -> Option<&ViewSlot> {
        if index < self.pinned_row.len() {
            self.pinned_row.get(index)
        } else {
            self.view.get(index - self.pinned_row.len())
        }
    }

    fn rebuild(&mut self) {
        let mut pins = self.pinned.clone();
        pins.sort_by_key(|pin| pin.since);
        pins.truncate(PINNED_ROW_WIDTH);
        let pinned_keys: HashSet<ResourceKey> = pins.iter().map(|pin| pin.key.clone()).collect();
        self.pinned_row = pins
            .iter()
            .map(|pin| match self.mirror.entry_by_key(&pin.key) {
                Some(entry) => ViewSlot {
                    serial: entry.serial,
                    key: Some(pin.key.clone()),
                    stored: entry.stored,
                    requestable: entry.requestable,
                    craftable: entry.craftable,
                    pinned: true,
                },
                None => ViewSlot {
                    serial: 0,
                    key: Some(pin.key.clone()),
                    stored: 0,
                    requestable: 0,
                    craftable: false,
                    pinned: true,
                },
            })
            .collect();

        let mut view: Vec<ViewSlot> = self
            .mirror
            .entries
            .values()
            .filter_map(|entry| entry.key.as_ref().map(|key| (entry, key)))
            .filter(|(_, key)| !pinned_keys.contains(*key))
            .filter(|(entry, key)| self.matches(entry, key))
            .map(|(entry, key)| ViewSlot {
                serial: entry.serial,
                key: Some(key.clone()),
                stored: entry.stored,
                requestable: entry.requestable,
                craftable: entry.craftable,
                pinned: false,
            })
            .collect();
        self.sort_view(&mut view);
        self.view = view;
    }

    /// Updates every existing slot in place. Vacated slots keep their key as
    /// serial 0 placeholders, fresh entries fill a matching placeholder or
    /// append at the end. No slot changes position.
    fn reconcile_paused(&mut self) {
        let mut placed: HashSet<u64> = HashSet::new();
        for slot in self.pinned_row.iter_mut().chain(self.view.iter_mut()) {
            let found = if slot.serial != 0 {
                self.mirror.entries.get(&slot.serial)
            } else {
                match &slot.key {
                    Some(key) => self.mirror.entry_by_key(key),
                    None => None,
                }
            };
            match found {
                Some(entry) => {
                    slot.serial = entry.serial;
                    slot.stored = entry.stored;
                    slot.requestable = entry.requestable;
                    slot.craftable = entry.craftable;
                    placed.insert(entry.serial);
                }
                None => {
                    slot.serial = 0;
                    slot.stored = 0;
                    slot.requestable = 0;
                    slot.craftable = false;
                }
            }
        }

        let pinned_keys: HashSet<ResourceKey> = self
            .pinned_row
            .iter()
            .filter_map(|slot| slot.key.clone())
            .collect();
        let fresh: Vec<GridEntry> = self
            .mirror
            .entries
            .values()
            .filter(|entry| !placed.contains(&entry.serial))
            .cloned()
            .collect();
        for entry in fresh {
            let key = match entry.key.clone() {
                Some(key) => key,
                None => continue,
            };
            if pinned_keys.contains(&key) || !self.matches(&entry, &key) {
                continue;
            }
            let slot = ViewSlot {
                serial: entry.serial,
                key: Some(key.clone()),
                stored: entry.stored,
                requestable: entry.requestable,
                craftable: entry.craftable,
                pinned: false,
            };
            let vacant = self
                .view
                .iter_mut()
                .find(|vacant| vacant.serial == 0 && vacant.key.as_ref() == Some(&key));
            match vacant {
                Some(vacant) => *vacant = slot,
                None => self.view.push(slot),
            }
        }
    }

    fn matches(&self, entry: &GridEntry, key: &ResourceKey) -> bool {
        if let Some(partition) = &self.partition {
            if !partition.contains(key) {
                return false;
            }
        }
        match self.display {
            DisplayMode::All => {}
            DisplayMode::StoredOnly => {
                if entry.stored <= 0 {
                    return false;
                }
            }
            DisplayMode::CraftableOnly => {
                if !entry.craftable {
                    return false;
                }
            }
        }
        let kind = self.known.resources.get(key.kind).ok();
        if self.matter != MatterFilter::All {
            let matter = match &kind {
                Some(kind) => kind.matter,
                None => return false,
            };
            let fits = match (self.matter, matter) {
                (MatterFilter::Items, Matter::Item { .. }) => true,
                (MatterFilter::Fluids, Matter::Fluid { .. }) => true,
                _ => false,
            };
            if !fits {
                return false;
            }
        }
        if !self.search.is_empty() {
            let name = match &kind {
                Some(kind) => kind.name.to_lowercase(),
                None => return false,
            };
            if !name.contains(&self.search) {
                return false;
            }
        }
        true
    }

    fn name_of(&self, slot: &ViewSlot) -> String {
        slot.key
            .as_ref()
            .and_then(|key| self.known.resources.get(key.kind).ok())
            .map(|kind| kind.name.clone())
            .unwrap_or_default()
    }

    fn sort_view(&self, view: &mut [ViewSlot]) {
        view.sort_by(|a, b| {
            let ordering = match self.sort_field {
                SortField::Name => self.name_of(a).cmp(&self.name_of(b)),
                SortField::Amount => a.stored.cmp(&b.stored),
            };
            let ordering = ordering.then_with(|| a.key.cmp(&b.key));
            match self.sort_direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
}
