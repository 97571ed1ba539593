use std::collections::{HashMap, HashSet};

use crate::collections::Sequence;
use crate::resources::{PrimaryKey, ResourceKey};

/// One row of the resource table, identified by a serial that never changes
/// for a given key within a session.
#[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub struct GridEntry {
    pub serial: u64,
    pub key: Option<ResourceKey>,
    pub stored: i64,
    pub requestable: i64,
    pub craftable: bool,
}

impl GridEntry {
    pub fn meaningful(&self) -> bool {
        self.stored > 0 || self.requestable > 0 || self.craftable
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub enum PinReason {
    User,
    Crafting,
}

#[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub struct PinnedKey {
    pub key: ResourceKey,
    pub reason: PinReason,
    pub since: u64,
}

/// Wire delta of the table. After the first row that mentions a serial the
/// key payload is omitted from later rows to keep updates small.
#[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub struct GridUpdate {
    pub full_replace: bool,
    pub rows: Vec<GridUpdateRow>,
}

#[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub struct GridUpdateRow {
    pub serial: u64,
    pub key: Option<ResourceKey>,
    pub stored: i64,
    pub requestable: i64,
    pub craftable: bool,
}

#[derive(Default)]
pub struct GridDomain {
    pub entries: HashMap<u64, GridEntry>,
    pub serial_by_key: HashMap<ResourceKey, u64>,
    pub serials: Sequence,
    pub keys_sent: HashSet<u64>,
    pub pinned: Vec<PinnedKey>,
    pub(crate) index: HashMap<PrimaryKey, Vec<u64>>,
    pub(crate) index_dirty: bool,
}
