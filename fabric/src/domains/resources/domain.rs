use std::collections::HashMap;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
pub struct KindKey(pub usize);

/// The void sentinel of the registry. Resources of this kind have no
/// identity and can never produce a key.
pub const VOID: KindKey = KindKey(0);

/// Closed set of resource families. New families require a new variant and
/// an exhaustive-match sweep, there is no runtime plugging.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Matter {
    Item { stack_limit: i64, max_durability: u32 },
    Fluid { granularity: i64 },
}

impl Matter {
    /// Amount moved by one nominal operation of this family.
    pub fn unit(&self) -> i64 {
        match self {
            Matter::Item { .. } => 1,
            Matter::Fluid { granularity } => *granularity,
        }
    }
}

pub struct ResourceKind {
    pub id: KindKey,
    pub name: String,
    pub matter: Matter,
    pub fuzzy: bool,
    pub craftable: bool,
}

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
pub struct Modifier {
    pub name: String,
    pub value: String,
}

/// Immutable value identity of one distinguishable resource. Modifiers are
/// kept sorted by the construction factories so equality and hashing stay
/// order-independent.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
pub struct ResourceKey {
    pub kind: KindKey,
    pub durability: u32,
    pub modifiers: Vec<Modifier>,
}

impl ResourceKey {
    /// Coarse identity with secondary attributes stripped.
    pub fn primary(&self) -> PrimaryKey {
        PrimaryKey(self.kind)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, bincode::Encode, bincode::Decode,
)]
pub struct PrimaryKey(pub KindKey);

#[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub struct ResourceCount {
    pub key: ResourceKey,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub enum ResourcesError {
    VoidHasNoKey,
    KindNotFound { key: KindKey },
}

/// Accumulator of available amounts by key. An update that leaves a total
/// at or below zero removes the entry entirely.
#[derive(Default, Debug, Clone)]
pub struct KeyCounter {
    totals: HashMap<ResourceKey, i64>,
}

impl KeyCounter {
    pub fn add(&mut self, key: &ResourceKey, amount: i64) {
        let total = self.totals.entry(key.clone()).or_insert(0);
        *total += amount;
        if *total <= 0 {
            self.totals.remove(key);
        }
    }

    pub fn get(&self, key: &ResourceKey) -> i64 {
        self.totals.get(key).copied().unwrap_or(0)
    }

    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.totals.contains_key(key)
    }

    pub fn total(&self) -> i64 {
        self.totals.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceKey, i64)> {
        self.totals.iter().map(|(key, total)| (key, *total))
    }

    pub fn keys(&self) -> impl Iterator<Item = &ResourceKey> {
        self.totals.keys()
    }

    pub fn merge(&mut self, other: &KeyCounter) {
        for (key, total) in other.iter() {
            self.add(key, total);
        }
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}
