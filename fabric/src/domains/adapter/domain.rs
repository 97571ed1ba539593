use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::collections::{trust, Sequence, Shared};
use crate::resources::{KeyCounter, ResourceCount, ResourceKey};
use crate::storage::Storage;
use crate::transaction::{Transaction, TransactionMode};

/// Slot-indexed primitives of a foreign inventory of unknown implementation
/// quality. Mutating calls participate in the caller's transaction frame by
/// registering undo closures. Implementations are not trusted to follow the
/// contract; the adapter guards against the common failure shapes.
pub trait ForeignInventory {
    fn slots(&self) -> usize;
    fn stack(&self, slot: usize) -> Option<ResourceCount>;
    /// Per-item stacking limit the slot reports for this key.
    fn stack_limit(&self, slot: usize, key: &ResourceKey) -> i64;
    fn insert_slot(
        &mut self,
        slot: usize,
        key: &ResourceKey,
        amount: i64,
        tx: &mut Transaction,
    ) -> i64;
    fn extract_slot(
        &mut self,
        slot: usize,
        key: &ResourceKey,
        amount: i64,
        tx: &mut Transaction,
    ) -> i64;
    fn description(&self) -> String;
}

pub fn share_inventory<T: ForeignInventory + 'static>(
    inventory: T,
) -> Shared<dyn ForeignInventory> {
    let inner: Rc<RefCell<dyn ForeignInventory>> = Rc::new(RefCell::new(inventory));
    Shared::from_rc(inner)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, bincode::Encode, bincode::Decode)]
pub struct AdapterId(pub usize);

/// Bridges a foreign slot-indexed inventory into the storage contract.
pub struct ExternalAdapter {
    pub id: AdapterId,
    pub inventory: Shared<dyn ForeignInventory>,
    pub extractable_only: bool,
}

impl Storage for ExternalAdapter {
    fn insert(&mut self, key: &ResourceKey, amount: i64, mode: TransactionMode) -> i64 {
        self.insert_stacked(key, amount, mode)
    }

    fn extract(&mut self, key: &ResourceKey, amount: i64, mode: TransactionMode) -> i64 {
        self.extract_stacked(key, amount, mode)
    }

    fn enumerate(&mut self, out: &mut KeyCounter) {
        self.enumerate_stacks(out)
    }

    fn description(&self) -> String {
        format!("adapter {} over {}", self.id.0, self.inventory.description())
    }
}

#[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub enum AdapterError {
    AdapterNotFound { id: AdapterId },
}

#[derive(Default)]
pub struct AdapterDomain {
    pub adapters: HashMap<AdapterId, Shared<ExternalAdapter>>,
    pub adapters_id: Sequence,
}

impl AdapterDomain {
    pub fn create_adapter(
        &mut self,
        inventory: Shared<dyn ForeignInventory>,
        extractable_only: bool,
    ) -> Shared<ExternalAdapter> {
        let id = self.adapters_id.one(AdapterId);
        let adapter = Shared::new(ExternalAdapter {
            id,
            inventory,
            extractable_only,
        });
        self.adapters.insert(id, adapter.clone());
        adapter
    }

    pub fn get_adapter(&self, id: AdapterId) -> Result<Shared<ExternalAdapter>, AdapterError> {
        self.adapters
            .get(&id)
            .cloned()
            .ok_or(AdapterError::AdapterNotFound { id })
    }
}

pub struct Slot {
    pub content: Option<ResourceCount>,
    pub capacity: i64,
}

/// Conformant reference inventory: named slots with a per-slot capacity,
/// snapshot-participating in transaction frames.
pub struct SlottedInventory {
    pub name: String,
    pub slots: Vec<Slot>,
}

impl SlottedInventory {
    pub fn new(name: &str, slots: usize, capacity: i64) -> Self {
        let slots = (0..slots)
            .map(|_| Slot {
                content: None,
                capacity,
            })
            .collect();
        Self {
            name: name.to_string(),
            slots,
        }
    }
}

impl ForeignInventory for SlottedInventory {
    fn slots(&self) -> usize {
        self.slots.len()
    }

    fn stack(&self, slot: usize) -> Option<ResourceCount> {
        self.slots.get(slot).and_then(|slot| slot.content.clone())
    }

    fn stack_limit(&self, slot: usize, _key: &ResourceKey) -> i64 {
        self.slots.get(slot).map(|slot| slot.capacity).unwrap_or(0)
    }

    fn insert_slot(
        &mut self,
        index: usize,
        key: &ResourceKey,
        amount: i64,
        tx: &mut Transaction,
    ) -> i64 {
        if amount <= 0 {
            return 0;
        }
        let slot = match self.slots.get(index) {
            Some(slot) => slot,
            None => return 0,
        };
        let accepted = match &slot.content {
            None => amount.min(slot.capacity),
            Some(stack) if stack.key == *key => amount.min(slot.capacity - stack.amount),
            Some(_) => 0,
        }
        .max(0);
        if accepted == 0 {
            return 0;
        }
        let snapshot = slot.content.clone();
        let this = trust(self);
        tx.on_abort(move || {
            this.get_mut_unsafe().slots[index].content = snapshot;
        });
        match &mut self.slots[index].content {
            Some(stack) => stack.amount += accepted,
            content => {
                *content = Some(ResourceCount {
                    key: key.clone(),
                    amount: accepted,
                })
            }
        }
        accepted
    }

    fn extract_slot(
        &mut self,
        index: usize,
        key: &ResourceKey,
        amount: i64,
        tx: &mut Transaction,
    ) -> i64 {
        if amount <= 0 {
            return 0;
        }
        let slot = match self.slots.get(index) {
            Some(slot) => slot,
            None => return 0,
        };
        let removed = match &slot.content {
            Some(stack) if stack.key == *key => amount.min(stack.amount),
            _ => 0,
        };
        if removed == 0 {
            return 0;
        }
        let snapshot = slot.content.clone();
        let this = trust(self);
        tx.on_abort(move || {
            this.get_mut_unsafe().slots[index].content = snapshot;
        });
        let content = &mut self.slots[index].content;
        match content {
            Some(stack) if stack.amount > removed => stack.amount -= removed,
            _ => *content = None,
        }
        removed
    }

    fn description(&self) -> String {
        self.name.clone()
    }
}
