#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use fabric::collections::{trust, Shared};
use fabric::data::Knowledge;
use fabric::resources::{KeyCounter, ResourceCount, ResourceKey};
use fabric::storage::{Cell, CellId, CellKey, CellKind, Storage};
use fabric::transaction::{Transaction, TransactionMode};

pub fn knowledge() -> Knowledge {
    let text = fs::read_to_string("../assets/knowledge.json").unwrap();
    Knowledge::load(&text).unwrap()
}

pub fn key(knowledge: &Knowledge, name: &str) -> ResourceKey {
    knowledge.key_of(name).unwrap()
}

pub fn cell(id: usize, capacity: i64) -> Shared<Cell> {
    Shared::new(Cell {
        id: CellId(id),
        kind: Shared::new(CellKind {
            id: CellKey(1),
            name: "test-cell".to_string(),
            capacity,
        }),
        content: KeyCounter::default(),
    })
}

pub fn as_storage<T: Storage + 'static>(endpoint: &Shared<T>) -> Shared<dyn Storage> {
    let inner: Rc<RefCell<dyn Storage>> = endpoint.to_rc();
    Shared::from_rc(inner)
}

pub fn stored_in(endpoint: &mut dyn Storage) -> KeyCounter {
    let mut out = KeyCounter::default();
    endpoint.enumerate(&mut out);
    out
}

/// Inventory with one stack and a per-call extraction cap, the shape that
/// forces the simulation heuristic.
pub struct LimitedInventory {
    pub content: Option<ResourceCount>,
    pub per_call: i64,
}

impl fabric::adapter::ForeignInventory for LimitedInventory {
    fn slots(&self) -> usize {
        1
    }

    fn stack(&self, slot: usize) -> Option<ResourceCount> {
        if slot == 0 {
            self.content.clone()
        } else {
            None
        }
    }

    fn stack_limit(&self, _slot: usize, _key: &ResourceKey) -> i64 {
        self.per_call
    }

    fn insert_slot(
        &mut self,
        _slot: usize,
        _key: &ResourceKey,
        _amount: i64,
        _tx: &mut Transaction,
    ) -> i64 {
        0
    }

    fn extract_slot(
        &mut self,
        slot: usize,
        key: &ResourceKey,
        amount: i64,
        tx: &mut Transaction,
    ) -> i64 {
        if slot != 0 {
            return 0;
        }
        let stored = match &self.content {
            Some(stack) if stack.key == *key => stack.amount,
            _ => return 0,
        };
        let removed = amount.min(stored).min(self.per_call);
        if removed <= 0 {
            return 0;
        }
        let snapshot = self.content.clone();
        let this = trust(self);
        tx.on_abort(move || this.get_mut_unsafe().content = snapshot);
        if stored > removed {
            if let Some(stack) = &mut self.content {
                stack.amount -= removed;
            }
        } else {
            self.content = None;
        }
        removed
    }

    fn description(&self) -> String {
        "limited inventory".to_string()
    }
}

/// Misbehaving inventory that claims to remove twice the requested amount.
pub struct DoublingInventory {
    pub content: Option<ResourceCount>,
}

impl fabric::adapter::ForeignInventory for DoublingInventory {
    fn slots(&self) -> usize {
        1
    }

    fn stack(&self, slot: usize) -> Option<ResourceCount> {
        if slot == 0 {
            self.content.clone()
        } else {
            None
        }
    }

    fn stack_limit(&self, _slot: usize, _key: &ResourceKey) -> i64 {
        64
    }

    fn insert_slot(
        &mut self,
        _slot: usize,
        _key: &ResourceKey,
        _amount: i64,
        _tx: &mut Transaction,
    ) -> i64 {
        0
    }

    fn extract_slot(
        &mut self,
        _slot: usize,
        key: &ResourceKey,
        amount: i64,
        tx: &mut Transaction,
    ) -> i64 {
        let stored = match &self.content {
            Some(stack) if stack.key == *key => stack.amount,
            _ => return 0,
        };
        let removed = (amount * 2).min(stored);
        let snapshot = self.content.clone();
        let this = trust(self);
        tx.on_abort(move || this.get_mut_unsafe().content = snapshot);
        if stored > removed {
            if let Some(stack) = &mut self.content {
                stack.amount -= removed;
            }
        } else {
            self.content = None;
        }
        removed
    }

    fn description(&self) -> String {
        "doubling inventory".to_string()
    }
}

/// Misbehaving inventory that claims to accept more than was offered.
pub struct OverAcceptingInventory {
    pub accepted: i64,
}

impl fabric::adapter::ForeignInventory for OverAcceptingInventory {
    fn slots(&self) -> usize {
        1
    }

    fn stack(&self, _slot: usize) -> Option<ResourceCount> {
        None
    }

    fn stack_limit(&self, _slot: usize, _key: &ResourceKey) -> i64 {
        64
    }

    fn insert_slot(
        &mut self,
        _slot: usize,
        _key: &ResourceKey,
        amount: i64,
        _tx: &mut Transaction,
    ) -> i64 {
        self.accepted += amount;
        amount + 100
    }

    fn extract_slot(
        &mut self,
        _slot: usize,
        _key: &ResourceKey,
        _amount: i64,
        _tx: &mut Transaction,
    ) -> i64 {
        0
    }

    fn description(&self) -> String {
        "over-accepting inventory".to_string()
    }
}

/// Shows a stack but never gives anything up.
pub struct PhantomInventory {
    pub content: ResourceCount,
}

impl fabric::adapter::ForeignInventory for PhantomInventory {
    fn slots(&self) -> usize {
        1
    }

    fn stack(&self, slot: usize) -> Option<ResourceCount> {
        if slot == 0 {
            Some(self.content.clone())
        } else {
            None
        }
    }

    fn stack_limit(&self, _slot: usize, _key: &ResourceKey) -> i64 {
        64
    }

    fn insert_slot(
        &mut self,
        _slot: usize,
        _key: &ResourceKey,
        _amount: i64,
        _tx: &mut Transaction,
    ) -> i64 {
        0
    }

    fn extract_slot(
        &mut self,
        _slot: usize,
        _key: &ResourceKey,
        _amount: i64,
        _tx: &mut Transaction,
    ) -> i64 {
        0
    }

    fn description(&self) -> String {
        "phantom inventory".to_string()
    }
}

/// Storage that looks accepting during simulation but refuses every commit.
pub struct SimulateOnlyStorage;

impl Storage for SimulateOnlyStorage {
    fn insert(&mut self, _key: &ResourceKey, amount: i64, mode: TransactionMode) -> i64 {
        if mode.is_commit() {
            0
        } else {
            amount
        }
    }

    fn extract(&mut self, _key: &ResourceKey, _amount: i64, _mode: TransactionMode) -> i64 {
        0
    }

    fn enumerate(&mut self, _out: &mut KeyCounter) {}

    fn description(&self) -> String {
        "simulate-only storage".to_string()
    }
}

/// Storage that gives resources away but never takes anything back.
pub struct NoReturnSource {
    pub content: KeyCounter,
}

impl Storage for NoReturnSource {
    fn insert(&mut self, _key: &ResourceKey, _amount: i64, _mode: TransactionMode) -> i64 {
        0
    }

    fn extract(&mut self, key: &ResourceKey, amount: i64, mode: TransactionMode) -> i64 {
        let removed = amount.min(self.content.get(key)).max(0);
        if removed > 0 && mode.is_commit() {
            self.content.add(key, -removed);
        }
        removed
    }

    fn enumerate(&mut self, out: &mut KeyCounter) {
        for (key, total) in self.content.iter() {
            out.add(key, total);
        }
    }

    fn description(&self) -> String {
        "no-return source".to_string()
    }
}
