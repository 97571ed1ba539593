use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::collections::{Sequence, Shared};
use crate::resources::{KeyCounter, ResourceKey};
use crate::transaction::TransactionMode;

/// The uniform contract every storage-like endpoint implements: internal
/// cells, mounted external adapters, tunnel ports and delegating views.
///
/// Results are always within `0..=amount`. Returning less than requested is
/// the normal partial-fulfillment outcome, never an error. A `Commit` moves
/// exactly the returned amount; a `Simulate` leaves no persistent effect.
pub trait Storage {
    fn insert(&mut self, key: &ResourceKey, amount: i64, mode: TransactionMode) -> i64;
    fn extract(&mut self, key: &ResourceKey, amount: i64, mode: TransactionMode) -> i64;
    /// Adds every locally available amount into the caller-supplied
    /// accumulator. The accumulator is not assumed to start empty.
    fn enumerate(&mut self, out: &mut KeyCounter);
    fn description(&self) -> String;
}

pub fn share_storage<T: Storage + 'static>(endpoint: T) -> Shared<dyn Storage> {
    let inner: Rc<RefCell<dyn Storage>> = Rc::new(RefCell::new(endpoint));
    Shared::from_rc(inner)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, bincode::Encode, bincode::Decode)]
pub struct CellKey(pub usize);

pub struct CellKind {
    pub id: CellKey,
    pub name: String,
    pub capacity: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, bincode::Encode, bincode::Decode)]
pub struct CellId(pub usize);

pub struct Cell {
    pub id: CellId,
    pub kind: Shared<CellKind>,
    pub content: KeyCounter,
}

/// Delegating aggregate over mounted endpoints, used as the network root.
pub struct CompositeStorage {
    pub name: String,
    pub parts: Vec<Shared<dyn Storage>>,
}

impl CompositeStorage {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parts: vec![],
        }
    }

    pub fn mount(&mut self, endpoint: Shared<dyn Storage>) {
        self.parts.push(endpoint);
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Blink {
    pub count: usize,
}

/// Delegating endpoint that fires a visual blink when a committed transfer
/// actually moved something.
pub struct MonitoredStorage {
    pub inner: Shared<dyn Storage>,
    pub activity: Shared<Blink>,
}

#[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub enum StorageError {
    CellNotFound { id: CellId },
}

#[derive(Default)]
pub struct StorageDomain {
    pub cells: HashMap<CellId, Shared<Cell>>,
    pub cells_id: Sequence,
}

impl StorageDomain {
    pub fn load_cells(&mut self, cells: Vec<Cell>, sequence: usize) {
        self.cells_id.set(sequence);
        for cell in cells {
            self.cells.insert(cell.id, Shared::new(cell));
        }
    }

    pub fn create_cell(&mut self, kind: Shared<CellKind>) -> Shared<Cell> {
        let id = self.cells_id.one(CellId);
        let cell = Shared::new(Cell {
            id,
            kind,
            content: KeyCounter::default(),
        });
        self.cells.insert(id, cell.clone());
        cell
    }

    pub fn get_cell(&self, id: CellId) -> Result<Shared<Cell>, StorageError> {
        self.cells
            .get(&id)
            .cloned()
            .ok_or(StorageError::CellNotFound { id })
    }
}
