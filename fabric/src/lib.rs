pub use domains::*;

pub mod api;
pub mod collections;
pub mod data;
mod domains;
pub mod transaction;

use std::collections::HashSet;

use log::info;

use crate::adapter::AdapterDomain;
use crate::api::{Action, ActionError, FabricResponse};
use crate::collections::Shared;
use crate::data::Knowledge;
use crate::grid::{GridDomain, PinReason};
use crate::resources::{KeyCounter, ResourceKey, ResourcesError};
use crate::storage::{CompositeStorage, Storage, StorageDomain};
use crate::transaction::TransactionMode;
use crate::tunnel::TunnelDomain;

/// The whole virtual storage network: domain state plus the composite root
/// every viewer request goes through.
pub struct Fabric {
    pub known: Knowledge,
    pub storage: StorageDomain,
    pub adapters: AdapterDomain,
    pub tunnels: TunnelDomain,
    pub grid: GridDomain,
    pub network: CompositeStorage,
    craftable: HashSet<ResourceKey>,
    tick: u64,
}

impl Fabric {
    pub fn new(known: Knowledge) -> Self {
        Self {
            known,
            storage: StorageDomain::default(),
            adapters: AdapterDomain::default(),
            tunnels: TunnelDomain::default(),
            grid: GridDomain::default(),
            network: CompositeStorage::new("network"),
            craftable: HashSet::new(),
            tick: 0,
        }
    }

    pub fn mount(&mut self, endpoint: Shared<dyn Storage>) {
        self.network.mount(endpoint);
    }

    /// Keys the crafting layer currently offers. They show up in the table
    /// even at zero stored amount.
    pub fn set_craftable(&mut self, keys: HashSet<ResourceKey>) {
        self.craftable = keys;
    }

    pub fn perform_action(
        &mut self,
        viewer: &str,
        action_id: usize,
        action: Action,
    ) -> Result<Vec<FabricResponse>, ActionError> {
        let responses = match action {
            Action::Insert { key, amount } => {
                self.validate_key(&key)?;
                let amount = self.network.insert(&key, amount, TransactionMode::Commit);
                vec![FabricResponse::Moved { action_id, amount }]
            }
            Action::Extract { key, amount } => {
                self.validate_key(&key)?;
                let amount = self.network.extract(&key, amount, TransactionMode::Commit);
                vec![FabricResponse::Moved { action_id, amount }]
            }
            Action::Pin { key } => {
                self.validate_key(&key)?;
                self.grid.pin(key, PinReason::User, self.tick);
                vec![FabricResponse::PinnedKeys {
                    keys: self.grid.pinned.clone(),
                }]
            }
            Action::Unpin { key } => {
                self.grid.unpin(&key);
                vec![FabricResponse::PinnedKeys {
                    keys: self.grid.pinned.clone(),
                }]
            }
            Action::SetSearch { text } => {
                info!("Viewer {} searches '{}'", viewer, text);
                vec![]
            }
            Action::SetSort { field, direction } => {
                info!("Viewer {} sorts by {:?} {:?}", viewer, field, direction);
                vec![]
            }
            Action::SetPaused { paused } => {
                info!("Viewer {} paused view: {}", viewer, paused);
                vec![]
            }
        };
        Ok(responses)
    }

    /// Serials a key occupies in the grid. Only kinds that opt into fuzzy
    /// matching widen the lookup to the whole primary-key family.
    pub fn matching_serials(&mut self, key: &ResourceKey) -> Vec<u64> {
        let fuzzy = match self.known.resources.get(key.kind) {
            Ok(kind) => kind.fuzzy,
            Err(_) => false,
        };
        self.grid.candidates(key, fuzzy)
    }

    fn validate_key(&self, key: &ResourceKey) -> Result<(), ResourcesError> {
        self.known
            .resources
            .get(key.kind)
            .map(|_| ())
            .map_err(|_| ResourcesError::KindNotFound { key: key.kind })
    }

    /// One fabric tick: re-enumerates the network, probes what is actually
    /// requestable, folds the result into the grid and broadcasts the delta.
    pub fn update(&mut self) -> Vec<FabricResponse> {
        self.tick += 1;
        let mut stored = KeyCounter::default();
        self.network.enumerate(&mut stored);
        let mut requestable = KeyCounter::default();
        for (key, total) in stored.iter() {
            let probe = self.network.extract(key, total, TransactionMode::Simulate);
            requestable.add(key, probe);
        }
        let update = self
            .grid
            .update_content(&stored, &requestable, &self.craftable);
        self.grid.prune_pins();
        if update.rows.is_empty() {
            vec![]
        } else {
            vec![FabricResponse::GridUpdate { update }]
        }
    }

    /// Everything a freshly connected viewer needs to render.
    pub fn look_around(&mut self) -> Vec<FabricResponse> {
        vec![
            FabricResponse::GridUpdate {
                update: self.grid.snapshot(),
            },
            FabricResponse::PinnedKeys {
                keys: self.grid.pinned.clone(),
            },
        ]
    }
}
