use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::warn;

use crate::collections::{Dictionary, Sequence, Shared};
use crate::resources::{KindKey, ResourceKey, ResourceKind};
use crate::storage::Storage;
use crate::transaction::Transaction;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
pub struct TunnelKey(pub usize);

pub struct TunnelKind {
    pub id: TunnelKey,
    pub name: String,
    pub tax_per_unit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, bincode::Encode, bincode::Decode)]
pub struct TunnelId(pub usize);

/// Anything that can pay the transfer tax.
pub trait EnergySource {
    fn deduct(&mut self, amount: f64);
    fn stored(&self) -> f64;
}

pub fn share_energy<T: EnergySource + 'static>(source: T) -> Shared<dyn EnergySource> {
    let inner: Rc<RefCell<dyn EnergySource>> = Rc::new(RefCell::new(source));
    Shared::from_rc(inner)
}

pub struct EnergyBuffer {
    pub stored: f64,
}

impl EnergySource for EnergyBuffer {
    fn deduct(&mut self, amount: f64) {
        self.stored = (self.stored - amount).max(0.0);
    }

    fn stored(&self) -> f64 {
        self.stored
    }
}

/// Moves resources from a source storage to a set of output storages,
/// splitting evenly and taxing energy per whole unit actually moved. The
/// taxable unit comes from the resource kind: 1 for items, the granularity
/// for fluids.
pub struct Tunnel {
    pub id: TunnelId,
    pub kind: Shared<TunnelKind>,
    pub resources: Rc<Dictionary<KindKey, ResourceKind>>,
    pub source: Shared<dyn Storage>,
    pub outputs: Vec<Shared<dyn Storage>>,
    pub energy: Shared<dyn EnergySource>,
}

impl Tunnel {
    pub(crate) fn charge(&self, key: &ResourceKey, moved: i64, tx: &mut Transaction) {
        if moved <= 0 {
            return;
        }
        let unit = match self.resources.get(key.kind) {
            Ok(kind) => kind.matter.unit(),
            Err(error) => {
                warn!("Unable to price transfer of {:?}, {:?}", key.kind, error);
                1
            }
        };
        let tax = self.kind.tax_per_unit * moved as f64 / unit as f64;
        let energy = self.energy.to_rc();
        tx.on_commit(move || energy.borrow_mut().deduct(tax));
    }
}

/// Insert-only face of a tunnel, wired into composites like any storage.
pub struct TunnelInput {
    pub tunnel: Shared<Tunnel>,
}

/// Extract-only face of a tunnel.
pub struct TunnelOutput {
    pub tunnel: Shared<Tunnel>,
}

#[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub enum TunnelError {
    TunnelNotFound { id: TunnelId },
}

#[derive(Default)]
pub struct TunnelDomain {
    pub tunnels: HashMap<TunnelId, Shared<Tunnel>>,
    pub tunnels_id: Sequence,
}

impl TunnelDomain {
    pub fn create_tunnel(
        &mut self,
        kind: Shared<TunnelKind>,
        resources: Rc<Dictionary<KindKey, ResourceKind>>,
        source: Shared<dyn Storage>,
        energy: Shared<dyn EnergySource>,
    ) -> Shared<Tunnel> {
        let id = self.tunnels_id.one(TunnelId);
        let tunnel = Shared::new(Tunnel {
            id,
            kind,
            resources,
            source,
            outputs: vec![],
            energy,
        });
        self.tunnels.insert(id, tunnel.clone());
        tunnel
    }

    pub fn connect_output(&mut self, id: TunnelId, output: Shared<dyn Storage>) -> Result<(), TunnelError> {
        let mut tunnel = self.get_tunnel(id)?;
        tunnel.borrow_mut().outputs.push(output);
        Ok(())
    }

    pub fn get_tunnel(&self, id: TunnelId) -> Result<Shared<Tunnel>, TunnelError> {
        self.tunnels
            .get(&id)
            .cloned()
            .ok_or(TunnelError::TunnelNotFound { id })
    }
}
