use log::warn;

use crate::resources::ResourceKey;
use crate::storage::Storage;
use crate::transaction::{Transaction, TransactionMode};
use crate::tunnel::Tunnel;

impl Tunnel {
    /// Pulls from the source storage through the tunnel, taxed like any
    /// other transfer.
    pub fn draw(&mut self, key: &ResourceKey, amount: i64, mode: TransactionMode) -> i64 {
        if amount <= 0 {
            return 0;
        }
        let mut tx = Transaction::default();
        let frame = tx.open();
        let removed = self.source.borrow_mut().extract(key, amount, mode);
        self.charge(key, removed, &mut tx);
        tx.close(frame, mode);
        removed
    }

    /// One full transfer cycle: plan with a simulation, take the planned
    /// amount from the source, distribute it, and put any excess back.
    pub fn pump(&mut self, key: &ResourceKey, amount: i64) -> i64 {
        if amount <= 0 {
            return 0;
        }
        let available = self
            .source
            .borrow_mut()
            .extract(key, amount, TransactionMode::Simulate);
        let plan = self.distribute(key, available, TransactionMode::Simulate);
        if plan <= 0 {
            return 0;
        }
        let taken = self
            .source
            .borrow_mut()
            .extract(key, plan, TransactionMode::Commit);
        let moved = self.distribute(key, taken, TransactionMode::Commit);
        let excess = taken - moved;
        if excess > 0 {
            let returned = self
                .source
                .borrow_mut()
                .insert(key, excess, TransactionMode::Commit);
            if returned < excess {
                warn!(
                    "Unable to return {} of {:?} to {}, voided",
                    excess - returned,
                    key,
                    self.source.description()
                );
            }
        }
        moved
    }
}
