use crate::resources::{KeyCounter, ResourceKey};
use crate::storage::Storage;
use crate::transaction::TransactionMode;
use crate::tunnel::{TunnelInput, TunnelOutput};

impl Storage for TunnelInput {
    fn insert(&mut self, key: &ResourceKey, amount: i64, mode: TransactionMode) -> i64 {
        self.tunnel.borrow_mut().distribute(key, amount, mode)
    }

    fn extract(&mut self, _key: &ResourceKey, _amount: i64, _mode: TransactionMode) -> i64 {
        0
    }

    fn enumerate(&mut self, _out: &mut KeyCounter) {}

    fn description(&self) -> String {
        format!("tunnel {} input", self.tunnel.id.0)
    }
}

impl Storage for TunnelOutput {
    fn insert(&mut self, _key: &ResourceKey, _amount: i64, _mode: TransactionMode) -> i64 {
        0
    }

    fn extract(&mut self, key: &ResourceKey, amount: i64, mode: TransactionMode) -> i64 {
        self.tunnel.borrow_mut().draw(key, amount, mode)
    }

    fn enumerate(&mut self, _out: &mut KeyCounter) {}

    fn description(&self) -> String {
        format!("tunnel {} output", self.tunnel.id.0)
    }
}
