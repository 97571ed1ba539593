use fabric::storage::{share_storage, Storage};
use fabric::transaction::TransactionMode;
use fabric::tunnel::{
    share_energy, EnergyBuffer, Tunnel, TunnelDomain, TunnelInput, TunnelKey, TunnelKind,
    TunnelOutput,
};
use fabric::collections::Shared;

use crate::testing::{as_storage, cell, key, knowledge, stored_in, NoReturnSource, SimulateOnlyStorage};

mod testing;

struct Rig {
    tunnel: Shared<Tunnel>,
    energy: Shared<dyn fabric::tunnel::EnergySource>,
}

fn rig(tax_per_unit: f64, source: Shared<dyn Storage>, outputs: Vec<Shared<dyn Storage>>) -> Rig {
    let kind = Shared::new(TunnelKind {
        id: TunnelKey(1),
        name: "basic-tunnel".to_string(),
        tax_per_unit,
    });
    let resources = knowledge().resources;
    let energy = share_energy(EnergyBuffer { stored: 100.0 });
    let mut domain = TunnelDomain::default();
    let tunnel = domain.create_tunnel(kind, resources, source, energy.clone());
    for output in outputs {
        domain.connect_output(tunnel.id, output).unwrap();
    }
    Rig { tunnel, energy }
}

#[test]
fn test_distribute_splits_evenly_with_carry() {
    let knowledge = knowledge();
    let iron = key(&knowledge, "iron-ingot");
    let a = cell(1, 1000);
    let b = cell(2, 1000);
    let c = cell(3, 1000);
    let source = cell(4, 1000);
    let rig = rig(
        0.0,
        as_storage(&source),
        vec![as_storage(&a), as_storage(&b), as_storage(&c)],
    );
    let moved = rig
        .tunnel
        .to_rc()
        .borrow_mut()
        .distribute(&iron, 100, TransactionMode::Commit);
    assert_eq!(moved, 100);
    assert_eq!(a.content.get(&iron), 34);
    assert_eq!(b.content.get(&iron), 33);
    assert_eq!(c.content.get(&iron), 33);
}

#[test]
fn test_distribute_carries_refused_share_forward() {
    let knowledge = knowledge();
    let iron = key(&knowledge, "iron-ingot");
    let a = cell(1, 3);
    let b = cell(2, 1000);
    let source = cell(3, 1000);
    let rig = rig(0.0, as_storage(&source), vec![as_storage(&a), as_storage(&b)]);
    let moved = rig
        .tunnel
        .to_rc()
        .borrow_mut()
        .distribute(&iron, 10, TransactionMode::Commit);
    assert_eq!(moved, 10);
    assert_eq!(a.content.get(&iron), 3);
    assert_eq!(b.content.get(&iron), 7);
}

#[test]
fn test_distribute_leaves_tail_smaller_than_share() {
    let knowledge = knowledge();
    let iron = key(&knowledge, "iron-ingot");
    let cells: Vec<_> = (1..=4).map(|id| cell(id, 1000)).collect();
    let source = cell(5, 1000);
    let outputs = cells.iter().map(as_storage).collect();
    let rig = rig(0.0, as_storage(&source), outputs);
    let moved = rig
        .tunnel
        .to_rc()
        .borrow_mut()
        .distribute(&iron, 10, TransactionMode::Commit);
    assert_eq!(moved, 8);
    for cell in &cells {
        assert_eq!(cell.content.get(&iron), 2);
    }
}

#[test]
fn test_distribute_tiny_amount_goes_to_first_taker() {
    let knowledge = knowledge();
    let iron = key(&knowledge, "iron-ingot");
    let cells: Vec<_> = (1..=4).map(|id| cell(id, 1000)).collect();
    let source = cell(5, 1000);
    let outputs = cells.iter().map(as_storage).collect();
    let rig = rig(0.0, as_storage(&source), outputs);
    let moved = rig
        .tunnel
        .to_rc()
        .borrow_mut()
        .distribute(&iron, 2, TransactionMode::Commit);
    assert_eq!(moved, 2);
    assert_eq!(cells[0].content.get(&iron), 2);
    assert_eq!(cells[1].content.get(&iron), 0);
}

#[test]
fn test_tax_deducted_once_and_only_on_commit() {
    let knowledge = knowledge();
    let iron = key(&knowledge, "iron-ingot");
    let a = cell(1, 1000);
    let source = cell(2, 1000);
    let rig = rig(0.5, as_storage(&source), vec![as_storage(&a)]);
    rig.tunnel
        .to_rc()
        .borrow_mut()
        .distribute(&iron, 10, TransactionMode::Simulate);
    assert_eq!(rig.energy.stored(), 100.0);
    rig.tunnel
        .to_rc()
        .borrow_mut()
        .distribute(&iron, 10, TransactionMode::Commit);
    assert_eq!(rig.energy.stored(), 95.0);
}

#[test]
fn test_fluid_tax_counts_granularity_units() {
    let knowledge = knowledge();
    let water = key(&knowledge, "water");
    let a = cell(1, 10000);
    let source = cell(2, 10000);
    let rig = rig(0.5, as_storage(&source), vec![as_storage(&a)]);
    // water granularity is 1000, so 2000 moved is two taxable units
    let moved = rig
        .tunnel
        .to_rc()
        .borrow_mut()
        .distribute(&water, 2000, TransactionMode::Commit);
    assert_eq!(moved, 2000);
    assert_eq!(a.content.get(&water), 2000);
    assert_eq!(rig.energy.stored(), 99.0);
}

#[test]
fn test_ports_are_one_way() {
    let knowledge = knowledge();
    let iron = key(&knowledge, "iron-ingot");
    let a = cell(1, 1000);
    let source = cell(2, 1000);
    source.to_rc().borrow_mut().content.add(&iron, 10);
    let rig = rig(0.0, as_storage(&source), vec![as_storage(&a)]);
    let mut input = TunnelInput {
        tunnel: rig.tunnel.clone(),
    };
    let mut output = TunnelOutput {
        tunnel: rig.tunnel.clone(),
    };
    assert_eq!(input.extract(&iron, 5, TransactionMode::Commit), 0);
    assert_eq!(output.insert(&iron, 5, TransactionMode::Commit), 0);
    assert_eq!(input.insert(&iron, 5, TransactionMode::Commit), 5);
    assert_eq!(a.content.get(&iron), 5);
    assert_eq!(output.extract(&iron, 5, TransactionMode::Commit), 5);
    assert_eq!(source.content.get(&iron), 5);
    assert_eq!(stored_in(&mut input).total(), 0);
    assert_eq!(stored_in(&mut output).total(), 0);
}

#[test]
fn test_pump_moves_planned_amount_and_keeps_rest_at_source() {
    let knowledge = knowledge();
    let iron = key(&knowledge, "iron-ingot");
    let a = cell(1, 3);
    let source = cell(2, 1000);
    source.to_rc().borrow_mut().content.add(&iron, 10);
    let rig = rig(0.0, as_storage(&source), vec![as_storage(&a)]);
    let moved = rig.tunnel.to_rc().borrow_mut().pump(&iron, 10);
    assert_eq!(moved, 3);
    assert_eq!(a.content.get(&iron), 3);
    assert_eq!(source.content.get(&iron), 7);
}

#[test]
fn test_pump_voids_excess_when_source_refuses_return() {
    let knowledge = knowledge();
    let iron = key(&knowledge, "iron-ingot");
    let mut content = fabric::resources::KeyCounter::default();
    content.add(&iron, 10);
    let source = share_storage(NoReturnSource { content });
    let output = share_storage(SimulateOnlyStorage);
    let rig = rig(0.0, source.clone(), vec![output]);
    let moved = rig.tunnel.to_rc().borrow_mut().pump(&iron, 10);
    assert_eq!(moved, 0);
    let mut source = source;
    assert_eq!(stored_in(&mut *source.borrow_mut()).total(), 0);
}
