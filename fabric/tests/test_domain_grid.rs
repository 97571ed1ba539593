use std::collections::HashSet;

use fabric::grid::{GridDomain, PinReason};
use fabric::resources::{KeyCounter, Modifier, ResourceKey};

use crate::testing::{key, knowledge};

mod testing;

fn counter(entries: &[(&ResourceKey, i64)]) -> KeyCounter {
    let mut counter = KeyCounter::default();
    for (key, amount) in entries {
        counter.add(key, *amount);
    }
    counter
}

#[test]
fn test_key_payload_sent_once_per_serial() {
    let knowledge = knowledge();
    let iron = key(&knowledge, "iron-ingot");
    let mut grid = GridDomain::default();
    let none = HashSet::new();

    let stored = counter(&[(&iron, 5)]);
    let update = grid.update_content(&stored, &stored, &none);
    assert_eq!(update.rows.len(), 1);
    let serial = update.rows[0].serial;
    assert_eq!(update.rows[0].key.as_ref(), Some(&iron));
    assert_eq!(update.rows[0].stored, 5);

    let stored = counter(&[(&iron, 6)]);
    let update = grid.update_content(&stored, &stored, &none);
    assert_eq!(update.rows.len(), 1);
    assert_eq!(update.rows[0].serial, serial);
    assert_eq!(update.rows[0].key, None);
    assert_eq!(update.rows[0].stored, 6);
}

#[test]
fn test_unchanged_content_produces_no_rows() {
    let knowledge = knowledge();
    let iron = key(&knowledge, "iron-ingot");
    let mut grid = GridDomain::default();
    let none = HashSet::new();
    let stored = counter(&[(&iron, 5)]);
    grid.update_content(&stored, &stored, &none);
    let update = grid.update_content(&stored, &stored, &none);
    assert!(update.rows.is_empty());
}

#[test]
fn test_vanished_key_zeroes_and_revives_same_serial() {
    let knowledge = knowledge();
    let iron = key(&knowledge, "iron-ingot");
    let mut grid = GridDomain::default();
    let none = HashSet::new();

    let stored = counter(&[(&iron, 5)]);
    let update = grid.update_content(&stored, &stored, &none);
    let serial = update.rows[0].serial;

    let empty = KeyCounter::default();
    let update = grid.update_content(&empty, &empty, &none);
    assert_eq!(update.rows.len(), 1);
    assert_eq!(update.rows[0].serial, serial);
    assert_eq!(update.rows[0].stored, 0);
    assert_eq!(update.rows[0].requestable, 0);

    // viewers dropped the row on the zeroed update, the key comes back
    let stored = counter(&[(&iron, 7)]);
    let update = grid.update_content(&stored, &stored, &none);
    assert_eq!(update.rows.len(), 1);
    assert_eq!(update.rows[0].serial, serial);
    assert_eq!(update.rows[0].key.as_ref(), Some(&iron));
    assert_eq!(update.rows[0].stored, 7);
}

#[test]
fn test_craftable_key_appears_without_stored_amount() {
    let knowledge = knowledge();
    let plate = key(&knowledge, "steel-plate");
    let mut grid = GridDomain::default();
    let empty = KeyCounter::default();
    let mut craftable = HashSet::new();
    craftable.insert(plate.clone());
    let update = grid.update_content(&empty, &empty, &craftable);
    assert_eq!(update.rows.len(), 1);
    assert_eq!(update.rows[0].stored, 0);
    assert!(update.rows[0].craftable);
}

#[test]
fn test_snapshot_replaces_everything_in_serial_order() {
    let knowledge = knowledge();
    let iron = key(&knowledge, "iron-ingot");
    let copper = key(&knowledge, "copper-ingot");
    let mut grid = GridDomain::default();
    let none = HashSet::new();
    let stored = counter(&[(&iron, 5), (&copper, 3)]);
    grid.update_content(&stored, &stored, &none);
    let snapshot = grid.snapshot();
    assert!(snapshot.full_replace);
    assert_eq!(snapshot.rows.len(), 2);
    assert!(snapshot.rows[0].serial < snapshot.rows[1].serial);
    assert!(snapshot.rows.iter().all(|row| row.key.is_some()));
}

#[test]
fn test_crafting_pins_pruned_when_key_leaves_table() {
    let knowledge = knowledge();
    let iron = key(&knowledge, "iron-ingot");
    let copper = key(&knowledge, "copper-ingot");
    let mut grid = GridDomain::default();
    let none = HashSet::new();
    let stored = counter(&[(&iron, 5), (&copper, 3)]);
    grid.update_content(&stored, &stored, &none);
    grid.pin(iron.clone(), PinReason::User, 1);
    grid.pin(copper.clone(), PinReason::Crafting, 2);

    let empty = KeyCounter::default();
    grid.update_content(&empty, &empty, &none);
    grid.prune_pins();
    assert_eq!(grid.pinned.len(), 1);
    assert_eq!(grid.pinned[0].key, iron);
}

#[test]
fn test_candidates_widen_only_for_fuzzy_kinds() {
    let knowledge = knowledge();
    let pristine = key(&knowledge, "drill-head");
    let worn = knowledge.key_with(pristine.kind, 700, vec![]).unwrap();
    let iron = key(&knowledge, "iron-ingot");
    let mut grid = GridDomain::default();
    let none = HashSet::new();
    let stored = counter(&[(&pristine, 1), (&worn, 1), (&iron, 5)]);
    grid.update_content(&stored, &stored, &none);
    // drill heads opt into fuzzy matching, every variant is a candidate
    let candidates = grid.candidates(&pristine, true);
    assert_eq!(candidates.len(), 2);
    assert!(candidates.windows(2).all(|pair| pair[0] < pair[1]));
    // iron does not, only the exact key matches
    let exact = grid.candidates(&iron, false);
    assert_eq!(exact, vec![grid.serial_by_key[&iron]]);
    let polished = Modifier {
        name: "polished".to_string(),
        value: "yes".to_string(),
    };
    let stranger = knowledge.key_with(iron.kind, 0, vec![polished]).unwrap();
    assert!(grid.candidates(&stranger, false).is_empty());
}
