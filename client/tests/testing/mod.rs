#![allow(dead_code)]

use std::fs;

use fabric::data::Knowledge;
use fabric::grid::{GridUpdate, GridUpdateRow};
use fabric::resources::ResourceKey;

pub fn knowledge() -> Knowledge {
    let text = fs::read_to_string("../assets/knowledge.json").unwrap();
    Knowledge::load(&text).unwrap()
}

pub fn key(knowledge: &Knowledge, name: &str) -> ResourceKey {
    knowledge.key_of(name).unwrap()
}

pub fn row(serial: u64, key: Option<ResourceKey>, stored: i64) -> GridUpdateRow {
    GridUpdateRow {
        serial,
        key,
        stored,
        requestable: stored,
        craftable: false,
    }
}

pub fn delta(rows: Vec<GridUpdateRow>) -> GridUpdate {
    GridUpdate {
        full_replace: false,
        rows,
    }
}

pub fn replace(rows: Vec<GridUpdateRow>) -> GridUpdate {
    GridUpdate {
        full_replace: true,
        rows,
    }
}
