pub mod adapter;
pub mod grid;
pub mod resources;
pub mod storage;
pub mod tunnel;
