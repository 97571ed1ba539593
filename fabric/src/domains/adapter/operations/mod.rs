mod enumerate;
mod extract;
mod insert;
mod probe;

pub use probe::*;
