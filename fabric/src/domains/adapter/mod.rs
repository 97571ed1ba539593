pub use domain::*;

mod domain;
mod operations;
mod queries;
