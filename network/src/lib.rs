pub use client::*;
pub use metrics::*;
pub use server::*;
pub use transfer::*;

mod client;
mod metrics;
mod server;
mod transfer;
