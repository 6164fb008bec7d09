pub mod client;
pub mod models;

pub use client::{RugplayClient, TransferRelay};
pub use models::TransferOutcome;
