//! Zapper indexer module — transaction history and gas costs.

pub mod client;

pub use client::ZapperClient;
