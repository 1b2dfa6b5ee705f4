//! Pendle yield-trading module — declared placeholder.

pub mod client;

pub use client::PendleClient;
