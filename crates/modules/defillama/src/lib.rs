//! DeFiLlama price oracle module.

pub mod client;

pub use client::LlamaPriceClient;
