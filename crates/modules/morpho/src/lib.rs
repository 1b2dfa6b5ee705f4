//! Morpho Blue protocol module.
//!
//! Read-only access to the Morpho Blue GraphQL API: per-user market
//! positions and market borrow rates.

pub mod client;
pub mod rates;

pub use client::MorphoClient;
