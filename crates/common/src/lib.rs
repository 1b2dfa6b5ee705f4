//! Shared foundation for all Vantage crates: error taxonomy, domain
//! types, and the traits protocol modules implement.

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
