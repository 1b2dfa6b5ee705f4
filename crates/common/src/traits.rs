//! Protocol traits — every module implements these.
//!
//! This is the contract between the engine and the modules. The engine
//! consumes these seams; protocol-specific request/response plumbing
//! stays inside each module crate.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::VantageResult;
use crate::types::{GasSpend, RawPosition, YieldPosition};

/// Lending position source — read-only, no auth needed.
///
/// "No positions for this wallet" is an empty `Vec`, never an error; only
/// transport/protocol failures propagate.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Protocol identifier for error labeling.
    fn protocol(&self) -> &'static str;

    /// All raw market positions for a wallet on the given chains.
    async fn positions(&self, wallet: &str, chains: &[u64]) -> VantageResult<Vec<RawPosition>>;
}

/// Spot price oracle.
///
/// Best-effort: a single batched attempt per call. Missing prices simply
/// do not appear in the map; transport failures yield an empty map so the
/// caller falls back to API-reported USD values.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    async fn prices(&self, keys: &BTreeSet<String>) -> HashMap<String, Decimal>;
}

/// Market borrow-rate source.
///
/// Rates are fractions (0.053 = 5.3%). Total failure yields an empty map;
/// rate annotation is never fatal.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn borrow_rates(&self, market_keys: &BTreeSet<String>) -> HashMap<String, f64>;
}

/// Transaction history with per-tx gas cost.
#[async_trait]
pub trait TxHistorySource: Send + Sync {
    async fn recent_transactions(
        &self,
        wallet: &str,
        chains: &[u64],
        first: u32,
    ) -> VantageResult<Vec<GasSpend>>;
}

/// Yield-trading positions (PT/YT/LP). Placeholder seam — the only
/// implementation returns no data yet.
#[async_trait]
pub trait YieldPositionSource: Send + Sync {
    async fn positions(&self, wallet: &str) -> VantageResult<Vec<YieldPosition>>;
}
