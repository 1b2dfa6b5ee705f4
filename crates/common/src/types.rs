//! Universal types shared across all protocol modules.
//!
//! Every module converts its protocol-specific data into these types.
//! CLI/engine consume only these — never protocol-specific structs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::chain_slug;

/// A fungible token as reported by the position source.
///
/// `address` is the lowercase on-chain contract address and may be empty
/// (native assets, or the API simply not returning one). `decimals`
/// defaults to 18 when the source omits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub symbol: String,
    pub address: String,
    pub decimals: u32,
}

impl Asset {
    pub fn new(symbol: impl Into<String>, address: impl Into<String>, decimals: u32) -> Self {
        Self {
            symbol: symbol.into(),
            address: address.into().to_lowercase(),
            decimals,
        }
    }
}

/// A lending market, identified by an opaque unique key.
///
/// The key is often chain-prefixed (`"<chainId>-<hash>"`); when the API
/// does not supply `chain_id` directly it is recovered from that prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketRef {
    pub unique_key: String,
    pub chain_id: Option<u64>,
    pub whitelisted: bool,
    pub loan_asset: Asset,
    pub collateral_asset: Asset,
}

impl MarketRef {
    /// Chain this market lives on: the explicit field when present,
    /// otherwise a `^(\d+)[-:]` prefix of the unique key.
    pub fn resolved_chain_id(&self) -> Option<u64> {
        self.chain_id.or_else(|| parse_chain_prefix(&self.unique_key))
    }

    /// Price-oracle key for the loan asset, if the market's chain has a
    /// known slug and the asset has an address.
    pub fn loan_price_key(&self) -> Option<String> {
        price_key(self.resolved_chain_id()?, &self.loan_asset.address)
    }

    /// Price-oracle key for the collateral asset.
    pub fn collateral_price_key(&self) -> Option<String> {
        price_key(self.resolved_chain_id()?, &self.collateral_asset.address)
    }
}

/// Build a `"<chainSlug>:<address>"` price key. Tokens on chains without
/// a slug mapping, or with an empty address, are never priced.
pub fn price_key(chain_id: u64, address: &str) -> Option<String> {
    if address.is_empty() {
        return None;
    }
    chain_slug(chain_id).map(|slug| format!("{slug}:{}", address.to_lowercase()))
}

/// Parse a leading `<digits>-` or `<digits>:` chain prefix.
fn parse_chain_prefix(key: &str) -> Option<u64> {
    let digits: String = key.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    match key.as_bytes().get(digits.len()) {
        Some(b'-') | Some(b':') => digits.parse().ok(),
        _ => None,
    }
}

/// One wallet's stake in one market, exactly as reported upstream.
///
/// Numeric fields arrive null/absent for inactive sides and are zeroed at
/// parse time. Amount fields (`supply_assets`, `borrow_assets`,
/// `collateral`) may be in atomic or human units depending on the market —
/// the reconciler normalizes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPosition {
    pub market: MarketRef,
    pub owner: String,
    pub supply_assets: Decimal,
    pub supply_usd_api: Decimal,
    pub borrow_assets: Decimal,
    pub borrow_usd_api: Decimal,
    pub collateral: Decimal,
    pub collateral_usd_api: Decimal,
}

/// The reconciler's output: one row per (wallet, market), deduplicated,
/// decimal-normalized, and with trusted USD figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciledPosition {
    pub wallet: String,
    pub market_key: String,
    pub loan_symbol: String,
    pub collateral_symbol: String,
    pub supply_amount: Decimal,
    pub supply_usd: Decimal,
    pub borrow_amount: Decimal,
    pub borrow_usd: Decimal,
    pub collateral_amount: Decimal,
    pub collateral_usd: Decimal,
    pub whitelisted: bool,
}

/// A market-keyed sum of reconciled positions across wallets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedRow {
    pub market_key: String,
    pub loan_symbol: String,
    pub collateral_symbol: String,
    pub whitelisted: bool,
    pub supply_amount: Decimal,
    pub supply_usd: Decimal,
    pub borrow_amount: Decimal,
    pub borrow_usd: Decimal,
    pub collateral_amount: Decimal,
    pub collateral_usd: Decimal,
    /// `borrow_usd / supply_usd`, undefined when there is no supply.
    pub ltv: Option<Decimal>,
    /// Market borrow rate as a fraction (0.053 = 5.3%), when known.
    pub borrow_rate: Option<f64>,
}

/// One transaction with its gas cost, from the history indexer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasSpend {
    pub hash: String,
    pub network: String,
    pub chain_id: u64,
    pub timestamp_ms: i64,
    pub gas_used: u64,
    pub gas_price_wei: u64,
    /// gas_price × gas_used, scaled to the chain's native unit (1e18 wei).
    pub gas_cost_native: Decimal,
}

/// A yield-trading position (PT/YT/LP). Reserved for the Pendle module,
/// which is a declared placeholder — no source produces these yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldPosition {
    pub chain_id: u64,
    pub market_address: String,
    pub pt_address: String,
    pub notional_usd: Decimal,
    pub implied_apy: Option<f64>,
    pub maturity_ts: i64,
}
