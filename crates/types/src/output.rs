//! Structured CLI output types.
//!
//! Every command produces one of these; rendering (table vs JSON) is
//! decided at the edge by `vantage-utils::output`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One reconciled lending position row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionRow {
    pub market_key: String,
    pub loan: String,
    pub collateral: String,
    pub supply_amount: Decimal,
    pub supply_usd: Decimal,
    pub borrow_amount: Decimal,
    pub borrow_usd: Decimal,
    pub collateral_amount: Decimal,
    pub collateral_usd: Decimal,
    pub whitelisted: bool,
}

/// Per-wallet USD totals shown under the positions table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletTotals {
    pub supply_usd: Decimal,
    pub borrow_usd: Decimal,
    pub collateral_usd: Decimal,
    /// supply − borrow.
    pub net_usd: Decimal,
}

/// `vantage morpho positions` — one wallet's reconciled positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionsOutput {
    pub wallet: String,
    pub rows: Vec<PositionRow>,
    pub totals: WalletTotals,
}

/// One cross-wallet aggregated market row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateRow {
    pub market_key: String,
    pub loan: String,
    pub collateral: String,
    pub whitelisted: bool,
    pub supply_amount: Decimal,
    pub supply_usd: Decimal,
    pub borrow_amount: Decimal,
    pub borrow_usd: Decimal,
    pub ltv: Option<Decimal>,
    pub borrow_rate: Option<f64>,
}

/// `vantage morpho aggregate` — grouped view across all wallets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateOutput {
    pub wallets: Vec<String>,
    pub rows: Vec<AggregateRow>,
    pub totals: WalletTotals,
}

/// `vantage morpho rates` — borrow rate per market key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesOutput {
    pub rows: Vec<RateRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRow {
    pub market_key: String,
    pub borrow_rate: Option<f64>,
}

/// One transaction with its gas cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasRow {
    pub hash: String,
    pub network: String,
    pub time: String,
    pub gas_used: u64,
    pub gas_price_wei: u64,
    pub gas_cost_native: Decimal,
}

/// `vantage history txs` — recent transactions + gas for one wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasOutput {
    pub wallet: String,
    pub rows: Vec<GasRow>,
    pub total_gas_native: Decimal,
}

/// One wallet's line in the status overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSummaryRow {
    pub wallet: String,
    pub markets: usize,
    pub supply_usd: Decimal,
    pub borrow_usd: Decimal,
    pub collateral_usd: Decimal,
    pub net_usd: Decimal,
    /// Present when the wallet's fetch failed; the row carries the label
    /// instead of numbers.
    pub error: Option<String>,
}

/// `vantage status` — KPI overview across all configured wallets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusOutput {
    pub wallets: Vec<WalletSummaryRow>,
}

/// `vantage configure show`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigOutput {
    pub wallets: Vec<String>,
    pub morpho_enabled: bool,
    pub morpho_chains: Vec<u64>,
    pub recompute_usd: bool,
    pub include_untrusted: bool,
    pub zapper_enabled: bool,
    pub zapper_chains: Vec<u64>,
    pub pendle_enabled: bool,
    pub cache_ttl_secs: u64,
}
