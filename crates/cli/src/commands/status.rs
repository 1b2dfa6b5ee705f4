//! `vantage status` — per-wallet KPI overview.

use anyhow::Result;
use rust_decimal::Decimal;

use vantage_core::Engine;
use vantage_types::output::{StatusOutput, WalletSummaryRow};
use vantage_utils::output::{render, OutputFormat};

/// One line per configured wallet: market count, supply/borrow/collateral
/// USD and net exposure. A failing wallet gets its error label in place
/// of numbers — one bad wallet must not hide the others.
pub async fn run(fmt: OutputFormat) -> Result<()> {
    let config = vantage_core::workspace::load_config()?;
    let wallets = config.wallets.clone();
    let engine = Engine::new(config);
    let options = engine.reconcile_options();

    let mut summary = Vec::new();
    for wallet in wallets {
        match engine.wallet_positions(&wallet, options).await {
            Ok(rows) => {
                let supply_usd: Decimal = rows.iter().map(|r| r.supply_usd).sum();
                let borrow_usd: Decimal = rows.iter().map(|r| r.borrow_usd).sum();
                let collateral_usd: Decimal = rows.iter().map(|r| r.collateral_usd).sum();
                summary.push(WalletSummaryRow {
                    wallet,
                    markets: rows.len(),
                    supply_usd,
                    borrow_usd,
                    collateral_usd,
                    net_usd: supply_usd - borrow_usd,
                    error: None,
                });
            }
            Err(e) => summary.push(WalletSummaryRow {
                wallet,
                markets: 0,
                supply_usd: Decimal::ZERO,
                borrow_usd: Decimal::ZERO,
                collateral_usd: Decimal::ZERO,
                net_usd: Decimal::ZERO,
                error: Some(e.to_string()),
            }),
        }
    }

    render(fmt, &StatusOutput { wallets: summary })
}
