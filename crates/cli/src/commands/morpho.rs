//! `vantage morpho` commands — Morpho Blue lending positions.

use std::collections::BTreeSet;

use anyhow::Result;
use rust_decimal::Decimal;

use vantage_common::types::ReconciledPosition;
use vantage_core::aggregate::{AggregateOptions, SupplyBasis};
use vantage_core::reconcile::ReconcileOptions;
use vantage_core::Engine;
use vantage_types::config::AppConfig;
use vantage_types::output::{
    AggregateOutput, AggregateRow, PositionRow, PositionsOutput, RateRow, RatesOutput,
    WalletTotals,
};
use vantage_utils::output::{render, OutputFormat};

/// Merge CLI flags over the configured defaults.
fn effective_options(engine: &Engine, untrusted: bool, recompute_usd: bool) -> ReconcileOptions {
    let mut options = engine.reconcile_options();
    options.include_untrusted |= untrusted;
    options.recompute_usd |= recompute_usd;
    options
}

fn apply_chain_override(config: &mut AppConfig, chains: Vec<u64>) {
    if !chains.is_empty() {
        config.morpho.chains = chains;
    }
}

fn totals(rows: &[ReconciledPosition]) -> WalletTotals {
    let supply_usd: Decimal = rows.iter().map(|r| r.supply_usd).sum();
    let borrow_usd: Decimal = rows.iter().map(|r| r.borrow_usd).sum();
    let collateral_usd: Decimal = rows.iter().map(|r| r.collateral_usd).sum();
    WalletTotals {
        supply_usd,
        borrow_usd,
        collateral_usd,
        net_usd: supply_usd - borrow_usd,
    }
}

fn position_row(r: &ReconciledPosition) -> PositionRow {
    PositionRow {
        market_key: r.market_key.clone(),
        loan: r.loan_symbol.clone(),
        collateral: r.collateral_symbol.clone(),
        supply_amount: r.supply_amount,
        supply_usd: r.supply_usd,
        borrow_amount: r.borrow_amount,
        borrow_usd: r.borrow_usd,
        collateral_amount: r.collateral_amount,
        collateral_usd: r.collateral_usd,
        whitelisted: r.whitelisted,
    }
}

/// Show reconciled positions, one table per wallet.
pub async fn positions(
    mut config: AppConfig,
    wallets: Vec<String>,
    chains: Vec<u64>,
    untrusted: bool,
    recompute_usd: bool,
    fmt: OutputFormat,
) -> Result<()> {
    let wallets = super::resolve_wallets(&config, wallets)?;
    apply_chain_override(&mut config, chains);

    let engine = Engine::new(config);
    let options = effective_options(&engine, untrusted, recompute_usd);

    for wallet in &wallets {
        let rows = engine.wallet_positions(wallet, options).await?;
        let output = PositionsOutput {
            wallet: wallet.clone(),
            totals: totals(&rows),
            rows: rows.iter().map(position_row).collect(),
        };
        render(fmt, &output)?;
    }

    Ok(())
}

/// Aggregate positions across wallets, grouped by market, with borrow
/// rates attached.
#[allow(clippy::too_many_arguments)]
pub async fn aggregate(
    mut config: AppConfig,
    wallets: Vec<String>,
    chains: Vec<u64>,
    collateral_basis: bool,
    all_rows: bool,
    untrusted: bool,
    recompute_usd: bool,
    fmt: OutputFormat,
) -> Result<()> {
    let wallets = super::resolve_wallets(&config, wallets)?;
    apply_chain_override(&mut config, chains);

    let engine = Engine::new(config);
    let options = effective_options(&engine, untrusted, recompute_usd);

    let mut all_positions = Vec::new();
    let mut failures = 0usize;
    for wallet in &wallets {
        match engine.wallet_positions(wallet, options).await {
            Ok(mut rows) => all_positions.append(&mut rows),
            Err(e) => {
                failures += 1;
                eprintln!("Morpho query failed for {wallet}: {e}");
            }
        }
    }
    if failures == wallets.len() {
        anyhow::bail!("All wallet queries failed");
    }

    let agg_options = AggregateOptions {
        active_borrows_only: !all_rows,
        basis: if collateral_basis {
            SupplyBasis::Collateral
        } else {
            SupplyBasis::Lend
        },
    };
    let aggregated = engine.aggregate_with_rates(&all_positions, agg_options).await;

    let supply_usd: Decimal = aggregated.iter().map(|r| r.supply_usd).sum();
    let borrow_usd: Decimal = aggregated.iter().map(|r| r.borrow_usd).sum();
    let collateral_usd: Decimal = aggregated.iter().map(|r| r.collateral_usd).sum();

    let output = AggregateOutput {
        wallets,
        rows: aggregated
            .into_iter()
            .map(|r| AggregateRow {
                market_key: r.market_key,
                loan: r.loan_symbol,
                collateral: r.collateral_symbol,
                whitelisted: r.whitelisted,
                supply_amount: r.supply_amount,
                supply_usd: r.supply_usd,
                borrow_amount: r.borrow_amount,
                borrow_usd: r.borrow_usd,
                ltv: r.ltv,
                borrow_rate: r.borrow_rate,
            })
            .collect(),
        totals: WalletTotals {
            supply_usd,
            borrow_usd,
            collateral_usd,
            net_usd: supply_usd - borrow_usd,
        },
    };
    render(fmt, &output)
}

/// Fetch borrow rates for explicit market keys.
pub async fn rates(config: AppConfig, keys: Vec<String>, fmt: OutputFormat) -> Result<()> {
    if keys.is_empty() {
        anyhow::bail!("Pass at least one market unique key");
    }

    let engine = Engine::new(config);
    let key_set: BTreeSet<String> = keys.iter().cloned().collect();
    let rates = engine.borrow_rates(key_set).await;

    let output = RatesOutput {
        rows: keys
            .into_iter()
            .map(|key| RateRow {
                borrow_rate: rates.get(&key).copied(),
                market_key: key,
            })
            .collect(),
    };
    render(fmt, &output)
}
