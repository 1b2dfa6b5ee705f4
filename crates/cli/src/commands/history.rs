//! `vantage history` — transaction history and gas costs via Zapper.

use anyhow::Result;
use rust_decimal::Decimal;

use vantage_common::error::VantageError;
use vantage_common::traits::TxHistorySource;
use vantage_mod_zapper::ZapperClient;
use vantage_types::config::AppConfig;
use vantage_types::output::{GasOutput, GasRow};
use vantage_utils::format::format_timestamp_ms;
use vantage_utils::output::{render, OutputFormat};

/// `vantage history txs [--wallet A]... [--chain N]... [--first N]`
pub async fn txs(
    config: AppConfig,
    wallets: Vec<String>,
    chains: Vec<u64>,
    first: Option<u32>,
    fmt: OutputFormat,
) -> Result<()> {
    if !config.zapper.enabled {
        println!("Zapper module is disabled. Run: vantage configure module enable zapper");
        return Ok(());
    }

    let client = match ZapperClient::from_env() {
        Ok(c) => c,
        Err(VantageError::Config(msg)) => {
            // missing key is a setup condition, not a failure
            println!("{msg}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let wallets = super::resolve_wallets(&config, wallets)?;
    let chains = if chains.is_empty() {
        config.zapper.chains.clone()
    } else {
        chains
    };
    let first = first.unwrap_or(config.zapper.first);

    for wallet in &wallets {
        let spends = client.recent_transactions(wallet, &chains, first).await?;

        let total_gas_native: Decimal = spends.iter().map(|s| s.gas_cost_native).sum();
        let output = GasOutput {
            wallet: wallet.clone(),
            rows: spends
                .into_iter()
                .map(|s| GasRow {
                    hash: s.hash,
                    network: s.network,
                    time: format_timestamp_ms(s.timestamp_ms),
                    gas_used: s.gas_used,
                    gas_price_wei: s.gas_price_wei,
                    gas_cost_native: s.gas_cost_native,
                })
                .collect(),
            total_gas_native,
        };
        render(fmt, &output)?;
    }

    Ok(())
}
