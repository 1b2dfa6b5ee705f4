//! `vantage pendle` — yield-trading positions (placeholder).

use anyhow::Result;

use vantage_common::traits::YieldPositionSource;
use vantage_mod_pendle::PendleClient;
use vantage_types::config::AppConfig;
use vantage_utils::output::OutputFormat;

/// Show Pendle positions. The module is a declared placeholder; until
/// the Portfolio Positions endpoint is wired this always reports empty.
pub async fn positions(config: AppConfig, wallets: Vec<String>, fmt: OutputFormat) -> Result<()> {
    let wallets = super::resolve_wallets(&config, wallets)?;
    let client = PendleClient::new();

    for wallet in &wallets {
        let positions = client.positions(wallet).await?;

        match fmt {
            OutputFormat::Json | OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string(&positions)?);
            }
            OutputFormat::Table => {
                if positions.is_empty() {
                    println!(
                        "{wallet}: no Pendle data — module not wired yet (PT/YT/LP holdings and implied APY land here)."
                    );
                }
            }
        }
    }

    Ok(())
}
