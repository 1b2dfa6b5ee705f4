pub mod configure;
pub mod history;
pub mod morpho;
pub mod pendle;
pub mod status;

use anyhow::Result;
use vantage_types::config::AppConfig;

/// Resolve the wallet list for a command: explicit `--wallet` flags win,
/// otherwise the configured list. No wallets anywhere is a usage error.
pub fn resolve_wallets(config: &AppConfig, flags: Vec<String>) -> Result<Vec<String>> {
    let wallets = if flags.is_empty() {
        config.wallets.clone()
    } else {
        flags
    };

    if wallets.is_empty() {
        anyhow::bail!(
            "No wallets given. Pass --wallet or run: vantage configure wallet add <address>"
        );
    }

    wallets
        .iter()
        .map(|w| vantage_core::parse::parse_address(w))
        .collect()
}
