//! `vantage configure` — wallets, modules, options.

use anyhow::Result;

use vantage_core::parse::parse_address;
use vantage_core::workspace::{load_config, save_config};
use vantage_types::output::ConfigOutput;
use vantage_utils::output::{render, OutputFormat};

/// `vantage configure show`
pub fn show(fmt: OutputFormat) -> Result<()> {
    let config = load_config()?;
    let output = ConfigOutput {
        wallets: config.wallets.clone(),
        morpho_enabled: config.morpho.enabled,
        morpho_chains: config.morpho.chains.clone(),
        recompute_usd: config.morpho.recompute_usd,
        include_untrusted: config.morpho.include_untrusted,
        zapper_enabled: config.zapper.enabled,
        zapper_chains: config.zapper.chains.clone(),
        pendle_enabled: config.pendle.enabled,
        cache_ttl_secs: config.cache.ttl_secs,
    };
    render(fmt, &output)
}

/// `vantage configure wallet add <address>`
pub fn wallet_add(address: &str) -> Result<()> {
    let address = parse_address(address)?;
    let mut config = load_config()?;

    if config
        .wallets
        .iter()
        .any(|w| w.eq_ignore_ascii_case(&address))
    {
        println!("Wallet {address} is already configured.");
        return Ok(());
    }

    config.wallets.push(address.clone());
    save_config(&config)?;
    println!("✓ Added wallet {address}");
    Ok(())
}

/// `vantage configure wallet remove <address>`
pub fn wallet_remove(address: &str) -> Result<()> {
    let mut config = load_config()?;
    let before = config.wallets.len();
    config
        .wallets
        .retain(|w| !w.eq_ignore_ascii_case(address));

    if config.wallets.len() == before {
        anyhow::bail!("Wallet {address} is not configured.");
    }

    save_config(&config)?;
    println!("✓ Removed wallet {address}");
    Ok(())
}

/// `vantage configure wallet list`
pub fn wallet_list() -> Result<()> {
    let config = load_config()?;
    if config.wallets.is_empty() {
        println!("No wallets configured. Run: vantage configure wallet add <address>");
        return Ok(());
    }
    for wallet in &config.wallets {
        println!("{wallet}");
    }
    Ok(())
}

/// `vantage configure module enable|disable <name>`
pub fn module_set(name: &str, enabled: bool) -> Result<()> {
    let mut config = load_config()?;

    match name {
        "morpho" => config.morpho.enabled = enabled,
        "zapper" => config.zapper.enabled = enabled,
        "pendle" => config.pendle.enabled = enabled,
        _ => anyhow::bail!("Unknown module '{name}'. Available: morpho, zapper, pendle"),
    }

    save_config(&config)?;
    println!(
        "✓ {name} {}",
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}
