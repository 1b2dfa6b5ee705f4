//! Unified output rendering: JSON or human-readable table.
//!
//! Usage:
//! ```ignore
//! use vantage_utils::output::{OutputFormat, render};
//!
//! let data = PositionsOutput { ... };
//! render(format, &data)?;
//! ```

use anyhow::Result;
use serde::Serialize;

use crate::format::{format_amount, format_rate_pct, format_usd};
use vantage_types::output::*;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default).
    Table,
    /// Compact JSON (for piping to jq, scripts).
    Json,
    /// Pretty-printed JSON (for reading).
    JsonPretty,
}

/// Trait for types that can render as a human-readable table.
pub trait TableDisplay {
    fn print_table(&self);
}

/// Render structured output — JSON or table depending on format.
pub fn render<T: Serialize + TableDisplay>(format: OutputFormat, data: &T) -> Result<()> {
    match format {
        OutputFormat::Table => {
            data.print_table();
            Ok(())
        }
        OutputFormat::Json => {
            let json = serde_json::to_string(data)?;
            println!("{json}");
            Ok(())
        }
        OutputFormat::JsonPretty => {
            let json = serde_json::to_string_pretty(data)?;
            println!("{json}");
            Ok(())
        }
    }
}

/// Shorten an opaque market key for table display.
fn short_key(key: &str) -> String {
    if key.len() > 14 {
        format!("{}…", &key[..13])
    } else {
        key.to_string()
    }
}

// ─── TableDisplay implementations ───────────────────────────────────

impl TableDisplay for PositionsOutput {
    fn print_table(&self) {
        println!("Wallet {}", self.wallet);

        if self.rows.is_empty() {
            println!("No positions detected for this wallet (or all filtered).");
            return;
        }

        println!("┌────────────────┬──────────────────┬──────────────┬──────────────┬──────────────┬──────────────┬───────┐");
        println!("│ Market         │ Pair             │ Supply USD   │ Borrow USD   │ Coll. Amt    │ Coll. USD    │ Trust │");
        println!("├────────────────┼──────────────────┼──────────────┼──────────────┼──────────────┼──────────────┼───────┤");
        for r in &self.rows {
            let pair = format!("{}/{}", r.collateral, r.loan);
            println!(
                "│ {:<14} │ {:<16} │ {:>12} │ {:>12} │ {:>12} │ {:>12} │ {:^5} │",
                short_key(&r.market_key),
                pair,
                format_usd(r.supply_usd),
                format_usd(r.borrow_usd),
                format_amount(r.collateral_amount),
                format_usd(r.collateral_usd),
                if r.whitelisted { "✓" } else { "✗" },
            );
        }
        println!("└────────────────┴──────────────────┴──────────────┴──────────────┴──────────────┴──────────────┴───────┘");
        println!(
            "Supply ${}  Borrow ${}  Collateral ${}  Net ${}",
            format_usd(self.totals.supply_usd),
            format_usd(self.totals.borrow_usd),
            format_usd(self.totals.collateral_usd),
            format_usd(self.totals.net_usd),
        );
    }
}

impl TableDisplay for AggregateOutput {
    fn print_table(&self) {
        if self.rows.is_empty() {
            println!("No positions across {} wallet(s).", self.wallets.len());
            return;
        }

        println!("┌────────────────┬──────────────────┬──────────────┬──────────────┬─────────┬──────────┬───────┐");
        println!("│ Market         │ Pair             │ Supply USD   │ Borrow USD   │ LTV     │ Rate     │ Trust │");
        println!("├────────────────┼──────────────────┼──────────────┼──────────────┼─────────┼──────────┼───────┤");
        for r in &self.rows {
            let pair = format!("{}/{}", r.collateral, r.loan);
            let ltv = r
                .ltv
                .map(|v| format!("{:.1}%", v * rust_decimal::Decimal::ONE_HUNDRED))
                .unwrap_or_else(|| "—".into());
            let rate = r
                .borrow_rate
                .map(format_rate_pct)
                .unwrap_or_else(|| "—".into());
            println!(
                "│ {:<14} │ {:<16} │ {:>12} │ {:>12} │ {:>7} │ {:>8} │ {:^5} │",
                short_key(&r.market_key),
                pair,
                format_usd(r.supply_usd),
                format_usd(r.borrow_usd),
                ltv,
                rate,
                if r.whitelisted { "✓" } else { "✗" },
            );
        }
        println!("└────────────────┴──────────────────┴──────────────┴──────────────┴─────────┴──────────┴───────┘");
        println!(
            "{} wallet(s) — Supply ${}  Borrow ${}  Net ${}",
            self.wallets.len(),
            format_usd(self.totals.supply_usd),
            format_usd(self.totals.borrow_usd),
            format_usd(self.totals.net_usd),
        );
    }
}

impl TableDisplay for RatesOutput {
    fn print_table(&self) {
        if self.rows.is_empty() {
            println!("No borrow rates available.");
            return;
        }

        println!("┌──────────────────────────────────────────────────────────────────┬──────────┐");
        println!("│ Market                                                           │ Borrow   │");
        println!("├──────────────────────────────────────────────────────────────────┼──────────┤");
        for r in &self.rows {
            let rate = r
                .borrow_rate
                .map(format_rate_pct)
                .unwrap_or_else(|| "—".into());
            println!("│ {:<64} │ {:>8} │", r.market_key, rate);
        }
        println!("└──────────────────────────────────────────────────────────────────┴──────────┘");
    }
}

impl TableDisplay for GasOutput {
    fn print_table(&self) {
        println!("Wallet {}", self.wallet);

        if self.rows.is_empty() {
            println!("No recent signer transactions found.");
            return;
        }

        println!("┌────────────────┬──────────────────┬──────────────────┬──────────┬──────────────┐");
        println!("│ Tx             │ Network          │ Time             │ Gas Used │ Cost (native)│");
        println!("├────────────────┼──────────────────┼──────────────────┼──────────┼──────────────┤");
        for r in &self.rows {
            println!(
                "│ {:<14} │ {:<16} │ {:<16} │ {:>8} │ {:>12.6} │",
                short_key(&r.hash),
                r.network,
                r.time,
                r.gas_used,
                r.gas_cost_native,
            );
        }
        println!("└────────────────┴──────────────────┴──────────────────┴──────────┴──────────────┘");
        println!("Sum gas (native): {:.6}", self.total_gas_native);
    }
}

impl TableDisplay for StatusOutput {
    fn print_table(&self) {
        if self.wallets.is_empty() {
            println!("No wallets configured. Run: vantage configure wallet add <address>");
            return;
        }

        println!("┌────────────────┬─────────┬──────────────┬──────────────┬──────────────┬──────────────┐");
        println!("│ Wallet         │ Markets │ Supply USD   │ Borrow USD   │ Coll. USD    │ Net USD      │");
        println!("├────────────────┼─────────┼──────────────┼──────────────┼──────────────┼──────────────┤");
        for w in &self.wallets {
            if let Some(err) = &w.error {
                println!("│ {:<14} │ {:<73} │", short_key(&w.wallet), format!("query failed: {err}"));
                continue;
            }
            println!(
                "│ {:<14} │ {:>7} │ {:>12} │ {:>12} │ {:>12} │ {:>12} │",
                short_key(&w.wallet),
                w.markets,
                format_usd(w.supply_usd),
                format_usd(w.borrow_usd),
                format_usd(w.collateral_usd),
                format_usd(w.net_usd),
            );
        }
        println!("└────────────────┴─────────┴──────────────┴──────────────┴──────────────┴──────────────┘");
    }
}

impl TableDisplay for ConfigOutput {
    fn print_table(&self) {
        println!("╔══════════════════════════════════════════════════════════╗");
        println!("║  VANTAGE CONFIGURATION                                 ║");
        println!("╠══════════════════════════════════════════════════════════╣");
        println!("║  Wallets       : {:<40}║", self.wallets.len());
        for w in &self.wallets {
            println!("║    {:<54}║", w);
        }
        println!("║  Morpho        : {:<40}║", on_off(self.morpho_enabled));
        println!("║    Chains      : {:<40}║", join_u64(&self.morpho_chains));
        println!("║    Recompute   : {:<40}║", on_off(self.recompute_usd));
        println!("║    Untrusted   : {:<40}║", on_off(self.include_untrusted));
        println!("║  Zapper        : {:<40}║", on_off(self.zapper_enabled));
        println!("║    Chains      : {:<40}║", join_u64(&self.zapper_chains));
        println!("║  Pendle        : {:<40}║", on_off(self.pendle_enabled));
        println!("║  Cache TTL     : {:<40}║", format!("{}s", self.cache_ttl_secs));
        println!("╚══════════════════════════════════════════════════════════╝");
    }
}

fn on_off(v: bool) -> &'static str {
    if v {
        "enabled"
    } else {
        "disabled"
    }
}

fn join_u64(values: &[u64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn empty_totals() -> WalletTotals {
        WalletTotals {
            supply_usd: Decimal::ZERO,
            borrow_usd: Decimal::ZERO,
            collateral_usd: Decimal::ZERO,
            net_usd: Decimal::ZERO,
        }
    }

    #[test]
    fn render_json_does_not_panic() {
        let data = PositionsOutput {
            wallet: "0xabc".into(),
            rows: vec![],
            totals: empty_totals(),
        };
        render(OutputFormat::Json, &data).unwrap();
    }

    #[test]
    fn render_table_does_not_panic() {
        let data = StatusOutput { wallets: vec![] };
        render(OutputFormat::Table, &data).unwrap();
    }

    #[test]
    fn short_key_truncates() {
        let key = "0x8f46cf552e06bbac6b3de1d1b24a4e2e4376bdcd8bb2dd2a4dbd25bda4a4fcba";
        let short = short_key(key);
        assert!(short.ends_with('…'));
        assert!(short.chars().count() == 14);
        assert_eq!(short_key("1-abc"), "1-abc");
    }
}
