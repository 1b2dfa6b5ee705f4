//! Position reconciliation.
//!
//! Turns raw per-market records for one wallet into a deduplicated,
//! sanity-checked set of rows with normalized amounts and trustworthy
//! USD figures. Pure given a price map — all I/O happens upstream.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use tracing::debug;

use vantage_common::constants::USD_SANITY_CEILING;
use vantage_common::types::{RawPosition, ReconciledPosition};

use crate::normalize::normalize_amount;

/// Knobs for the reconciliation pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Recompute USD figures from spot prices (per-asset fallback to the
    /// API-reported value when no price is available).
    pub recompute_usd: bool,
    /// Keep non-whitelisted markets.
    pub include_untrusted: bool,
}

/// Reconcile one wallet's raw positions.
///
/// Per record, in order: ownership guard, dedup by market key
/// (first-seen wins), trust filter, amount normalization, USD
/// resolution, and the oracle-glitch ceiling. Discards are silent apart
/// from debug diagnostics; they are data hygiene, not errors.
pub fn reconcile(
    wallet: &str,
    raw_positions: &[RawPosition],
    prices: &HashMap<String, Decimal>,
    options: ReconcileOptions,
) -> Vec<ReconciledPosition> {
    let mut seen_keys: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();

    for p in raw_positions {
        // upstream filters have been observed to leak other users' rows
        if !p.owner.eq_ignore_ascii_case(wallet) {
            debug!(
                wallet,
                owner = %p.owner,
                market = %p.market.unique_key,
                "dropping record owned by another address"
            );
            continue;
        }

        if !seen_keys.insert(p.market.unique_key.as_str()) {
            debug!(market = %p.market.unique_key, "dropping duplicate market record");
            continue;
        }

        if !options.include_untrusted && !p.market.whitelisted {
            continue;
        }

        let supply_amount = normalize_amount(p.supply_assets, p.market.loan_asset.decimals);
        let borrow_amount = normalize_amount(p.borrow_assets, p.market.loan_asset.decimals);
        let collateral_amount =
            normalize_amount(p.collateral, p.market.collateral_asset.decimals);

        let (supply_usd, borrow_usd, collateral_usd) = if options.recompute_usd {
            let loan_price = lookup(prices, p.market.loan_price_key());
            let collateral_price = lookup(prices, p.market.collateral_price_key());

            // two independent tiers: spot price when quoted, otherwise the
            // API-reported figure
            let (supply_usd, borrow_usd) = if loan_price.is_zero() {
                (p.supply_usd_api, p.borrow_usd_api)
            } else {
                (supply_amount * loan_price, borrow_amount * loan_price)
            };
            let collateral_usd = if collateral_price.is_zero() {
                p.collateral_usd_api
            } else {
                collateral_amount * collateral_price
            };
            (supply_usd, borrow_usd, collateral_usd)
        } else {
            (p.supply_usd_api, p.borrow_usd_api, p.collateral_usd_api)
        };

        let ceiling = Decimal::from(USD_SANITY_CEILING);
        if supply_usd.max(borrow_usd).max(collateral_usd) > ceiling {
            debug!(
                market = %p.market.unique_key,
                %supply_usd,
                %borrow_usd,
                %collateral_usd,
                "dropping position with aberrant USD value"
            );
            continue;
        }

        out.push(ReconciledPosition {
            wallet: wallet.to_string(),
            market_key: p.market.unique_key.clone(),
            loan_symbol: p.market.loan_asset.symbol.clone(),
            collateral_symbol: p.market.collateral_asset.symbol.clone(),
            supply_amount,
            supply_usd,
            borrow_amount,
            borrow_usd,
            collateral_amount,
            collateral_usd,
            whitelisted: p.market.whitelisted,
        });
    }

    out
}

fn lookup(prices: &HashMap<String, Decimal>, key: Option<String>) -> Decimal {
    key.and_then(|k| prices.get(&k))
        .copied()
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use vantage_common::types::{Asset, MarketRef};

    const WALLET: &str = "0xCCeE77e74C4466DF0dA0ec85F2D3505956fD6Fa7";
    const USDC: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
    const WSTETH: &str = "0x7f39c581f595b53c5cb19bd0b3f8da6c935e2ca0";

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn market(key: &str, whitelisted: bool) -> MarketRef {
        MarketRef {
            unique_key: key.to_string(),
            chain_id: None,
            whitelisted,
            loan_asset: Asset::new("USDC", USDC, 6),
            collateral_asset: Asset::new("wstETH", WSTETH, 18),
        }
    }

    fn raw(key: &str, whitelisted: bool) -> RawPosition {
        RawPosition {
            market: market(key, whitelisted),
            owner: WALLET.to_string(),
            supply_assets: Decimal::ZERO,
            supply_usd_api: Decimal::ZERO,
            borrow_assets: dec("500000000"), // 500 USDC atomic
            borrow_usd_api: dec("500.25"),
            collateral: dec("200000000000000000000"), // 200 wstETH atomic
            collateral_usd_api: dec("700000"),
        }
    }

    #[test]
    fn end_to_end_trusted_only_api_usd() {
        let positions = vec![raw("1-0xm1", true), raw("1-0xm2", false)];
        let rows = reconcile(WALLET, &positions, &HashMap::new(), ReconcileOptions::default());

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.market_key, "1-0xm1");
        assert_eq!(row.borrow_amount, dec("500"));
        assert_eq!(row.collateral_amount, dec("200"));
        assert_eq!(row.borrow_usd, dec("500.25"));
    }

    #[test]
    fn untrusted_markets_kept_on_request() {
        let positions = vec![raw("1-0xm1", true), raw("1-0xm2", false)];
        let options = ReconcileOptions {
            include_untrusted: true,
            ..Default::default()
        };
        let rows = reconcile(WALLET, &positions, &HashMap::new(), options);
        assert_eq!(rows.len(), 2);
        assert!(!rows[1].whitelisted);
    }

    #[test]
    fn duplicate_market_keys_collapse_first_wins() {
        let mut second = raw("1-0xm1", true);
        second.borrow_usd_api = dec("999999");
        let positions = vec![raw("1-0xm1", true), second];

        let rows = reconcile(WALLET, &positions, &HashMap::new(), ReconcileOptions::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].borrow_usd, dec("500.25"));
    }

    #[test]
    fn ownership_is_case_insensitive() {
        let mut p = raw("1-0xm1", true);
        p.owner = WALLET.to_uppercase().replace("0X", "0x");
        let rows = reconcile(WALLET, &[p], &HashMap::new(), ReconcileOptions::default());
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn foreign_records_are_discarded() {
        let mut p = raw("1-0xm1", true);
        p.owner = "0x0000000000000000000000000000000000000001".to_string();
        let rows = reconcile(WALLET, &[p], &HashMap::new(), ReconcileOptions::default());
        assert!(rows.is_empty());
    }

    #[test]
    fn outlier_positions_are_dropped_entirely() {
        let mut p = raw("1-0xm1", true);
        p.collateral_usd_api = dec("200000000000"); // 2e11
        let rows = reconcile(WALLET, &[p], &HashMap::new(), ReconcileOptions::default());
        assert!(rows.is_empty());
    }

    #[test]
    fn ceiling_itself_is_not_an_outlier() {
        let mut p = raw("1-0xm1", true);
        p.collateral_usd_api = Decimal::from(USD_SANITY_CEILING);
        let rows = reconcile(WALLET, &[p], &HashMap::new(), ReconcileOptions::default());
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn recompute_empty_price_map_falls_back_to_api_values() {
        let options = ReconcileOptions {
            recompute_usd: true,
            ..Default::default()
        };
        let rows = reconcile(WALLET, &[raw("1-0xm1", true)], &HashMap::new(), options);

        let row = &rows[0];
        assert_eq!(row.supply_usd, Decimal::ZERO);
        assert_eq!(row.borrow_usd, dec("500.25"));
        assert_eq!(row.collateral_usd, dec("700000"));
    }

    #[test]
    fn recompute_uses_spot_prices_when_quoted() {
        let mut prices = HashMap::new();
        prices.insert(format!("ethereum:{USDC}"), dec("1"));
        prices.insert(format!("ethereum:{WSTETH}"), dec("3500"));

        let options = ReconcileOptions {
            recompute_usd: true,
            ..Default::default()
        };
        let rows = reconcile(WALLET, &[raw("1-0xm1", true)], &prices, options);

        let row = &rows[0];
        assert_eq!(row.borrow_usd, dec("500"));
        assert_eq!(row.collateral_usd, dec("700000")); // 200 × 3500
    }

    #[test]
    fn per_asset_fallback_is_independent() {
        // loan priced, collateral not → collateral falls back to API USD
        let mut prices = HashMap::new();
        prices.insert(format!("ethereum:{USDC}"), dec("1"));

        let options = ReconcileOptions {
            recompute_usd: true,
            ..Default::default()
        };
        let rows = reconcile(WALLET, &[raw("1-0xm1", true)], &prices, options);

        let row = &rows[0];
        assert_eq!(row.borrow_usd, dec("500"));
        assert_eq!(row.collateral_usd, dec("700000"));
    }

    #[test]
    fn recompute_applies_ceiling_to_recomputed_values() {
        let mut prices = HashMap::new();
        prices.insert(format!("ethereum:{WSTETH}"), dec("2000000000000")); // broken oracle

        let options = ReconcileOptions {
            recompute_usd: true,
            ..Default::default()
        };
        let rows = reconcile(WALLET, &[raw("1-0xm1", true)], &prices, options);
        assert!(rows.is_empty());
    }
}
