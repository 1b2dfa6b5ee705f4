//! The core engine: owns the protocol clients, the TTL caches, and the
//! fetch → reconcile → aggregate → annotate wiring.
//!
//! Price and rate lookups are fronted by keyed TTL caches so repeated
//! invocations within the cache lifetime do not re-hit the upstream
//! APIs. Refreshes are idempotent (same inputs, same outputs), so
//! concurrent refreshes of one key need no coordination beyond the
//! cache's own write atomicity.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use rust_decimal::Decimal;
use tracing::warn;

use vantage_common::error::VantageResult;
use vantage_common::traits::{PositionSource, PriceOracle, RateSource};
use vantage_common::types::{AggregatedRow, RawPosition, ReconciledPosition};
use vantage_mod_defillama::LlamaPriceClient;
use vantage_mod_morpho::MorphoClient;
use vantage_types::config::AppConfig;

use crate::aggregate::{aggregate, annotate_rates, AggregateOptions};
use crate::reconcile::{reconcile, ReconcileOptions};

pub struct Engine {
    pub config: AppConfig,
    morpho: MorphoClient,
    oracle: LlamaPriceClient,
    price_cache: Cache<String, Arc<HashMap<String, Decimal>>>,
    rate_cache: Cache<String, Arc<HashMap<String, f64>>>,
}

impl Engine {
    pub fn new(config: AppConfig) -> Self {
        let ttl = Duration::from_secs(config.cache.ttl_secs.max(1));
        Self {
            morpho: MorphoClient::new(),
            oracle: LlamaPriceClient::new(),
            price_cache: Cache::builder()
                .max_capacity(64)
                .time_to_live(ttl)
                .build(),
            rate_cache: Cache::builder()
                .max_capacity(64)
                .time_to_live(ttl)
                .build(),
            config,
        }
    }

    /// Reconciliation options from config.
    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            recompute_usd: self.config.morpho.recompute_usd,
            include_untrusted: self.config.morpho.include_untrusted,
        }
    }

    /// Fetch and reconcile one wallet's positions.
    ///
    /// A wallet with no positions yields an empty `Vec`; only transport
    /// and protocol failures propagate.
    pub async fn wallet_positions(
        &self,
        wallet: &str,
        options: ReconcileOptions,
    ) -> VantageResult<Vec<ReconciledPosition>> {
        let raw = self
            .morpho
            .positions(wallet, &self.config.morpho.chains)
            .await?;

        let prices = if options.recompute_usd {
            let prices = self.prices_for(&raw).await;
            if prices.is_empty() && !raw.is_empty() {
                warn!(wallet, "no spot prices available; USD figures fall back to API-reported values");
            }
            prices
        } else {
            Arc::new(HashMap::new())
        };

        Ok(reconcile(wallet, &raw, &prices, options))
    }

    /// Spot prices for every priceable asset in the raw set, via cache.
    async fn prices_for(&self, raw: &[RawPosition]) -> Arc<HashMap<String, Decimal>> {
        let keys = price_keys(raw);
        if keys.is_empty() {
            return Arc::new(HashMap::new());
        }

        let cache_key = keys.iter().cloned().collect::<Vec<_>>().join(",");
        self.price_cache
            .get_with(cache_key, async { Arc::new(self.oracle.prices(&keys).await) })
            .await
    }

    /// Borrow rates for a set of markets, via cache. Never fails — an
    /// unreachable rate API means an empty map.
    pub async fn borrow_rates(&self, market_keys: BTreeSet<String>) -> Arc<HashMap<String, f64>> {
        if market_keys.is_empty() {
            return Arc::new(HashMap::new());
        }

        let cache_key = market_keys.iter().cloned().collect::<Vec<_>>().join(",");
        self.rate_cache
            .get_with(cache_key, async {
                Arc::new(RateSource::borrow_rates(&self.morpho, &market_keys).await)
            })
            .await
    }

    /// Aggregate reconciled rows across wallets and attach borrow rates.
    pub async fn aggregate_with_rates(
        &self,
        rows: &[ReconciledPosition],
        options: AggregateOptions,
    ) -> Vec<AggregatedRow> {
        let mut agg = aggregate(rows, options);
        let keys: BTreeSet<String> = agg.iter().map(|r| r.market_key.clone()).collect();
        let rates = self.borrow_rates(keys).await;
        annotate_rates(&mut agg, &rates);
        agg
    }
}

/// Distinct price-oracle keys for a raw position set. Assets on unmapped
/// chains or without an address contribute nothing.
pub(crate) fn price_keys(raw: &[RawPosition]) -> BTreeSet<String> {
    raw.iter()
        .flat_map(|p| {
            [
                p.market.loan_price_key(),
                p.market.collateral_price_key(),
            ]
        })
        .flatten()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_common::types::{Asset, MarketRef};

    fn raw(key: &str, loan_addr: &str, coll_addr: &str) -> RawPosition {
        RawPosition {
            market: MarketRef {
                unique_key: key.to_string(),
                chain_id: None,
                whitelisted: true,
                loan_asset: Asset::new("USDC", loan_addr, 6),
                collateral_asset: Asset::new("WETH", coll_addr, 18),
            },
            owner: "0xa".into(),
            supply_assets: Decimal::ZERO,
            supply_usd_api: Decimal::ZERO,
            borrow_assets: Decimal::ZERO,
            borrow_usd_api: Decimal::ZERO,
            collateral: Decimal::ZERO,
            collateral_usd_api: Decimal::ZERO,
        }
    }

    #[test]
    fn price_keys_deduplicate_and_skip_unpriceable() {
        let positions = vec![
            raw("1-0xm1", "0xaaa", "0xbbb"),
            raw("1-0xm2", "0xaaa", ""),            // same loan asset, no collateral address
            raw("137-0xm3", "0xccc", "0xddd"),     // unmapped chain
            raw("0xnochain", "0xeee", "0xfff"),    // no chain prefix at all
        ];
        let keys = price_keys(&positions);
        assert_eq!(
            keys.into_iter().collect::<Vec<_>>(),
            vec!["ethereum:0xaaa".to_string(), "ethereum:0xbbb".to_string()]
        );
    }

    #[test]
    fn reconcile_options_come_from_config() {
        let mut config = AppConfig::default();
        config.morpho.recompute_usd = true;
        config.morpho.include_untrusted = true;
        let engine = Engine::new(config);
        let options = engine.reconcile_options();
        assert!(options.recompute_usd);
        assert!(options.include_untrusted);
    }
}
