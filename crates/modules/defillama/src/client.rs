//! DeFiLlama spot price adapter.
//!
//! One batched `GET /prices/current/<keys>` per call, keys in the
//! `"<chainSlug>:<address>"` form. Strictly best-effort: any failure
//! degrades to an empty map and the reconciler falls back to
//! API-reported USD values. No retry — an external TTL cache fronts
//! this client.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use vantage_common::constants::LLAMA_PRICE_BASE;
use vantage_common::traits::PriceOracle;

/// DeFiLlama HTTP client.
pub struct LlamaPriceClient {
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    coins: HashMap<String, CoinPrice>,
}

#[derive(Debug, Deserialize)]
struct CoinPrice {
    price: f64,
}

impl Default for LlamaPriceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LlamaPriceClient {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("Failed to build HTTP client");

        Self { http }
    }

    async fn try_fetch(&self, joined: &str) -> reqwest::Result<PriceResponse> {
        let url = format!("{LLAMA_PRICE_BASE}/{joined}");
        self.http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<PriceResponse>()
            .await
    }
}

#[async_trait]
impl PriceOracle for LlamaPriceClient {
    async fn prices(&self, keys: &BTreeSet<String>) -> HashMap<String, Decimal> {
        if keys.is_empty() {
            return HashMap::new();
        }

        let joined = keys.iter().cloned().collect::<Vec<_>>().join(",");

        let resp = match self.try_fetch(&joined).await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "price fetch failed; falling back to API-reported USD");
                return HashMap::new();
            }
        };

        convert_prices(resp.coins)
    }
}

/// Keep only finite, positive quotes — a zero price is indistinguishable
/// from "absent" downstream.
fn convert_prices(coins: HashMap<String, CoinPrice>) -> HashMap<String, Decimal> {
    coins
        .into_iter()
        .filter_map(|(key, coin)| {
            if !coin.price.is_finite() || coin.price <= 0.0 {
                return None;
            }
            Decimal::from_f64(coin.price).map(|p| (key, p))
        })
        .collect()
}
