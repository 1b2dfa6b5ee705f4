//! Morpho Blue position source.
//!
//! Strict per-user positions via the filtered `marketPositions` list
//! query. The API has been observed to ignore its own `where` clause on
//! occasion, so results are hard-filtered by wallet again downstream.

use async_trait::async_trait;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use vantage_common::constants::MORPHO_API_BASE;
use vantage_common::error::{VantageError, VantageResult};
use vantage_common::traits::PositionSource;
use vantage_common::types::{Asset, MarketRef, RawPosition};

/// Morpho Blue GraphQL client.
pub struct MorphoClient {
    http: reqwest::Client,
}

impl Default for MorphoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MorphoClient {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("Failed to build HTTP client");

        Self { http }
    }

    /// Execute a GraphQL query and return the raw response document.
    pub(crate) async fn graphql(&self, query: &str) -> VantageResult<Value> {
        let body = serde_json::json!({ "query": query });

        let resp = self
            .http
            .post(MORPHO_API_BASE)
            .json(&body)
            .send()
            .await
            .map_err(|e| VantageError::Network(format!("Morpho API request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| VantageError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(VantageError::Protocol {
                protocol: "morpho".into(),
                message: format!("HTTP {status}: {text}"),
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| VantageError::Other(format!("Parse Morpho response: {e}")))
    }
}

#[async_trait]
impl PositionSource for MorphoClient {
    fn protocol(&self) -> &'static str {
        "morpho"
    }

    async fn positions(&self, wallet: &str, chains: &[u64]) -> VantageResult<Vec<RawPosition>> {
        let chains_clause = if chains.is_empty() {
            String::new()
        } else {
            let joined = chains
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(",");
            format!(", chainId_in: [{joined}]")
        };

        let query = format!(
            r#"
            {{
                marketPositions(
                    first: 300,
                    where: {{ userAddress_in: ["{wallet}"]{chains_clause} }}
                ) {{
                    items {{
                        market {{
                            uniqueKey
                            whitelisted
                            loanAsset {{ symbol address decimals }}
                            collateralAsset {{ symbol address decimals }}
                        }}
                        user {{ address }}
                        state {{
                            supplyAssets
                            supplyAssetsUsd
                            borrowAssets
                            borrowAssetsUsd
                            collateral
                            collateralUsd
                        }}
                    }}
                }}
            }}
        "#
        );

        let data = self.graphql(&query).await?;

        // GraphQL-level errors: a missing user is an empty result, anything
        // else is a real fetch failure.
        if let Some(errors) = data.get("errors").and_then(|v| v.as_array()) {
            let msgs = errors
                .iter()
                .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
                .collect::<Vec<_>>()
                .join(", ");
            if msgs.contains("NOT_FOUND") || msgs.contains("No results matching") {
                debug!(wallet, "no positions for wallet");
                return Ok(Vec::new());
            }
            return Err(VantageError::Protocol {
                protocol: "morpho".into(),
                message: msgs,
            });
        }

        let empty = vec![];
        let items = data
            .pointer("/data/marketPositions/items")
            .and_then(|v| v.as_array())
            .unwrap_or(&empty);

        Ok(items.iter().filter_map(parse_position).collect())
    }
}

/// Parse one `marketPositions` item. Records without a market key are
/// unusable and skipped.
pub(crate) fn parse_position(item: &Value) -> Option<RawPosition> {
    let market = item.get("market")?;
    let unique_key = market.get("uniqueKey").and_then(|v| v.as_str())?;
    if unique_key.is_empty() {
        return None;
    }

    let owner = item
        .pointer("/user/address")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let state = item.get("state").cloned().unwrap_or_default();

    Some(RawPosition {
        market: MarketRef {
            unique_key: unique_key.to_string(),
            chain_id: market.get("chainId").and_then(|v| v.as_u64()),
            // absent flag means "not flagged untrusted"
            whitelisted: market
                .get("whitelisted")
                .and_then(|v| v.as_bool())
                .unwrap_or(true),
            loan_asset: parse_asset(market.get("loanAsset")),
            collateral_asset: parse_asset(market.get("collateralAsset")),
        },
        owner,
        supply_assets: decimal_field(&state, "supplyAssets"),
        supply_usd_api: decimal_field(&state, "supplyAssetsUsd"),
        borrow_assets: decimal_field(&state, "borrowAssets"),
        borrow_usd_api: decimal_field(&state, "borrowAssetsUsd"),
        collateral: decimal_field(&state, "collateral"),
        collateral_usd_api: decimal_field(&state, "collateralUsd"),
    })
}

fn parse_asset(val: Option<&Value>) -> Asset {
    let symbol = val
        .and_then(|v| v.get("symbol"))
        .and_then(|v| v.as_str())
        .unwrap_or("?");
    let address = val
        .and_then(|v| v.get("address"))
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let decimals = val
        .and_then(|v| v.get("decimals"))
        .and_then(|v| v.as_u64())
        .unwrap_or(18) as u32;
    Asset::new(symbol, address, decimals)
}

/// Extract a numeric field that may arrive as a JSON number or as a
/// stringified big integer. Null/absent/malformed all collapse to zero.
pub(crate) fn decimal_field(val: &Value, field: &str) -> Decimal {
    match val.get(field) {
        Some(Value::String(s)) => Decimal::from_str(s)
            .ok()
            .or_else(|| s.parse::<f64>().ok().and_then(Decimal::from_f64))
            .unwrap_or(Decimal::ZERO),
        Some(Value::Number(n)) => n
            .as_f64()
            .and_then(Decimal::from_f64)
            .unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_position_item() {
        let item = json!({
            "market": {
                "uniqueKey": "1-0xb323495f7e4148be5643a4ea4a8221eef163e4bccfdedc2a6f4696baacbc86cc",
                "whitelisted": true,
                "loanAsset": { "symbol": "USDC", "address": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "decimals": 6 },
                "collateralAsset": { "symbol": "wstETH", "address": "0x7f39c581f595b53c5cb19bd0b3f8da6c935e2ca0", "decimals": 18 }
            },
            "user": { "address": "0xCCeE77e74C4466DF0dA0ec85F2D3505956fD6Fa7" },
            "state": {
                "supplyAssets": "0",
                "supplyAssetsUsd": 0,
                "borrowAssets": "5000000",
                "borrowAssetsUsd": 5.0,
                "collateral": "2000000000000000000",
                "collateralUsd": 7000.5
            }
        });

        let p = parse_position(&item).unwrap();
        assert_eq!(p.owner, "0xCCeE77e74C4466DF0dA0ec85F2D3505956fD6Fa7");
        assert!(p.market.whitelisted);
        assert_eq!(p.market.loan_asset.decimals, 6);
        assert_eq!(
            p.market.loan_asset.address,
            "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
        );
        assert_eq!(p.borrow_assets, Decimal::from(5_000_000u64));
        assert_eq!(p.borrow_usd_api, Decimal::from(5u64));
        assert_eq!(p.market.resolved_chain_id(), Some(1));
    }

    #[test]
    fn missing_state_fields_are_zero() {
        let item = json!({
            "market": {
                "uniqueKey": "1-0xabc",
                "loanAsset": { "symbol": "DAI" }
            },
            "user": { "address": "0x1" }
        });

        let p = parse_position(&item).unwrap();
        assert_eq!(p.supply_assets, Decimal::ZERO);
        assert_eq!(p.borrow_usd_api, Decimal::ZERO);
        // decimals default to 18 when the API omits them
        assert_eq!(p.market.loan_asset.decimals, 18);
        assert_eq!(p.market.collateral_asset.symbol, "?");
        // absent whitelist flag means trusted
        assert!(p.market.whitelisted);
    }

    #[test]
    fn explicit_chain_id_wins_over_key_prefix() {
        let item = json!({
            "market": {
                "uniqueKey": "1-0xabc",
                "chainId": 8453,
                "loanAsset": { "symbol": "USDC", "decimals": 6 }
            },
            "user": { "address": "0x1" }
        });
        let p = parse_position(&item).unwrap();
        assert_eq!(p.market.resolved_chain_id(), Some(8453));
    }

    #[test]
    fn item_without_market_key_is_skipped() {
        assert!(parse_position(&json!({ "user": { "address": "0x1" } })).is_none());
        assert!(parse_position(&json!({ "market": { "uniqueKey": "" } })).is_none());
    }

    #[test]
    fn decimal_field_handles_big_integer_strings() {
        let v = json!({ "amount": "123456789012345678901234567" });
        assert_eq!(
            decimal_field(&v, "amount"),
            Decimal::from_str("123456789012345678901234567").unwrap()
        );
    }

    #[test]
    fn decimal_field_malformed_is_zero() {
        let v = json!({ "amount": "not-a-number", "nested": {} });
        assert_eq!(decimal_field(&v, "amount"), Decimal::ZERO);
        assert_eq!(decimal_field(&v, "nested"), Decimal::ZERO);
        assert_eq!(decimal_field(&v, "missing"), Decimal::ZERO);
    }
}
