//! Zapper transaction history + gas cost.
//!
//! Two REST-over-GraphQL calls joined per transaction: the signer's
//! timeline (hash, network, timestamp) and per-tx details (gas price,
//! gas used). Gas cost is reported in the chain's native unit; USD
//! conversion is a display concern left to callers.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::debug;

use vantage_common::constants::{network_chain_id, ZAPPER_API_BASE};
use vantage_common::error::{VantageError, VantageResult};
use vantage_common::traits::TxHistorySource;
use vantage_common::types::GasSpend;

/// Zapper GraphQL client. Requires an API key.
pub struct ZapperClient {
    http: reqwest::Client,
    api_key: String,
}

impl ZapperClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            api_key: api_key.into(),
        }
    }

    /// Build a client from `ZAPPER_API_KEY`.
    pub fn from_env() -> VantageResult<Self> {
        let key = std::env::var("ZAPPER_API_KEY").map_err(|_| {
            VantageError::Config(
                "ZAPPER_API_KEY not set — transaction history needs a Zapper API key".into(),
            )
        })?;
        Ok(Self::new(key))
    }

    async fn graphql(&self, query: &str, variables: Value) -> VantageResult<Value> {
        let body = json!({ "query": query, "variables": variables });

        let resp = self
            .http
            .post(ZAPPER_API_BASE)
            .header("x-zapper-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VantageError::Network(format!("Zapper API request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| VantageError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(VantageError::Protocol {
                protocol: "zapper".into(),
                message: format!("HTTP {status}: {text}"),
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| VantageError::Other(format!("Parse Zapper response: {e}")))
    }

    async fn tx_history(&self, wallet: &str, chains: &[u64], first: u32) -> VantageResult<Value> {
        let query = r#"
            query TransactionHistoryV2($subjects: [Address!]!, $first: Int, $filters: TransactionHistoryV2FiltersArgs) {
              transactionHistoryV2(subjects: $subjects, perspective: Signer, first: $first, filters: $filters) {
                edges { node { ... on TimelineEventV2 { transaction { hash network timestamp } } } }
              }
            }
        "#;

        let mut filters = json!({});
        if !chains.is_empty() {
            filters["chainIds"] = json!(chains);
        }
        let variables = json!({ "subjects": [wallet], "first": first, "filters": filters });

        self.graphql(query, variables).await
    }

    async fn tx_details(&self, hash: &str, chain_id: u64) -> VantageResult<Value> {
        let query = r#"
            query TransactionDetailsV2($hash: String!, $chainId: Int!) {
              transactionDetailsV2(hash: $hash, chainId: $chainId) {
                transaction { hash gasPrice gas gasUsed blockNumber timestamp }
              }
            }
        "#;

        self.graphql(query, json!({ "hash": hash, "chainId": chain_id }))
            .await
    }
}

#[async_trait]
impl TxHistorySource for ZapperClient {
    async fn recent_transactions(
        &self,
        wallet: &str,
        chains: &[u64],
        first: u32,
    ) -> VantageResult<Vec<GasSpend>> {
        let data = self.tx_history(wallet, chains, first).await?;

        let empty = vec![];
        let edges = data
            .pointer("/data/transactionHistoryV2/edges")
            .and_then(|v| v.as_array())
            .unwrap_or(&empty);

        let mut spends = Vec::new();
        for edge in edges {
            let tx = match edge.pointer("/node/transaction") {
                Some(t) => t,
                None => continue,
            };
            let hash = tx.get("hash").and_then(|v| v.as_str()).unwrap_or("");
            if hash.is_empty() {
                continue;
            }
            let network = tx
                .get("network")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            let timestamp_ms = tx.get("timestamp").and_then(|v| v.as_i64()).unwrap_or(0);
            let chain_id = network_chain_id(&network);

            // best-effort per-tx join — a missing detail record still
            // produces a row, with zero gas
            let detail = match self.tx_details(hash, chain_id).await {
                Ok(d) => d,
                Err(e) => {
                    debug!(hash, error = %e, "tx detail lookup failed");
                    Value::Null
                }
            };
            let t = detail
                .pointer("/data/transactionDetailsV2/0/transaction")
                .or_else(|| detail.pointer("/data/transactionDetailsV2/transaction"))
                .cloned()
                .unwrap_or_default();

            let gas_price_wei = uint_field(&t, "gasPrice");
            let gas_used = match uint_field(&t, "gasUsed") {
                0 => uint_field(&t, "gas"),
                v => v,
            };

            spends.push(GasSpend {
                hash: hash.to_string(),
                network,
                chain_id,
                timestamp_ms,
                gas_used,
                gas_price_wei,
                gas_cost_native: gas_cost_native(gas_price_wei, gas_used),
            });
        }

        Ok(spends)
    }
}

/// gasPrice × gasUsed in wei, rescaled to whole native units (1e18 wei).
pub(crate) fn gas_cost_native(gas_price_wei: u64, gas_used: u64) -> Decimal {
    let wei = gas_price_wei as u128 * gas_used as u128;
    Decimal::from_i128_with_scale(wei as i128, 18).normalize()
}

/// Extract an integer field that may arrive as a number or a string.
pub(crate) fn uint_field(val: &Value, field: &str) -> u64 {
    match val.get(field) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn gas_cost_scales_wei_to_native() {
        // 20 gwei × 21000 gas = 0.00042 native
        assert_eq!(
            gas_cost_native(20_000_000_000, 21_000),
            Decimal::from_str("0.00042").unwrap()
        );
        assert_eq!(gas_cost_native(0, 21_000), Decimal::ZERO);
    }

    #[test]
    fn gas_cost_survives_large_products() {
        // 10000 gwei × 30M gas — far beyond u64 wei in product terms
        let cost = gas_cost_native(10_000_000_000_000, 30_000_000);
        assert_eq!(cost, Decimal::from_str("300").unwrap());
    }

    #[test]
    fn uint_field_number_and_string() {
        let v = json!({ "gasPrice": "20000000000", "gas": 21000, "bad": "x" });
        assert_eq!(uint_field(&v, "gasPrice"), 20_000_000_000);
        assert_eq!(uint_field(&v, "gas"), 21_000);
        assert_eq!(uint_field(&v, "bad"), 0);
        assert_eq!(uint_field(&v, "missing"), 0);
    }
}
