//! Market borrow rates with ordered schema probes.
//!
//! The rate fields of the markets query have moved between API revisions.
//! Rather than pin one shape, an ordered list of known shapes is probed
//! and the first one returning usable data wins. Exhausting all probes is
//! not an error — annotation simply becomes a no-op.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use vantage_common::traits::RateSource;

use crate::client::MorphoClient;

/// One known response shape: the rate selection to request and the
/// item-relative pointer the rate comes back under.
struct RateProbe {
    label: &'static str,
    selection: &'static str,
    pointer: &'static str,
}

const RATE_PROBES: &[RateProbe] = &[
    RateProbe {
        label: "rates.borrowApy",
        selection: "rates { borrowApy }",
        pointer: "/rates/borrowApy",
    },
    RateProbe {
        label: "apy.borrowApy",
        selection: "apy { borrowApy }",
        pointer: "/apy/borrowApy",
    },
    RateProbe {
        label: "state.borrowRate",
        selection: "state { borrowRate }",
        pointer: "/state/borrowRate",
    },
];

#[async_trait]
impl RateSource for MorphoClient {
    async fn borrow_rates(&self, market_keys: &BTreeSet<String>) -> HashMap<String, f64> {
        if market_keys.is_empty() {
            return HashMap::new();
        }

        let keys_clause = market_keys
            .iter()
            .map(|k| format!("\"{k}\""))
            .collect::<Vec<_>>()
            .join(",");

        for probe in RATE_PROBES {
            let query = format!(
                r#"
                {{
                    markets(where: {{ uniqueKey_in: [{keys_clause}] }}) {{
                        items {{
                            uniqueKey
                            {selection}
                        }}
                    }}
                }}
            "#,
                selection = probe.selection,
            );

            let data = match self.graphql(&query).await {
                Ok(d) => d,
                Err(e) => {
                    debug!(probe = probe.label, error = %e, "rate probe failed, trying next shape");
                    continue;
                }
            };

            if data.get("errors").is_some() {
                debug!(probe = probe.label, "rate probe rejected by API, trying next shape");
                continue;
            }

            let empty = vec![];
            let items = data
                .pointer("/data/markets/items")
                .and_then(|v| v.as_array())
                .unwrap_or(&empty);

            let rates = extract_rates(items, probe.pointer);
            if !rates.is_empty() {
                debug!(probe = probe.label, count = rates.len(), "borrow rates resolved");
                return rates;
            }
        }

        warn!("no rate query shape returned usable data; skipping rate annotation");
        HashMap::new()
    }
}

/// Pull `(uniqueKey, rate)` pairs out of a markets item list using an
/// item-relative pointer. Non-finite and missing rates are dropped.
pub(crate) fn extract_rates(items: &[Value], pointer: &str) -> HashMap<String, f64> {
    items
        .iter()
        .filter_map(|item| {
            let key = item.get("uniqueKey").and_then(|v| v.as_str())?;
            let rate = item.pointer(pointer).and_then(|v| v.as_f64())?;
            if !rate.is_finite() {
                return None;
            }
            Some((key.to_string(), rate))
        })
        .collect()
}
