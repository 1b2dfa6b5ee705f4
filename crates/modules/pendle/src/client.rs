//! Pendle portfolio positions — not wired yet.
//!
//! The seam exists so the CLI and config already route to it; the client
//! returns no positions until the Portfolio Positions REST endpoint is
//! integrated. PT/YT/LP holdings and implied APY land here when it is.

use async_trait::async_trait;

use vantage_common::error::VantageResult;
use vantage_common::traits::YieldPositionSource;
use vantage_common::types::YieldPosition;

/// Placeholder Pendle client.
#[derive(Default)]
pub struct PendleClient;

impl PendleClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl YieldPositionSource for PendleClient {
    async fn positions(&self, _wallet: &str) -> VantageResult<Vec<YieldPosition>> {
        Ok(Vec::new())
    }
}
