//! Universal constants for Vantage.

/// Morpho Blue GraphQL API.
pub const MORPHO_API_BASE: &str = "https://blue-api.morpho.org/graphql";

/// DeFiLlama current-price endpoint (keys appended as a path segment).
pub const LLAMA_PRICE_BASE: &str = "https://coins.llama.fi/prices/current";

/// Zapper public GraphQL API.
pub const ZAPPER_API_BASE: &str = "https://public.zapper.xyz/graphql";

/// USD sanity ceiling — any position reporting a USD figure above this is
/// an oracle glitch and is dropped, not clamped.
pub const USD_SANITY_CEILING: u64 = 100_000_000_000;

/// Chains the price oracle can quote. Tokens on other chains are left to
/// the API-reported USD fallback.
pub fn chain_slug(chain_id: u64) -> Option<&'static str> {
    match chain_id {
        1 => Some("ethereum"),
        8453 => Some("base"),
        42161 => Some("arbitrum"),
        _ => None,
    }
}

/// Map the history indexer's network names onto chain ids. Unknown
/// networks fall back to Ethereum mainnet.
pub fn network_chain_id(network: &str) -> u64 {
    match network {
        "ETHEREUM_MAINNET" => 1,
        "ARBITRUM_MAINNET" => 42161,
        "BASE_MAINNET" => 8453,
        "POLYGON_POS" => 137,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_cover_supported_chains() {
        assert_eq!(chain_slug(1), Some("ethereum"));
        assert_eq!(chain_slug(8453), Some("base"));
        assert_eq!(chain_slug(42161), Some("arbitrum"));
        assert_eq!(chain_slug(10), None);
    }

    #[test]
    fn network_names_map_to_chain_ids() {
        assert_eq!(network_chain_id("ETHEREUM_MAINNET"), 1);
        assert_eq!(network_chain_id("ARBITRUM_MAINNET"), 42161);
        assert_eq!(network_chain_id("BASE_MAINNET"), 8453);
        assert_eq!(network_chain_id("POLYGON_POS"), 137);
        assert_eq!(network_chain_id("SOMETHING_ELSE"), 1);
    }
}
