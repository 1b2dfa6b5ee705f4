//! Top-level configuration stored in `$HOME/.vantage/config.toml`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub general: GeneralConfig,
    /// Wallet addresses to monitor (0x-prefixed, 40 hex chars).
    #[serde(default)]
    pub wallets: Vec<String>,
    pub morpho: MorphoConfig,
    pub zapper: ZapperConfig,
    pub pendle: PendleConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose tracing output.
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorphoConfig {
    pub enabled: bool,
    /// Chains to query positions on.
    #[serde(default = "default_chains")]
    pub chains: Vec<u64>,
    /// Recompute USD values from spot prices instead of trusting the
    /// API-reported figures. Falls back to API values per asset when no
    /// price is available.
    #[serde(default)]
    pub recompute_usd: bool,
    /// Include non-whitelisted markets (risk of bad pricing).
    #[serde(default)]
    pub include_untrusted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZapperConfig {
    pub enabled: bool,
    /// Chains to list transactions for.
    #[serde(default = "default_tx_chains")]
    pub chains: Vec<u64>,
    /// How many recent transactions to fetch per wallet.
    #[serde(default = "default_tx_first")]
    pub first: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendleConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of cached price/rate lookups, in seconds.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

fn default_chains() -> Vec<u64> {
    vec![1]
}

fn default_tx_chains() -> Vec<u64> {
    vec![1, 42161]
}

fn default_tx_first() -> u32 {
    20
}

fn default_cache_ttl() -> u64 {
    300
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig { verbose: false },
            wallets: Vec::new(),
            morpho: MorphoConfig {
                enabled: true,
                chains: default_chains(),
                recompute_usd: false,
                include_untrusted: false,
            },
            zapper: ZapperConfig {
                enabled: false,
                chains: default_tx_chains(),
                first: default_tx_first(),
            },
            pendle: PendleConfig { enabled: false },
            cache: CacheConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
        }
    }
}

impl AppConfig {
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}
