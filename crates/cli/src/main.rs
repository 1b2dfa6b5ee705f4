mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use vantage_utils::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "vantage",
    about = "Vantage — multi-wallet DeFi lending monitor.\nMorpho Blue positions, cross-wallet aggregation, tx gas costs. Outputs JSON for scripts.",
    version,
    propagate_version = true
)]
struct Cli {
    #[arg(long, short = 'o', global = true, default_value = "table")]
    output: CliOutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Table,
    Json,
    JsonPretty,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> OutputFormat {
        match f {
            CliOutputFormat::Table => OutputFormat::Table,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    // ── CORE ────────────────────────────────────────────────────

    /// Configure wallets, modules, and options.
    Configure {
        #[command(subcommand)]
        action: ConfigureAction,
    },

    /// Per-wallet KPI overview (supply, borrow, net) across all wallets.
    Status,

    // ── PROTOCOL MODULES (namespaced per protocol) ──────────────

    /// Morpho Blue: lending positions, aggregation, borrow rates.
    Morpho {
        #[command(subcommand)]
        action: MorphoAction,
    },

    /// Pendle: yield-trading positions (not wired yet).
    Pendle {
        #[command(subcommand)]
        action: PendleAction,
    },

    // ── UTILITIES ───────────────────────────────────────────────

    /// Transaction history and gas costs (Zapper, needs API key).
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand)]
enum ConfigureAction {
    /// Show all current configuration.
    Show,
    /// Manage the monitored wallet list.
    Wallet {
        #[command(subcommand)]
        action: WalletAction,
    },
    /// Module management: enable, disable.
    Module {
        #[command(subcommand)]
        action: ModuleAction,
    },
}

#[derive(Subcommand)]
enum WalletAction {
    /// Add a wallet address.
    Add { address: String },
    /// Remove a wallet address.
    Remove { address: String },
    /// List configured wallets.
    List,
}

#[derive(Subcommand)]
enum ModuleAction {
    /// Enable a module (morpho, zapper, pendle).
    Enable { name: String },
    /// Disable a module.
    Disable { name: String },
}

#[derive(Subcommand)]
enum MorphoAction {
    /// Show reconciled positions per wallet.
    Positions {
        /// Wallets to query (defaults to configured list).
        #[arg(long)]
        wallet: Vec<String>,
        /// Chains to query (defaults to configured list).
        #[arg(long)]
        chain: Vec<u64>,
        /// Include non-whitelisted markets (risk of bad pricing).
        #[arg(long, default_value_t = false)]
        untrusted: bool,
        /// Recompute USD from spot prices instead of API-reported values.
        #[arg(long, default_value_t = false)]
        recompute_usd: bool,
    },
    /// Aggregate positions across all wallets, grouped by market.
    Aggregate {
        #[arg(long)]
        wallet: Vec<String>,
        #[arg(long)]
        chain: Vec<u64>,
        /// Report collateral as the supply columns.
        #[arg(long, default_value_t = false)]
        collateral_basis: bool,
        /// Keep markets without an active borrow.
        #[arg(long, default_value_t = false)]
        all_rows: bool,
        #[arg(long, default_value_t = false)]
        untrusted: bool,
        #[arg(long, default_value_t = false)]
        recompute_usd: bool,
    },
    /// Fetch borrow rates for specific market keys.
    Rates {
        /// Market unique keys.
        keys: Vec<String>,
    },
}

#[derive(Subcommand)]
enum PendleAction {
    /// Show yield-trading positions (placeholder).
    Positions {
        #[arg(long)]
        wallet: Vec<String>,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Recent transactions with per-tx gas cost.
    Txs {
        #[arg(long)]
        wallet: Vec<String>,
        #[arg(long)]
        chain: Vec<u64>,
        /// How many transactions per wallet (defaults to config).
        #[arg(long)]
        first: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    vantage_core::init_workspace()?;

    let cli = Cli::parse();
    let fmt: OutputFormat = cli.output.into();

    match cli.command {
        Commands::Configure { action } => match action {
            ConfigureAction::Show => commands::configure::show(fmt),
            ConfigureAction::Wallet { action } => match action {
                WalletAction::Add { address } => commands::configure::wallet_add(&address),
                WalletAction::Remove { address } => commands::configure::wallet_remove(&address),
                WalletAction::List => commands::configure::wallet_list(),
            },
            ConfigureAction::Module { action } => match action {
                ModuleAction::Enable { name } => commands::configure::module_set(&name, true),
                ModuleAction::Disable { name } => commands::configure::module_set(&name, false),
            },
        },

        Commands::Status => commands::status::run(fmt).await,

        Commands::Morpho { action } => {
            let config = vantage_core::workspace::load_config()?;
            if !config.morpho.enabled {
                anyhow::bail!("Morpho module is disabled. Run: vantage configure module enable morpho");
            }
            match action {
                MorphoAction::Positions {
                    wallet,
                    chain,
                    untrusted,
                    recompute_usd,
                } => {
                    commands::morpho::positions(config, wallet, chain, untrusted, recompute_usd, fmt)
                        .await
                }
                MorphoAction::Aggregate {
                    wallet,
                    chain,
                    collateral_basis,
                    all_rows,
                    untrusted,
                    recompute_usd,
                } => {
                    commands::morpho::aggregate(
                        config,
                        wallet,
                        chain,
                        collateral_basis,
                        all_rows,
                        untrusted,
                        recompute_usd,
                        fmt,
                    )
                    .await
                }
                MorphoAction::Rates { keys } => commands::morpho::rates(config, keys, fmt).await,
            }
        }

        Commands::Pendle { action } => {
            let config = vantage_core::workspace::load_config()?;
            match action {
                PendleAction::Positions { wallet } => {
                    commands::pendle::positions(config, wallet, fmt).await
                }
            }
        }

        Commands::History { action } => {
            let config = vantage_core::workspace::load_config()?;
            match action {
                HistoryAction::Txs {
                    wallet,
                    chain,
                    first,
                } => commands::history::txs(config, wallet, chain, first, fmt).await,
            }
        }
    }
}
