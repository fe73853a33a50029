// node/src/main.rs
use clap::{Parser, Subcommand};
use era_gateway::{catalog, execute_batch, resolve_operation, Gateway, OperationInput};
use era_node::{item_from_params, read_items, GatewayConfig, Network, Overrides};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_PATH: &str = "./zksync-era.toml";

#[derive(Parser)]
#[command(name = "zksync-era")]
#[command(about = "zkSync Era JSON-RPC gateway", version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Network to connect to
    #[arg(long, global = true, value_enum)]
    network: Option<Network>,

    /// Custom RPC endpoint (selects the custom network)
    #[arg(long, global = true, env = "ZKSYNC_ERA_RPC_URL")]
    rpc_url: Option<String>,

    /// API key sent as a bearer token
    #[arg(long, global = true, env = "ZKSYNC_ERA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one operation for a single item
    Call {
        /// Resource name (e.g. accounts)
        #[arg(short, long)]
        resource: String,

        /// Operation name (e.g. getBalance)
        #[arg(short, long)]
        operation: String,

        /// Operation parameter as key=value; repeatable
        #[arg(short, long = "param")]
        params: Vec<String>,
    },

    /// Run one operation for every item in a JSON file
    Batch {
        #[arg(short, long)]
        resource: String,

        #[arg(short, long)]
        operation: String,

        /// JSON array of input objects
        #[arg(short, long)]
        input: PathBuf,

        /// Record failed items and keep going
        #[arg(long)]
        continue_on_fail: bool,
    },

    /// List supported operations
    Operations,

    /// Write a default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "zksync_era={0},era_gateway={0},era_rpc={0},hyper=warn,reqwest=warn",
                    log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let overrides = Overrides {
        network: cli.network,
        rpc_url: cli.rpc_url.clone(),
        api_key: cli.api_key.clone(),
        timeout_ms: cli.timeout_ms,
    };

    match cli.command {
        Commands::Call {
            resource,
            operation,
            params,
        } => {
            let config = load_config(cli.config.as_deref(), overrides)?;
            let item = item_from_params(&params)?;
            run(&config, &resource, &operation, vec![item], false).await?;
        }
        Commands::Batch {
            resource,
            operation,
            input,
            continue_on_fail,
        } => {
            let config = load_config(cli.config.as_deref(), overrides)?;
            let items = read_items(&input)?;
            run(&config, &resource, &operation, items, continue_on_fail).await?;
        }
        Commands::Operations => {
            list_operations();
        }
        Commands::Init { output, force } => {
            init_config(&output, force)?;
        }
    }

    Ok(())
}

/// File (explicit path, or the default one when present), then flags and environment
fn load_config(path: Option<&Path>, overrides: Overrides) -> anyhow::Result<GatewayConfig> {
    let mut config = match path {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            GatewayConfig::from_file(path)?
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            tracing::info!("Loading configuration from {}", DEFAULT_CONFIG_PATH);
            GatewayConfig::from_file(DEFAULT_CONFIG_PATH)?
        }
        None => GatewayConfig::default(),
    };
    config.apply(overrides);
    if config.private_key.is_some() {
        tracing::debug!("private_key is set but not used by any operation");
    }
    Ok(config)
}

async fn run(
    config: &GatewayConfig,
    resource: &str,
    operation: &str,
    items: Vec<OperationInput>,
    continue_on_fail: bool,
) -> anyhow::Result<()> {
    // Unknown pairs fail before any item runs
    let spec = resolve_operation(resource, operation)?;
    let credentials = config.credentials()?;
    tracing::debug!(
        url = %credentials.base_url,
        method = spec.method,
        items = items.len(),
        "Starting batch"
    );
    let gateway = Gateway::connect(credentials, &config.transport_config())?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received shutdown signal");
            on_signal.cancel();
        }
    });

    let records = execute_batch(&gateway, spec, &items, continue_on_fail, &cancel).await?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn list_operations() {
    for spec in catalog() {
        println!("{:<14} {:<24} {}", spec.resource, spec.operation, spec.method);
    }
}

fn init_config(output: &Path, force: bool) -> anyhow::Result<()> {
    if output.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", output.display());
    }
    GatewayConfig::default().to_file(output)?;

    tracing::info!("Configuration written to {}", output.display());
    tracing::info!("Edit {} to select a network and API key", output.display());
    Ok(())
}
