// node/src/config.rs
use era_rpc::{Credentials, TransportConfig, DEFAULT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const MAINNET_RPC_URL: &str = "https://mainnet.era.zksync.io";
pub const TESTNET_RPC_URL: &str = "https://sepolia.era.zksync.dev";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    /// Endpoint taken from `rpc_url`
    Custom,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub network: Network,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Accepted for compatibility with existing credential files; never used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    pub timeout_ms: u64,
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub network: Option<Network>,
    pub rpc_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            rpc_url: None,
            api_key: None,
            private_key: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("GatewayConfig")
            .field("network", &self.network)
            .field("rpc_url", &self.rpc_url)
            .field("api_key", &redacted(&self.api_key))
            .field("private_key", &redacted(&self.private_key))
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl GatewayConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply command-line and environment values on top of the file.
    ///
    /// An RPC URL given without a network selects the custom network.
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(rpc_url) = overrides.rpc_url {
            self.rpc_url = Some(rpc_url);
            if overrides.network.is_none() {
                self.network = Network::Custom;
            }
        }
        if let Some(network) = overrides.network {
            self.network = network;
        }
        if let Some(api_key) = overrides.api_key {
            self.api_key = Some(api_key);
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
    }

    pub fn base_url(&self) -> anyhow::Result<String> {
        match self.network {
            Network::Mainnet => Ok(MAINNET_RPC_URL.to_string()),
            Network::Testnet => Ok(TESTNET_RPC_URL.to_string()),
            Network::Custom => match self.rpc_url.as_deref().map(str::trim) {
                Some(url) if !url.is_empty() => Ok(url.to_string()),
                _ => anyhow::bail!("network \"custom\" requires rpc_url"),
            },
        }
    }

    pub fn credentials(&self) -> anyhow::Result<Credentials> {
        let credentials = Credentials::new(self.base_url()?);
        Ok(match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => credentials.with_api_key(key),
            _ => credentials,
        })
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig::from_millis(self.timeout_ms)
    }
}
