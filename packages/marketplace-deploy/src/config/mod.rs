//! Deployment configuration: compiler version, artifact location and the
//! networks contracts can be deployed to.
//!
//! Network URLs and accounts may reference environment variables as
//! `${NAME}`; they are resolved when a network is selected, so a config that
//! names several networks only needs the secrets of the one in use.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::errors::{require_config, DeployError, Result};
use crate::types::{DeploymentPlan, DeploymentStep};

pub mod cli;

pub const DEFAULT_CONFIG_PATH: &str = "deploy.toml";
pub const DEFAULT_NETWORK: &str = "goerli";
pub const GOERLI_CHAIN_ID: u64 = 5;

const SUPPORTED_SCHEMES: [&str; 2] = ["http", "https"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    #[serde(default = "default_solidity")]
    pub solidity: String,
    pub default_network: Option<String>,
    #[serde(default = "default_artifacts")]
    pub artifacts: PathBuf,
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,
    /// Overrides the built-in Marketplace/NFT order when present.
    pub deploy: Option<Vec<DeploymentStep>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub url: String,
    #[serde(default)]
    pub accounts: Vec<String>,
    pub chain_id: u64,
    pub confirmations: Option<usize>,
    pub poll_interval_ms: Option<u64>,
}

fn default_solidity() -> String {
    "0.8.7".to_string()
}

fn default_artifacts() -> PathBuf {
    PathBuf::from("artifacts")
}

impl Default for DeployConfig {
    fn default() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(
            DEFAULT_NETWORK.to_string(),
            NetworkConfig {
                url: "https://eth-goerli.g.alchemy.com/v2/${ALCHEMY_API_KEY}".to_string(),
                accounts: vec!["${PRIVATE_KEY}".to_string()],
                chain_id: GOERLI_CHAIN_ID,
                confirmations: None,
                poll_interval_ms: None,
            },
        );

        Self {
            solidity: default_solidity(),
            default_network: Some(DEFAULT_NETWORK.to_string()),
            artifacts: default_artifacts(),
            networks,
            deploy: None,
        }
    }
}

impl DeployConfig {
    pub fn parse(raw: &str) -> Result<Self> {
        let config: DeployConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    /// Loads `path` when given. Without a path, `deploy.toml` in the working
    /// directory is used if it exists, otherwise the built-in goerli setup.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    tracing::debug!("no {DEFAULT_CONFIG_PATH} found, using built-in config");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_config(!self.solidity.trim().is_empty(), "solidity version must not be empty")?;

        for (name, network) in &self.networks {
            require_config(
                network.chain_id > 0,
                &format!("network `{name}` must have a non-zero chain_id"),
            )?;
            require_config(
                network.confirmations.map_or(true, |count| count >= 1),
                &format!("network `{name}` needs at least one confirmation"),
            )?;
        }

        if let Some(steps) = &self.deploy {
            require_config(!steps.is_empty(), "deploy list must not be empty")?;
            require_config(
                steps.iter().all(|step| !step.contract.trim().is_empty()),
                "deploy entries need a contract name",
            )?;
        }

        Ok(())
    }

    pub fn plan(&self) -> DeploymentPlan {
        match &self.deploy {
            Some(steps) => DeploymentPlan::new(steps.clone()),
            None => DeploymentPlan::default(),
        }
    }

    /// Network to use when none is requested explicitly.
    pub fn default_network_name(&self) -> &str {
        self.default_network.as_deref().unwrap_or(DEFAULT_NETWORK)
    }

    /// Resolves a network against the process environment.
    pub fn select_network(&self, name: &str) -> Result<NetworkSettings> {
        self.select_network_with(name, |var| std::env::var(var).ok())
    }

    pub fn select_network_with<F>(&self, name: &str, lookup: F) -> Result<NetworkSettings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let network = self
            .networks
            .get(name)
            .ok_or_else(|| DeployError::UnknownNetwork(name.to_string()))?;

        let raw_url = interpolate(&network.url, &lookup)?;
        let url = Url::parse(&raw_url).map_err(|e| DeployError::InvalidUrl {
            url: network.url.clone(),
            message: e.to_string(),
        })?;
        if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
            return Err(DeployError::InvalidUrl {
                url: network.url.clone(),
                message: format!("unsupported scheme `{}`", url.scheme()),
            });
        }

        let first_account = network
            .accounts
            .first()
            .ok_or_else(|| DeployError::MissingAccount { network: name.to_string() })?;
        let private_key = PrivateKey::parse(&interpolate(first_account, &lookup)?)?;

        Ok(NetworkSettings {
            name: name.to_string(),
            url,
            chain_id: network.chain_id,
            private_key,
            confirmations: network.confirmations.unwrap_or(1),
            poll_interval: network.poll_interval_ms.map(Duration::from_millis),
        })
    }
}

/// A fully resolved network, ready to connect to.
#[derive(Clone)]
pub struct NetworkSettings {
    pub name: String,
    pub url: Url,
    pub chain_id: u64,
    pub private_key: PrivateKey,
    pub confirmations: usize,
    pub poll_interval: Option<Duration>,
}

impl fmt::Debug for NetworkSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The url may embed an API key.
        f.debug_struct("NetworkSettings")
            .field("name", &self.name)
            .field("host", &self.url.host_str())
            .field("chain_id", &self.chain_id)
            .field("private_key", &self.private_key)
            .field("confirmations", &self.confirmations)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

/// secp256k1 signing key of the deploying account.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(B256);

impl PrivateKey {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if digits.len() != 64 {
            return Err(DeployError::InvalidPrivateKey(format!(
                "expected 32 bytes of hex, got {} characters",
                digits.len()
            )));
        }
        let bytes = hex::decode(digits)
            .map_err(|_| DeployError::InvalidPrivateKey("not valid hex".to_string()))?;
        Ok(Self(B256::from_slice(&bytes)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Replaces every `${NAME}` in `input` with the value `lookup` returns.
pub fn interpolate<F>(input: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| DeployError::Config {
            message: format!("unterminated placeholder in `{input}`"),
        })?;
        let var = &after[..end];
        require_config(!var.is_empty(), "empty ${} placeholder")?;
        let value = lookup(var).ok_or_else(|| DeployError::MissingEnvVar(var.to_string()))?;
        output.push_str(&value);
        rest = &after[end + 1..];
    }

    output.push_str(rest);
    Ok(output)
}
