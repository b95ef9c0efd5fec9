use std::path::PathBuf;

use clap::{Args, Parser};

use crate::config::DeployConfig;

/// Flags shared by the `deploy` and `check` binaries.
#[derive(Args, Debug, Clone)]
pub struct NetworkArgs {
    /// Path to the deployment config (defaults to ./deploy.toml, then built-in goerli)
    #[arg(long, env = "DEPLOY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Named network from the config
    #[arg(long, env = "DEPLOY_NETWORK")]
    pub network: Option<String>,

    /// Directory holding compiled contract artifacts
    #[arg(long, env = "DEPLOY_ARTIFACTS")]
    pub artifacts: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl NetworkArgs {
    pub fn network_name<'a>(&'a self, config: &'a DeployConfig) -> &'a str {
        self.network
            .as_deref()
            .unwrap_or_else(|| config.default_network_name())
    }

    pub fn artifacts_dir(&self, config: &DeployConfig) -> PathBuf {
        self.artifacts
            .clone()
            .unwrap_or_else(|| config.artifacts.clone())
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "deploy",
    version,
    about = "Deploy the NFT Marketplace and NFT contracts"
)]
pub struct DeployCli {
    #[command(flatten)]
    pub args: NetworkArgs,

    /// Write a JSON summary of the deployed addresses to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "check",
    version,
    about = "Validate config, artifacts and RPC connectivity without deploying"
)]
pub struct CheckCli {
    #[command(flatten)]
    pub args: NetworkArgs,
}
