//! The deployment sequence: resolve each contract's factory, deploy it, wait
//! for confirmation and announce its address before moving to the next one.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::artifacts::{ArtifactStore, ContractFactory};
use crate::config::NetworkSettings;
use crate::types::errors::Result;
use crate::types::interfaces::ContractDeployer;
use crate::types::{DeployedContract, DeploymentPlan, DeploymentReport};

pub mod client;

pub use client::{connect, verify_chain_id, wallet_from_key, EthersDeployer, HttpSigner};

/// Runs `plan` in order, writing one announcement line per contract to `out`.
///
/// Stops at the first failure; contracts already deployed stay deployed and
/// their lines have already been written.
pub async fn run_plan<D, W>(
    plan: &DeploymentPlan,
    store: &ArtifactStore,
    deployer: &D,
    out: &mut W,
) -> Result<Vec<DeployedContract>>
where
    D: ContractDeployer + ?Sized,
    W: Write,
{
    let mut deployed = Vec::with_capacity(plan.steps.len());

    for step in &plan.steps {
        let factory = store.get_contract_factory(&step.contract)?;
        tracing::info!(contract = %step.contract, "deploying");

        let contract = deployer.deploy(&factory, step).await?;
        tracing::info!(
            contract = %contract.contract,
            address = %contract.checksum_address(),
            block = ?contract.block_number,
            "deployed"
        );

        writeln!(out, "{}", contract.announcement())?;
        out.flush()?;
        deployed.push(contract);
    }

    Ok(deployed)
}

/// Deploys `plan` to the network described by `settings`.
pub async fn deploy_to_network<W: Write>(
    settings: &NetworkSettings,
    store: &ArtifactStore,
    plan: &DeploymentPlan,
    out: &mut W,
) -> Result<DeploymentReport> {
    let deployer = connect(settings).await?;
    let contracts = run_plan(plan, store, &deployer, out).await?;

    Ok(DeploymentReport {
        network: settings.name.clone(),
        chain_id: settings.chain_id,
        deployer: deployer.deployer_address(),
        contracts,
    })
}

/// Loads every factory the plan needs, so missing or broken artifacts are
/// caught before anything is sent.
pub fn preload_factories(
    plan: &DeploymentPlan,
    store: &ArtifactStore,
) -> Result<Vec<ContractFactory>> {
    plan.contract_names()
        .map(|name| store.get_contract_factory(name))
        .collect()
}

pub fn write_report(report: &DeploymentReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    tracing::info!(path = %path.display(), "wrote deployment report");
    Ok(())
}
