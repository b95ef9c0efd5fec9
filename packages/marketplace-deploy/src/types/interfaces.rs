use alloy_primitives::Address;
use async_trait::async_trait;

use crate::artifacts::ContractFactory;
use crate::types::errors::Result;
use crate::types::{DeployedContract, DeploymentStep};

/// Publishes contract bytecode and waits for it to be confirmed on chain.
#[async_trait]
pub trait ContractDeployer: Send + Sync {
    /// Account that signs and pays for the deployments.
    fn deployer_address(&self) -> Address;

    async fn deploy(
        &self,
        factory: &ContractFactory,
        step: &DeploymentStep,
    ) -> Result<DeployedContract>;
}
