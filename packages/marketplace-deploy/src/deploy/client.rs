use std::sync::Arc;

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use ethers::contract::ContractFactory as EthersContractFactory;
use ethers::prelude::{Http, LocalWallet, Middleware, Provider, Signer, SignerMiddleware};
use ethers::types::{TransactionReceipt, U256};

use crate::artifacts::ContractFactory;
use crate::config::{NetworkSettings, PrivateKey};
use crate::types::errors::{DeployError, Result};
use crate::types::interfaces::ContractDeployer;
use crate::types::{DeployedContract, DeploymentStep};

pub type HttpSigner = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Deploys through an ethers middleware stack that signs with the configured key.
#[derive(Debug)]
pub struct EthersDeployer<M> {
    client: Arc<M>,
    deployer: Address,
    confirmations: usize,
}

impl<M: Middleware + 'static> EthersDeployer<M> {
    pub fn new(client: Arc<M>, deployer: Address, confirmations: usize) -> Self {
        Self {
            client,
            deployer,
            confirmations: confirmations.max(1),
        }
    }

    pub async fn balance(&self) -> Result<U256> {
        self.client
            .get_balance(to_ethers_address(self.deployer), None)
            .await
            .map_err(|e| DeployError::Provider(e.to_string()))
    }
}

/// Opens an HTTP provider, checks it serves the configured chain and wraps it
/// with the deploying wallet.
pub async fn connect(settings: &NetworkSettings) -> Result<EthersDeployer<HttpSigner>> {
    let mut provider =
        Provider::<Http>::try_from(settings.url.as_str()).map_err(|e| DeployError::InvalidUrl {
            url: settings.url.host_str().unwrap_or_default().to_string(),
            message: e.to_string(),
        })?;
    if let Some(interval) = settings.poll_interval {
        provider = provider.interval(interval);
    }

    verify_chain_id(&provider, settings.chain_id).await?;

    let wallet = wallet_from_key(&settings.private_key, settings.chain_id)?;
    let deployer = Address::from(wallet.address().0);
    tracing::info!(
        network = %settings.name,
        chain_id = settings.chain_id,
        deployer = %deployer.to_checksum(None),
        "connected"
    );

    let client = Arc::new(SignerMiddleware::new(provider, wallet));
    Ok(EthersDeployer::new(client, deployer, settings.confirmations))
}

pub fn wallet_from_key(key: &PrivateKey, chain_id: u64) -> Result<LocalWallet> {
    let wallet = LocalWallet::from_bytes(key.as_bytes())
        .map_err(|_| DeployError::InvalidPrivateKey("not a valid secp256k1 key".to_string()))?;
    Ok(wallet.with_chain_id(chain_id))
}

/// Fails unless the node reports `expected` from `eth_chainId`.
pub async fn verify_chain_id<M: Middleware>(client: &M, expected: u64) -> Result<()> {
    let actual = client
        .get_chainid()
        .await
        .map_err(|e| DeployError::Provider(e.to_string()))?;

    if actual != U256::from(expected) {
        return Err(DeployError::ChainIdMismatch {
            expected,
            actual: actual.low_u64(),
        });
    }
    Ok(())
}

fn to_ethers_address(address: Address) -> ethers::types::Address {
    ethers::types::Address::from_slice(address.as_slice())
}

#[async_trait]
impl<M: Middleware + 'static> ContractDeployer for EthersDeployer<M> {
    fn deployer_address(&self) -> Address {
        self.deployer
    }

    async fn deploy(
        &self,
        factory: &ContractFactory,
        step: &DeploymentStep,
    ) -> Result<DeployedContract> {
        let failed = |message: String| DeployError::Deployment {
            contract: step.contract.clone(),
            message,
        };

        if factory.has_constructor_args() {
            return Err(failed("constructor arguments are not supported".to_string()));
        }

        let deployer = EthersContractFactory::new(
            factory.abi.clone(),
            factory.bytecode.clone(),
            self.client.clone(),
        )
        .deploy(())
        .map_err(|e| failed(e.to_string()))?
        .confirmations(self.confirmations);

        let (contract, receipt) = deployer
            .send_with_receipt()
            .await
            .map_err(|e| failed(e.to_string()))?;

        Ok(deployed_from_receipt(step, contract.address(), &receipt))
    }
}

fn deployed_from_receipt(
    step: &DeploymentStep,
    address: ethers::types::Address,
    receipt: &TransactionReceipt,
) -> DeployedContract {
    DeployedContract {
        contract: step.contract.clone(),
        label: step.label.clone(),
        address: Address::from(address.0),
        transaction_hash: Some(B256::from(receipt.transaction_hash.0)),
        block_number: receipt.block_number.map(|block| block.as_u64()),
    }
}
