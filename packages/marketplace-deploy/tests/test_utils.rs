use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use marketplace_deploy::{
    ArtifactStore, ContractDeployer, ContractFactory, DeployError, DeployedContract,
    DeploymentStep, Result,
};
use tempfile::TempDir;

/// Temporary artifacts directory laid out the way Hardhat writes it.
pub struct ArtifactFixture {
    pub dir: TempDir,
}

impl ArtifactFixture {
    pub fn new() -> Self {
        Self { dir: TempDir::new().expect("temp dir") }
    }

    /// Fixture holding both contracts of the default plan.
    pub fn marketplace_and_nft() -> Self {
        let fixture = Self::new();
        fixture.add("contracts/Marketplace.sol", "Marketplace");
        fixture.add("contracts/NFT.sol", "NFT");
        fixture
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store(&self) -> ArtifactStore {
        ArtifactStore::new(self.dir.path())
    }

    pub fn add(&self, source: &str, name: &str) -> PathBuf {
        let body = artifact_json(source, name, "0x6080604052348015600f57600080fd5b50");
        self.add_raw(source, name, &body)
    }

    pub fn add_raw(&self, source: &str, name: &str, body: &str) -> PathBuf {
        let dir = self.dir.path().join(source);
        fs::create_dir_all(&dir).expect("artifact dir");
        let path = dir.join(format!("{name}.json"));
        fs::write(&path, body).expect("write artifact");
        path
    }
}

pub fn artifact_json(source: &str, name: &str, bytecode: &str) -> String {
    serde_json::json!({
        "_format": "hh-sol-artifact-1",
        "contractName": name,
        "sourceName": source,
        "abi": [
            {"inputs": [], "stateMutability": "nonpayable", "type": "constructor"},
            {
                "inputs": [],
                "name": "owner",
                "outputs": [{"internalType": "address", "name": "", "type": "address"}],
                "stateMutability": "view",
                "type": "function"
            }
        ],
        "bytecode": bytecode,
        "deployedBytecode": "0x6080",
        "linkReferences": {},
        "deployedLinkReferences": {}
    })
    .to_string()
}

pub fn test_address(index: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xab;
    bytes[19] = index;
    Address::from(bytes)
}

/// Deployer that records calls instead of talking to a node.
pub struct RecordingDeployer {
    calls: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl RecordingDeployer {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    pub fn failing_on(contract: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(contract.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContractDeployer for RecordingDeployer {
    fn deployer_address(&self) -> Address {
        test_address(0)
    }

    async fn deploy(
        &self,
        factory: &ContractFactory,
        step: &DeploymentStep,
    ) -> Result<DeployedContract> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(factory.name.clone());
            calls.len() as u8
        };

        if self.fail_on.as_deref() == Some(factory.name.as_str()) {
            return Err(DeployError::Deployment {
                contract: step.contract.clone(),
                message: "insufficient funds for gas * price + value".to_string(),
            });
        }

        Ok(DeployedContract {
            contract: step.contract.clone(),
            label: step.label.clone(),
            address: test_address(index),
            transaction_hash: Some(B256::repeat_byte(index)),
            block_number: Some(100 + index as u64),
        })
    }
}
