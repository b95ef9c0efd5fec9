use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

pub mod errors;
pub mod interfaces;

/// Contract name plus the human label used when reporting its address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentStep {
    pub contract: String,
    pub label: String,
}

impl DeploymentStep {
    pub fn new(contract: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            label: label.into(),
        }
    }
}

/// Ordered list of contracts to deploy. Steps run strictly in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentPlan {
    pub steps: Vec<DeploymentStep>,
}

impl DeploymentPlan {
    pub fn new(steps: Vec<DeploymentStep>) -> Self {
        Self { steps }
    }

    pub fn contract_names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|step| step.contract.as_str())
    }
}

impl Default for DeploymentPlan {
    fn default() -> Self {
        Self::new(vec![
            DeploymentStep::new("Marketplace", "NFT Marketplace"),
            DeploymentStep::new("NFT", "NFT Contract"),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedContract {
    pub contract: String,
    pub label: String,
    pub address: Address,
    pub transaction_hash: Option<B256>,
    pub block_number: Option<u64>,
}

impl DeployedContract {
    /// Address in EIP-55 checksum form.
    pub fn checksum_address(&self) -> String {
        self.address.to_checksum(None)
    }

    /// The line printed to stdout once the contract is confirmed.
    pub fn announcement(&self) -> String {
        format!("{} deployed to: {}", self.label, self.checksum_address())
    }
}

/// Summary of a finished run, written as JSON when a report path is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentReport {
    pub network: String,
    pub chain_id: u64,
    pub deployer: Address,
    pub contracts: Vec<DeployedContract>,
}

impl DeploymentReport {
    pub fn address_of(&self, contract: &str) -> Option<Address> {
        self.contracts
            .iter()
            .find(|deployed| deployed.contract == contract)
            .map(|deployed| deployed.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_deploys_marketplace_before_nft() {
        let plan = DeploymentPlan::default();
        let names: Vec<&str> = plan.contract_names().collect();
        assert_eq!(names, vec!["Marketplace", "NFT"]);
        assert_eq!(plan.steps[0].label, "NFT Marketplace");
        assert_eq!(plan.steps[1].label, "NFT Contract");
    }

    #[test]
    fn announcement_uses_checksummed_address() {
        let deployed = DeployedContract {
            contract: "NFT".to_string(),
            label: "NFT Contract".to_string(),
            address: "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap(),
            transaction_hash: None,
            block_number: None,
        };
        assert_eq!(
            deployed.announcement(),
            "NFT Contract deployed to: 0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }
}
