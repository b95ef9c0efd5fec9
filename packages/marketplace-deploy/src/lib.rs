pub mod artifacts;
pub mod config;
pub mod deploy;
pub mod logger;
pub mod types;

pub use artifacts::{ArtifactStore, ContractFactory};
pub use config::{DeployConfig, NetworkSettings, PrivateKey};
pub use deploy::{deploy_to_network, run_plan, EthersDeployer};
pub use types::errors::{DeployError, Result};
pub use types::interfaces::ContractDeployer;
pub use types::{DeployedContract, DeploymentPlan, DeploymentReport, DeploymentStep};
