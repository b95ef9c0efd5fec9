//! Contract factories backed by compiled Solidity artifacts.
//!
//! Artifacts follow the Hardhat layout: `<dir>/<source>.sol/<Name>.json`, each
//! carrying the contract ABI and creation bytecode. Debug files
//! (`*.dbg.json`) and the `build-info/` tree are ignored.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use ethers::abi::Abi;
use ethers::types::Bytes;
use serde::Deserialize;

use crate::types::errors::{require_valid_artifact, DeployError, Result};

const BUILD_INFO_DIR: &str = "build-info";

/// ABI and creation bytecode of one compiled contract.
#[derive(Debug, Clone)]
pub struct ContractFactory {
    pub name: String,
    pub source_name: Option<String>,
    pub abi: Abi,
    pub bytecode: Bytes,
}

impl ContractFactory {
    pub fn has_constructor_args(&self) -> bool {
        self.abi
            .constructor
            .as_ref()
            .map(|constructor| !constructor.inputs.is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: Option<String>,
    source_name: Option<String>,
    abi: serde_json::Value,
    #[serde(default)]
    bytecode: String,
    #[serde(default)]
    link_references: BTreeMap<String, serde_json::Value>,
}

/// Directory of compiled artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `name` to a deployable factory.
    ///
    /// `name` is either a bare contract name (`NFT`) or a fully qualified one
    /// (`contracts/NFT.sol:NFT`). A bare name matching several artifacts is
    /// rejected.
    pub fn get_contract_factory(&self, name: &str) -> Result<ContractFactory> {
        let path = self.locate(name)?;
        let contract_name = name.rsplit(':').next().unwrap_or(name);
        tracing::debug!(contract = contract_name, path = %path.display(), "loading artifact");
        let raw = fs::read_to_string(&path)?;
        parse_artifact(contract_name, &raw)
    }

    fn locate(&self, name: &str) -> Result<PathBuf> {
        if let Some((source, contract)) = name.split_once(':') {
            let inside_root = Path::new(source)
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
            require_valid_artifact(
                inside_root,
                name,
                "source path must stay inside the artifacts directory",
            )?;
            let path = self.root.join(source).join(format!("{contract}.json"));
            return if path.is_file() {
                Ok(path)
            } else {
                Err(self.not_found(name))
            };
        }

        let file_name = format!("{name}.json");
        let mut candidates = Vec::new();
        if self.root.is_dir() {
            collect_artifacts(&self.root, &file_name, &mut candidates)?;
        }
        candidates.sort();

        match candidates.len() {
            0 => Err(self.not_found(name)),
            1 => Ok(candidates.remove(0)),
            _ => Err(DeployError::AmbiguousArtifact {
                name: name.to_string(),
                candidates: candidates
                    .iter()
                    .map(|path| self.qualified_name(path, name))
                    .collect(),
            }),
        }
    }

    fn qualified_name(&self, path: &Path, name: &str) -> String {
        let source = path
            .parent()
            .and_then(|parent| parent.strip_prefix(&self.root).ok())
            .map(|source| source.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        format!("{source}:{name}")
    }

    fn not_found(&self, name: &str) -> DeployError {
        DeployError::ArtifactNotFound {
            name: name.to_string(),
            dir: self.root.display().to_string(),
        }
    }
}

fn collect_artifacts(dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            if entry.file_name() != BUILD_INFO_DIR {
                collect_artifacts(&path, file_name, found)?;
            }
        } else if entry.file_name().to_string_lossy() == file_name {
            found.push(path);
        }
    }
    Ok(())
}

/// Parses the JSON body of a single artifact file.
pub fn parse_artifact(name: &str, raw: &str) -> Result<ContractFactory> {
    let artifact: RawArtifact = serde_json::from_str(raw)?;

    if let Some(contract_name) = &artifact.contract_name {
        require_valid_artifact(
            contract_name == name,
            name,
            &format!("artifact declares contract `{contract_name}`"),
        )?;
    }

    if !artifact.link_references.is_empty() || artifact.bytecode.contains("__$") {
        return Err(DeployError::UnlinkedLibraries { name: name.to_string() });
    }

    let abi: Abi =
        serde_json::from_value(artifact.abi).map_err(|e| DeployError::InvalidArtifact {
            name: name.to_string(),
            message: format!("malformed abi: {e}"),
        })?;

    let hex_code = artifact.bytecode.trim_start_matches("0x");
    require_valid_artifact(
        !hex_code.is_empty(),
        name,
        "no creation bytecode (abstract contract or interface?)",
    )?;
    let bytecode = hex::decode(hex_code).map_err(|e| DeployError::InvalidArtifact {
        name: name.to_string(),
        message: format!("bytecode is not valid hex: {e}"),
    })?;

    let factory = ContractFactory {
        name: name.to_string(),
        source_name: artifact.source_name,
        abi,
        bytecode: Bytes::from(bytecode),
    };
    require_valid_artifact(
        !factory.has_constructor_args(),
        name,
        "constructor arguments are not supported",
    )?;

    Ok(factory)
}
