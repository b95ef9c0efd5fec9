use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Environment variable {0} is not set")]
    MissingEnvVar(String),

    #[error("Network `{0}` is not configured")]
    UnknownNetwork(String),

    #[error("Network `{network}` has no accounts configured (is PRIVATE_KEY set?)")]
    MissingAccount { network: String },

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid RPC url `{url}`: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Artifact for contract `{name}` not found under {dir}")]
    ArtifactNotFound { name: String, dir: String },

    #[error("Multiple artifacts match `{name}`, use a fully qualified name: {candidates:?}")]
    AmbiguousArtifact { name: String, candidates: Vec<String> },

    #[error("Invalid artifact for `{name}`: {message}")]
    InvalidArtifact { name: String, message: String },

    #[error("Contract `{name}` links external libraries, which is not supported")]
    UnlinkedLibraries { name: String },

    #[error("Chain id mismatch: configured {expected}, node reports {actual}")]
    ChainIdMismatch { expected: u64, actual: u64 },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Deployment of `{contract}` failed: {message}")]
    Deployment { contract: String, message: String },
}

pub type Result<T> = core::result::Result<T, DeployError>;

pub fn require_config(condition: bool, message: &str) -> Result<()> {
    if !condition {
        Err(DeployError::Config { message: message.to_string() })
    } else {
        Ok(())
    }
}

pub fn require_valid_artifact(condition: bool, name: &str, message: &str) -> Result<()> {
    if !condition {
        Err(DeployError::InvalidArtifact {
            name: name.to_string(),
            message: message.to_string(),
        })
    } else {
        Ok(())
    }
}
