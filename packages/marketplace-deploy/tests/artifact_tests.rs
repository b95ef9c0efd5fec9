mod test_utils;

use marketplace_deploy::{ArtifactStore, DeployError};
use test_utils::*;

#[test]
fn test_finds_nested_artifact() {
    let fixture = ArtifactFixture::marketplace_and_nft();
    let factory = fixture.store().get_contract_factory("Marketplace").unwrap();

    assert_eq!(factory.name, "Marketplace");
    assert_eq!(factory.source_name.as_deref(), Some("contracts/Marketplace.sol"));
    assert!(!factory.bytecode.is_empty());
    assert!(factory.abi.function("owner").is_ok());
}

#[test]
fn test_ignores_debug_files_and_build_info() {
    let fixture = ArtifactFixture::new();
    fixture.add("contracts/NFT.sol", "NFT");
    fixture.add_raw(
        "contracts/NFT.sol",
        "NFT.dbg",
        r#"{"_format": "hh-sol-dbg-1", "buildInfo": "../../build-info/abc.json"}"#,
    );
    fixture.add("build-info", "NFT");

    let factory = fixture.store().get_contract_factory("NFT").unwrap();
    assert_eq!(factory.source_name.as_deref(), Some("contracts/NFT.sol"));
}

#[test]
fn test_ambiguous_name_lists_qualified_candidates() {
    let fixture = ArtifactFixture::new();
    fixture.add("contracts/NFT.sol", "NFT");
    fixture.add("contracts/legacy/NFT.sol", "NFT");

    let err = fixture.store().get_contract_factory("NFT").unwrap_err();
    match err {
        DeployError::AmbiguousArtifact { name, candidates } => {
            assert_eq!(name, "NFT");
            assert_eq!(
                candidates,
                vec![
                    "contracts/NFT.sol:NFT".to_string(),
                    "contracts/legacy/NFT.sol:NFT".to_string(),
                ]
            );
        }
        other => panic!("expected ambiguity error, got {other:?}"),
    }
}

#[test]
fn test_fully_qualified_name_disambiguates() {
    let fixture = ArtifactFixture::new();
    fixture.add("contracts/NFT.sol", "NFT");
    fixture.add("contracts/legacy/NFT.sol", "NFT");

    let factory = fixture
        .store()
        .get_contract_factory("contracts/legacy/NFT.sol:NFT")
        .unwrap();
    assert_eq!(factory.name, "NFT");
    assert_eq!(factory.source_name.as_deref(), Some("contracts/legacy/NFT.sol"));
}

#[test]
fn test_missing_artifact_directory() {
    let fixture = ArtifactFixture::new();
    let store = ArtifactStore::new(fixture.path().join("not-compiled"));

    let err = store.get_contract_factory("Marketplace").unwrap_err();
    assert!(matches!(
        err,
        DeployError::ArtifactNotFound { ref name, .. } if name == "Marketplace"
    ));
}

#[test]
fn test_interface_artifact_cannot_be_deployed() {
    let fixture = ArtifactFixture::new();
    fixture.add_raw(
        "contracts/IMarketplace.sol",
        "IMarketplace",
        &artifact_json("contracts/IMarketplace.sol", "IMarketplace", "0x"),
    );

    let err = fixture.store().get_contract_factory("IMarketplace").unwrap_err();
    assert!(matches!(err, DeployError::InvalidArtifact { .. }));
}

#[test]
fn test_qualified_name_cannot_escape_artifacts_directory() {
    let fixture = ArtifactFixture::new();
    fixture.add("outside/NFT.sol", "NFT");
    let store = ArtifactStore::new(fixture.path().join("artifacts"));

    for name in ["../outside/NFT.sol:NFT", "/etc/NFT.sol:NFT"] {
        let err = store.get_contract_factory(name).unwrap_err();
        assert!(
            matches!(err, DeployError::InvalidArtifact { .. }),
            "{name} should be rejected, got {err:?}"
        );
    }
}
