use std::process::ExitCode;

use clap::Parser;
use ethers::utils::format_ether;
use eyre::WrapErr;
use marketplace_deploy::config::cli::CheckCli;
use marketplace_deploy::deploy::{connect, preload_factories};
use marketplace_deploy::{logger, ArtifactStore, ContractDeployer, DeployConfig};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = CheckCli::parse();
    logger::init_cli_logger(cli.args.verbose);

    match run(cli).await {
        Ok(()) => {
            println!("✅ Ready to deploy");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("❌ Check failed: {err:?}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: CheckCli) -> eyre::Result<()> {
    let config =
        DeployConfig::load(cli.args.config.as_deref()).wrap_err("loading deploy config")?;
    let network = cli.args.network_name(&config).to_string();
    let settings = config
        .select_network(&network)
        .wrap_err_with(|| format!("resolving network `{network}`"))?;
    println!("- ✅ Config: network `{}` (chain {})", settings.name, settings.chain_id);

    let store = ArtifactStore::new(cli.args.artifacts_dir(&config));
    let factories = preload_factories(&config.plan(), &store).wrap_err("loading artifacts")?;
    for factory in &factories {
        println!("- ✅ Artifact: {} ({} bytes)", factory.name, factory.bytecode.len());
    }

    let deployer = connect(&settings)
        .await
        .wrap_err_with(|| format!("connecting to `{network}`"))?;
    let balance = deployer.balance().await.wrap_err("fetching deployer balance")?;
    println!(
        "- ✅ Deployer: {} ({} ETH)",
        deployer.deployer_address().to_checksum(None),
        format_ether(balance)
    );
    if balance.is_zero() {
        tracing::warn!("deployer account has no funds");
    }

    Ok(())
}
