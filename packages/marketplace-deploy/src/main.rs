use std::process::ExitCode;

use clap::Parser;
use eyre::WrapErr;
use marketplace_deploy::config::cli::DeployCli;
use marketplace_deploy::deploy::{deploy_to_network, write_report};
use marketplace_deploy::{logger, ArtifactStore, DeployConfig};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = DeployCli::parse();
    logger::init_cli_logger(cli.args.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: DeployCli) -> eyre::Result<()> {
    let config =
        DeployConfig::load(cli.args.config.as_deref()).wrap_err("loading deploy config")?;
    let network = cli.args.network_name(&config).to_string();
    let settings = config
        .select_network(&network)
        .wrap_err_with(|| format!("resolving network `{network}`"))?;
    let store = ArtifactStore::new(cli.args.artifacts_dir(&config));

    tracing::info!(
        network = %settings.name,
        chain_id = settings.chain_id,
        solidity = %config.solidity,
        artifacts = %store.root().display(),
        "starting deployment"
    );

    let mut stdout = std::io::stdout();
    let report = deploy_to_network(&settings, &store, &config.plan(), &mut stdout)
        .await
        .wrap_err_with(|| format!("deploying to `{network}`"))?;

    if let Some(path) = &cli.report {
        write_report(&report, path).wrap_err("writing deployment report")?;
    }

    Ok(())
}
