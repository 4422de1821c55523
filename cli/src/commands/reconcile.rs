use anyhow::{Context, Result};
use ppa_conformance::{load_config, reconcile};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ReconcileArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let requests = reconcile(&config.registration_requests, &config.conditional_registration_data)?;

    if cli.verbose > 0 {
        eprintln!("[reconcile] {} request(s) complete", requests.len());
    }

    let json = serde_json::to_string_pretty(&requests).context("Failed to serialize registration requests")?;
    println!("{json}");
    Ok(())
}
