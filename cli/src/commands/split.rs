use anyhow::Result;
use ppa_conformance::{load_config, write_config};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::SplitArgs) -> Result<()> {
    let mut config = load_config(&args.config)?;
    let out_path = args.output.clone().unwrap_or_else(|| args.config.clone());

    let moved = config.split_conditionals();
    write_config(&out_path, &config)?;

    if cli.verbose > 0 {
        eprintln!("[split] moved {moved} device(s) into REG-Conditional data -> {}", out_path.display());
    }
    Ok(())
}
