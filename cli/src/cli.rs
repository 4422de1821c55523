use std::path::PathBuf;

/// Protection zone conformance checks
#[derive(clap::Parser, Debug)]
#[command(name = "ppa-conformance", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Check a zone against its service area and a reference boundary
    Verify(VerifyArgs),

    /// Print registration requests completed from REG-Conditional data
    Reconcile(ReconcileArgs),

    /// Move Category B installation parameters into REG-Conditional data
    Split(SplitArgs),
}

#[derive(clap::Args, Debug)]
pub struct VerifyArgs {
    /// Scenario config (registration requests, conditionals, PAL records)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Zone produced by the system under test (GeoJSON)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub zone: PathBuf,

    /// Boundary produced by the reference model (GeoJSON)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub reference: PathBuf,

    /// Directory of census tract files named <tract>.json
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub tracts: PathBuf,

    /// Harness settings (JSON); defaults apply when omitted
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub settings: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ReconcileArgs {
    /// Scenario config
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct SplitArgs {
    /// Scenario config to rewrite
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Output config file, defaults to overwriting the input
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}
