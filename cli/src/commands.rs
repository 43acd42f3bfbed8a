pub mod list;
pub mod probe;
pub mod run;

use clap::{ArgAction, Args, Parser, Subcommand};
use reachr_common::feature::Feature;

#[derive(Parser)]
#[command(name = "reachr")]
#[command(about = "Checks that this host can reach the network.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Print less. Repeat to print only the summary
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the reachability checks
    #[command(alias = "r")]
    Run(RunArgs),
    /// List the checks with their markers
    #[command(alias = "l")]
    List,
    /// Show what the capability probes find on this host
    #[command(alias = "p")]
    Probe,
}

#[derive(Args)]
pub struct RunArgs {
    /// Feature tags describing this host, e.g. `cloud,azure`
    #[arg(
        short,
        long = "feature",
        value_delimiter = ',',
        env = "REACHR_FEATURES"
    )]
    pub features: Vec<Feature>,

    /// Treat the system as fully booted instead of asking systemd
    #[arg(long, conflicts_with = "not_booted")]
    pub booted: bool,

    /// Treat the system as not booted instead of asking systemd
    #[arg(long)]
    pub not_booted: bool,

    /// Only run checks whose name contains this pattern
    #[arg(long)]
    pub filter: Option<String>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
