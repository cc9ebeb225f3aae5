//! Minard CLI - renders Minard's chart of the 1812 Russian campaign.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "minard-cli",
    version,
    about = "Minard's figurative map of the 1812 Russian campaign"
)]
struct Cli {
    #[command(subcommand)]
    command: minard_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("minard-cli {}", env!("CARGO_PKG_VERSION"));
    minard_cmd::run(cli.command)
}
