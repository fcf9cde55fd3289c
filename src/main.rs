use acctdash::cli::Cli;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.run()
}
