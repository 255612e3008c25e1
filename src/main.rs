use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod parsing;
mod stats;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("sam_qc=debug,info")
    } else {
        EnvFilter::new("sam_qc=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Validate(args) => {
            cli::validate::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Summary(args) => {
            cli::summary::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Windows(args) => {
            cli::windows::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
