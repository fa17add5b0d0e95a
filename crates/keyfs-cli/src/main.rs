use clap::Parser;
use tracing::Level;

mod cli;
mod commands;

fn main() {
    let cli = cli::Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = commands::run_command(cli) {
        eprintln!("keyfs: {err:#}");
        std::process::exit(1);
    }
}
