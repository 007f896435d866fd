use std::error::Error;

use clap::{Parser, Subcommand};

mod export;
mod fetch;
mod render;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct CliArgs {
    #[command(subcommand)]
    subcommand: Command,
}

#[derive(Subcommand)]
enum Command {
    Fetch(fetch::CliArgs),
    Map(render::MapArgs),
    Bars(render::BarArgs),
    Export(export::CliArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    match args.subcommand {
        Command::Fetch(args) => fetch::run(&args)?,
        Command::Map(args) => render::run_map(&args)?,
        Command::Bars(args) => render::run_bars(&args)?,
        Command::Export(args) => export::run(&args)?,
    };

    Ok(())
}
