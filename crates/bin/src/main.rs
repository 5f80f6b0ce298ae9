mod cli;
mod commands;
mod output;
mod store;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::output::OutputFormat;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("pixelsync=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::from_flag(cli.json);
    let file = cli.file.as_path();
    let replica = cli.replica.as_deref();

    match &cli.command {
        Commands::Init => commands::edit::run_init(file, replica, format).await,
        Commands::Set(args) => commands::edit::run_set(file, replica, args, format).await,
        Commands::Delete(args) => commands::edit::run_delete(file, replica, args, format).await,
        Commands::Get(args) => commands::query::run_get(file, args, format).await,
        Commands::Show => commands::query::run_show(file, format).await,
        Commands::Export => commands::query::run_export(file).await,
        Commands::Merge(args) => commands::merge::run(file, replica, args, format).await,
    }
}
