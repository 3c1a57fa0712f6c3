mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::load::LoadArgs;

#[derive(Parser)]
#[command(
    name = "dynaload",
    version,
    about = "Load or delete CSV rows in a DynamoDB table"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a CSV file described by command-line flags
    Load(LoadArgs),
    /// Run a job YAML file
    Run {
        /// Path to job YAML file
        job: PathBuf,
        /// Resolve the key schema but write to an in-memory table
        #[arg(long)]
        dry_run: bool,
        /// Maximum rows to read from the CSV file
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Validate a job file and show the table's key schema
    Check {
        /// Path to job YAML file
        job: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    match cli.command {
        Commands::Load(args) => commands::load::execute(&args).await,
        Commands::Run { job, dry_run, limit } => commands::run::execute(&job, dry_run, limit).await,
        Commands::Check { job } => commands::check::execute(&job).await,
    }
}
