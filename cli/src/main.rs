//! iterme CLI - Generate iTerm2 profiles for cloud and cluster access
//!
//! A command-line tool for deriving terminal profiles from AWS and
//! Kubernetes configuration, and for managing keys kept in the keychain.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "ITERME_LOG";

#[derive(Parser)]
#[command(name = "iterme")]
#[command(author, version, about = "Generate iTerm2 profiles from AWS and Kubernetes configuration")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the dynamic profiles file
    #[command(alias = "gen")]
    Generate {
        #[command(flatten)]
        options: commands::generate::GenerateOptions,
    },

    /// Sort an AWS config file by profile, then by key
    Sort {
        /// Config file to sort (defaults to the configured AWS config)
        path: Option<PathBuf>,

        /// Print the sorted file instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Store the access keys from a credentials CSV in the keychain
    Import {
        /// Credentials CSV downloaded from the AWS console
        path: PathBuf,
    },

    /// Print shell exports for a stored identity
    Export {
        /// Identity ARN the keys are stored under
        arn: String,
    },

    /// Remove a stored identity from the keychain
    #[command(alias = "rm")]
    Forget {
        /// Identity ARN the keys are stored under
        arn: String,
    },

    /// List the profiles in the generated file
    #[command(alias = "ls")]
    List {
        /// Filter by profile name
        #[arg(short = 'n', long)]
        name: Option<String>,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show all settings
    Show,
    /// Print one setting
    Get { key: String },
    /// Change one setting
    Set { key: String, value: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Generate { options } => {
            commands::generate::run(options, cli.json).await?;
        }
        Commands::Sort { path, dry_run } => {
            commands::sort::run(path, dry_run).await?;
        }
        Commands::Import { path } => {
            commands::secrets::import(&path, cli.json).await?;
        }
        Commands::Export { arn } => {
            commands::secrets::export(&arn).await?;
        }
        Commands::Forget { arn } => {
            commands::secrets::forget(&arn).await?;
        }
        Commands::List { name } => {
            commands::list::run(name, cli.json).await?;
        }
        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => commands::config::show(cli.json).await?,
            ConfigAction::Get { key } => commands::config::get(&key).await?,
            ConfigAction::Set { key, value } => commands::config::set(&key, &value).await?,
        },
    }

    Ok(())
}
