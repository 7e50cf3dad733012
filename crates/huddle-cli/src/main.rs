use anyhow::Result;
use clap::{Parser, Subcommand};
use huddle_core::auth::Role;
use huddle_core::config::normalize_base_url;
use huddle_infrastructure::{load_client_config, resolve_state_dir, HuddlePaths};
use std::path::PathBuf;

mod commands;
mod context;
mod logging;

use commands::account::RegisterArgs;
use context::AppContext;

#[derive(Parser)]
#[command(name = "huddle")]
#[command(about = "Huddle - meeting-analysis chat client", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the credential
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// Employee, Manager or HR
        #[arg(long, default_value = "Employee")]
        role: Role,
    },
    /// Forget the stored credential and conversation session
    Logout,
    /// Show who is logged in
    Status,
    /// Print the conversation history
    History,
    /// Start an interactive chat
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_client_config(cli.config.as_deref())?;
    if let Some(url) = &cli.api_url {
        config.api_base_url = normalize_base_url(url)?;
    }
    let state_dir = resolve_state_dir(&config)?;
    let _log_guard = logging::init_file_tracing(&HuddlePaths::logs_dir(&state_dir), cli.verbose)?;

    let ctx = AppContext::new(config, state_dir)?;

    match cli.command {
        Commands::Login { email } => commands::account::login(&ctx, email).await?,
        Commands::Register {
            email,
            first_name,
            last_name,
            role,
        } => {
            commands::account::register(
                &ctx,
                RegisterArgs {
                    email,
                    first_name,
                    last_name,
                    role,
                },
            )
            .await?
        }
        Commands::Logout => commands::account::logout(&ctx)?,
        Commands::Status => commands::account::status(&ctx)?,
        Commands::History => commands::chat::history(&ctx).await?,
        Commands::Chat => commands::chat::run(&ctx).await?,
    }

    Ok(())
}
