/// Tunebox - playlist and favorites management from the command line
use anyhow::Context;
use clap::Parser;
use std::{path::PathBuf, process::ExitCode, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tunebox_cli::{resolve_identity, CliConfig, CliError, Command, Session};
use tunebox_storage::LocalStorageContext;

#[derive(Parser)]
#[command(name = "tunebox")]
#[command(about = "Browse the music catalog and manage playlists", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// User to act as (overrides session.user_id)
    #[arg(short, long, global = true, env = "TUNEBOX_USER")]
    user: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing; logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tunebox=info,tunebox_cli=info,tunebox_core=info,tunebox_storage=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<String> {
    // Load configuration
    let config = CliConfig::load(cli.config.as_deref())?;
    config.validate()?;

    // Initialize database
    if let Some(parent) = config.database_path().as_deref().and_then(|p| p.parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(CliError::from).with_context(|| {
                format!("Failed to create database directory {}", parent.display())
            })?;
        }
    }
    let pool = tunebox_storage::create_pool(&config.storage.database_url)
        .await
        .map_err(CliError::from)
        .context("Failed to open database")?;
    tunebox_storage::run_migrations(&pool)
        .await
        .map_err(CliError::from)
        .context("Failed to run migrations")?;
    tracing::debug!("Database connected");

    let identity = resolve_identity(cli.user.as_deref(), &config);
    let storage = Arc::new(LocalStorageContext::new(pool));

    let mut session = Session::new(storage, identity, cli.json);
    Ok(session.execute(cli.command).await?)
}
