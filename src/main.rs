use clap::Parser;
use dodo::commands::{Command, Context};
use dodo::error::CliResult;
use dodo_db::{Database, LocalCoverStore};
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable name for the database path
const DODO_DB_PATH_ENV: &str = "DODO_DB_PATH";

/// Environment variable name for the cover storage root
const DODO_STORAGE_PATH_ENV: &str = "DODO_STORAGE_PATH";

/// dodo - A personal to-do list
#[derive(Parser)]
#[command(name = "dodo")]
#[command(version = "0.1.0")]
#[command(about = "A personal to-do list with a CLI and a JSON HTTP API", long_about = None)]
struct Args {
    /// Path to the database directory (can also be set via DODO_DB_PATH env var)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Directory holding cover images (can also be set via DODO_STORAGE_PATH env var)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// User whose todos the command acts on
    #[arg(long, short, global = true, env = "DODO_USER")]
    user: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Command>,
}

/// Pick a path from the command line, an environment variable, or a default.
///
/// Priority:
/// 1. Command line argument
/// 2. Environment variable (if non-empty)
/// 3. Default path
fn resolve_path(cli: Option<PathBuf>, env_var: &str, default: fn() -> PathBuf) -> PathBuf {
    if let Some(path) = cli {
        return path;
    }

    if let Ok(env_path) = std::env::var(env_var)
        && !env_path.is_empty()
    {
        return PathBuf::from(env_path);
    }

    default()
}

/// Database path: --db, then DODO_DB_PATH, then the data directory
fn resolve_db_path(cli_db: Option<PathBuf>) -> PathBuf {
    resolve_path(cli_db, DODO_DB_PATH_ENV, Database::default_path)
}

/// Storage root: --storage, then DODO_STORAGE_PATH, then the data directory
fn resolve_storage_path(cli_storage: Option<PathBuf>) -> PathBuf {
    resolve_path(
        cli_storage,
        DODO_STORAGE_PATH_ENV,
        LocalCoverStore::default_path,
    )
}

/// Initialize logging from RUST_LOG
///
/// Examples:
/// - `RUST_LOG=debug` - show debug and above
/// - `RUST_LOG=dodo_db=trace` - trace the database layer only
/// - `RUST_LOG=actix_web=info` - show request logs while serving
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(e) = run_app().await {
        eprintln!("error: {}", e.full_message());
        process::exit(1);
    }
}

/// Main application logic - separated for testability
async fn run_app() -> CliResult<()> {
    let args = Args::parse();
    run_with_args(&args).await
}

/// Run the application with the given arguments
async fn run_with_args(args: &Args) -> CliResult<()> {
    let db_path = resolve_db_path(args.db.clone());
    let storage_path = resolve_storage_path(args.storage.clone());
    debug!("Database at {:?}, covers at {:?}", db_path, storage_path);

    let db = Database::open(&db_path).await?;
    let store = LocalCoverStore::open(&storage_path)?;
    let ctx = Context::new(db, store, args.user.clone());

    match &args.command {
        Some(cmd) => {
            let result = cmd.execute(&ctx).await?;
            println!("{}", result);
        }
        None => {
            println!("Welcome to dodo!");
            println!("Use 'dodo --help' for usage information.");
        }
    }

    Ok(())
}
