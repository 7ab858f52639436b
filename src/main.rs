use clap::Parser;
use spendlog::args::{Args, Command};
use spendlog::{commands, Config, Mode, Result};
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => {
            commands::init(home, init_args.api_url(), init_args.seed_demo())
                .await?
                .print()
        }

        Command::Login(login_args) => {
            let config = Config::load(home).await?;
            commands::login(&config, login_args.email(), login_args.password())
                .await?
                .print()
        }

        Command::Logout => commands::logout(&Config::load(home).await?).await?.print(),

        Command::Shell => {
            let config = Config::load(home).await?;
            commands::require_login(&config, "shell").await?;
            // When SPENDLOG_IN_TEST_MODE is set and non-empty the mode will be Mode::Test, so the
            // program can be exercised without a server.
            let mode = Mode::new(&config);
            let mut store = commands::open_store(&config, &mode).await?;
            let stdin = BufReader::new(tokio::io::stdin());
            commands::shell(&mut store, stdin).await?.print()
        }

        Command::Store(store_command) => {
            let config = Config::load(home).await?;
            commands::require_login(&config, store_command.name()).await?;
            let mode = Mode::new(&config);
            let mut store = commands::open_store(&config, &mode).await?;
            if let Some(message) = store.error() {
                error!("{message}");
            }
            commands::dispatch(&mut store, store_command).await?
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
