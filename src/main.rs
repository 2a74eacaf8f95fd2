mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, LogLevel, Target};
use config::Config;
use planetscale::api::http::format_api_error;
use planetscale::{Client, Credentials};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("pscale started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("pscale").join("pscale.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".pscale").join("pscale.log");
    }
    PathBuf::from("pscale.log")
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    let _log_guard = setup_logging(args.log_level);

    match run(args).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            match err.downcast_ref::<planetscale::Error>() {
                Some(api_err) => {
                    tracing::debug!("{:#}", err);
                    eprintln!("Error: {}", format_api_error(api_err));
                }
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> Result<String> {
    let mut config = Config::load();

    if let Command::Config { command } = &args.command {
        return cli::run_config(command, &mut config, args.output);
    }

    let credentials = Credentials::from_env().context(
        "No credentials found. Set PLANETSCALE_TOKEN, or PLANETSCALE_SERVICE_TOKEN_ID and PLANETSCALE_SERVICE_TOKEN",
    )?;

    let mut builder = Client::builder().credentials(credentials);
    if let Some(base_url) = config.effective_base_url(args.base_url.as_deref()) {
        builder = builder.base_url(base_url);
    }
    let client = builder.build()?;

    let target = Target {
        organization: config.effective_organization(args.org.as_deref()),
        database: config.effective_database(args.database.as_deref()),
    };

    tracing::info!(
        "Using organization: {:?}, database: {:?}",
        target.organization,
        target.database
    );

    cli::run(&args.command, &client, &target, args.output).await
}
