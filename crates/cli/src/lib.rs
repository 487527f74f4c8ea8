pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use permia_core::{AssistantConfig, ConfigOverrides, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "permia",
    about = "Art. 11 leave-permit assistant",
    long_about = "Ask grounded questions about the Villalbilla Art. 11 paid-leave catalog, \
                  one-shot or in an interactive session.",
    after_help = "Examples:\n  permia ask \"¿Cuántos días por boda?\"\n  permia repl --role laboral\n  permia config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a permia.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Comma-separated generation API keys (overrides file and env)")]
    api_keys: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Answer a single query and exit")]
    Ask {
        query: String,
        #[arg(long, default_value = "funcionario", help = "Staff regime: funcionario|laboral")]
        role: String,
        #[arg(long, help = "JSON catalog file; the built-in demo catalog when omitted")]
        catalog: Option<PathBuf>,
    },
    #[command(about = "Interactive session sharing one conversation history")]
    Repl {
        #[arg(long, default_value = "funcionario", help = "Staff regime: funcionario|laboral")]
        role: String,
        #[arg(long, help = "JSON catalog file; the built-in demo catalog when omitted")]
        catalog: Option<PathBuf>,
    },
    #[command(about = "Inspect effective configuration values with credentials redacted")]
    Config,
}

fn init_logging(config: &AssistantConfig) {
    use permia_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match AssistantConfig::load(LoadOptions {
        require_file: cli.config.is_some(),
        config_path: cli.config,
        overrides: ConfigOverrides { credentials: cli.api_keys, ..ConfigOverrides::default() },
    }) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("configuration error: {error}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config);

    let result = match cli.command {
        Command::Ask { query, role, catalog } => {
            commands::ask::run(&config, &role, catalog.as_deref(), &query).await
        }
        Command::Repl { role, catalog } => {
            commands::repl::run(&config, &role, catalog.as_deref()).await
        }
        Command::Config => commands::config::run(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
