mod chunk_size;
mod cli;
mod commands;
mod config;
mod dispatch;
mod error;
mod mcp;
mod mode;
mod naming;
mod page_range;
mod pdf;
mod transform;

use anyhow::{anyhow, Result};
use clap::Parser;
use cli::{Cli, Commands};
use commands::process::PromptConfirm;
use config::Config;
use dispatch::Dispatcher;
use error::PickError;
use mode::Mode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        // Bad input gets a plain message; anything else keeps its cause chain.
        if let Some(pick) = err.downcast_ref::<PickError>() {
            if pick.is_user_correctable() {
                eprintln!("Error: {}", pick);
                std::process::exit(2);
            }
        }
        return Err(err);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = Config::resolve(cli.config.as_deref())?;
    init_logging(cli.log_level.as_deref(), &cfg)?;

    let dispatcher = Dispatcher::from_config(&cfg);
    let mut confirm = PromptConfirm {
        assume_yes: cli.yes,
    };

    match cli.command {
        Commands::Mcp => {
            mcp::run_server(cfg).await?;
        }
        Commands::Info { path } => {
            commands::info::run(&path, cli.json)?;
        }
        Commands::Modes => {
            commands::modes::run(dispatcher.registry(), cli.json)?;
        }
        Commands::Trim {
            path,
            pages,
            output,
        } => {
            commands::process::run(
                &dispatcher,
                Mode::Selection.name(),
                &path,
                &pages,
                output,
                &mut confirm,
                cli.json,
            )?;
        }
        Commands::Split {
            path,
            chunk_size,
            output,
        } => {
            commands::process::run(
                &dispatcher,
                Mode::Split.name(),
                &path,
                &chunk_size,
                output,
                &mut confirm,
                cli.json,
            )?;
        }
        Commands::Rasterize {
            path,
            pages,
            output,
        } => {
            commands::process::run(
                &dispatcher,
                Mode::Rasterize.name(),
                &path,
                &pages,
                output,
                &mut confirm,
                cli.json,
            )?;
        }
        Commands::Run {
            mode,
            path,
            input,
            output,
        } => {
            commands::process::run(
                &dispatcher,
                &mode,
                &path,
                &input,
                output,
                &mut confirm,
                cli.json,
            )?;
        }
    }

    Ok(())
}

/// Logs go to stderr: stdout carries results, and the MCP protocol in server mode.
fn init_logging(level_override: Option<&str>, cfg: &Config) -> Result<()> {
    let level = level_override.unwrap_or(cfg.logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}
