use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use todo_sync::cli::{Cli, CliCommand, ListArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_filter.clone())?;

    let config = todo_sync::config::from_cli(&cli)?;
    let command = cli
        .command
        .clone()
        .unwrap_or_else(|| CliCommand::List(ListArgs::default()));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    let stdout = std::io::stdout();
    let handle = stdout.lock();
    runtime.block_on(todo_sync::commands::run(&config, command, cli.json, handle))
}

fn init_tracing(filter: Option<String>) -> Result<()> {
    let filter = filter.unwrap_or_else(|| "warn".to_string());
    let directive: Directive = filter
        .parse()
        .with_context(|| format!("invalid log directive '{filter}'"))?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
    Ok(())
}
