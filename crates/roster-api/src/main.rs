//! roster CLI and REST API entry point.
//!
//! Binary name: `roster`
//!
//! Parses CLI arguments, loads configuration, initializes tracing, the
//! database and services, then dispatches to the appropriate command handler
//! or starts the REST API server.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;

use roster_infra::config::{apply_env_overrides, load_config, resolve_data_dir};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = resolve_data_dir();
    tokio::fs::create_dir_all(&data_dir)
        .await
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let mut config = load_config(&data_dir).await;
    apply_env_overrides(&mut config);

    // One-shot commands stay quiet unless asked; the server logs at the configured level.
    let filter = match cli.verbose {
        0 if cli.command.is_serve() => config.log.filter.clone(),
        0 => "warn".to_string(),
        1 => "info,roster=debug".to_string(),
        _ => "trace".to_string(),
    };
    roster_observe::init_tracing(config.log.format, config.log.otel, &filter)
        .map_err(|e| anyhow::anyhow!(e))?;

    let result = run(cli, config, data_dir).await;
    roster_observe::shutdown_tracing();
    result
}

async fn run(
    cli: Cli,
    mut config: roster_types::config::RosterConfig,
    data_dir: std::path::PathBuf,
) -> anyhow::Result<()> {
    if let Commands::Serve { port, host } = &cli.command {
        if let Some(port) = port {
            config.server.port = *port;
        }
        if let Some(host) = host {
            config.server.host = host.clone();
        }
    }

    let state = AppState::init(config, data_dir).await?;

    match cli.command {
        Commands::Serve { .. } => {
            let addr = format!("{}:{}", state.config.server.host, state.config.server.port);

            println!(
                "  {} roster API listening on {}",
                console::style("*").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            http::serve(state, &addr).await?;

            println!("\n  Server stopped.");
        }
        Commands::Team { action } => {
            cli::team::handle_team_command(action, &state, cli.json).await?;
        }
        Commands::User { action } => {
            cli::user::handle_user_command(action, &state, cli.json).await?;
        }
        Commands::Pr { action } => {
            cli::pull_request::handle_pr_command(action, &state, cli.json).await?;
        }
    }

    Ok(())
}
