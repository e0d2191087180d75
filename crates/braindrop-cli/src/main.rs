//! Braindrop CLI - browse a local copy of raindrop.io bookmarks
//!
//! Downloads collections and raindrops once, then answers list, tag and
//! search queries from the local copy.

mod cli;
mod commands;
mod error;
mod settings;


use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::{run_login, run_logout};
use crate::commands::collections::run_collections;
use crate::commands::common::resolve_paths;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::list::{run_list, ListQuery};
use crate::commands::show::run_show;
use crate::commands::status::run_status;
use crate::commands::sync::run_sync;
use crate::commands::tags::run_tags;
use crate::error::CliError;
use crate::settings::CliSettings;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "braindrop=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sync { force } => {
            let paths = resolve_paths(cli.data_path)?;
            let settings = CliSettings::load().map_err(CliError::Config)?;
            run_sync(&paths, cli.token.as_deref(), &settings, force).await?;
        }
        Commands::List {
            collection,
            tags,
            search,
            limit,
            json,
        } => {
            let paths = resolve_paths(cli.data_path)?;
            let query = ListQuery {
                collection,
                tags,
                search,
            };
            run_list(&query, limit, json, paths.data_file()).await?;
        }
        Commands::Show { id, json } => {
            let paths = resolve_paths(cli.data_path)?;
            run_show(&id, json, paths.data_file()).await?;
        }
        Commands::Collections { json } => {
            let paths = resolve_paths(cli.data_path)?;
            run_collections(json, paths.data_file()).await?;
        }
        Commands::Tags {
            collection,
            by_count,
            json,
        } => {
            let paths = resolve_paths(cli.data_path)?;
            let order = if by_count {
                braindrop_core::TagOrder::Count
            } else {
                CliSettings::load().map_err(CliError::Config)?.tag_order
            };
            run_tags(collection.as_deref(), order, json, paths.data_file()).await?;
        }
        Commands::Status { json } => {
            let paths = resolve_paths(cli.data_path)?;
            run_status(&paths, json).await?;
        }
        Commands::Login { api_token } => {
            let paths = resolve_paths(cli.data_path)?;
            let token = api_token.or(cli.token).ok_or(CliError::EmptyToken)?;
            run_login(&token, &paths)?;
        }
        Commands::Logout => {
            let paths = resolve_paths(cli.data_path)?;
            run_logout(&paths).await?;
        }
        Commands::Config { command } => run_config(command)?,
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
