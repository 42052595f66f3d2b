//! labtrack CLI
//!
//! Terminal front end for tracking dental lab cases through their
//! workstation steps.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use labtrack_core::StoreBuilder;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        storage_dir,
        public_url,
        lab,
        view,
        no_color,
        command,
    } = Args::parse();

    let store = StoreBuilder::new()
        .with_database_path(database_file)
        .with_storage_root(storage_dir)
        .with_public_url(public_url)
        .build()
        .await
        .context("Failed to initialize data store")?;

    info!("labtrack started for lab {lab}");

    let cli = Cli::new(store, TerminalRenderer::new(!no_color), lab, view.into());

    match command {
        Some(Technician { command }) => cli.handle_technician_command(command).await,
        Some(WorkstationType { command }) => cli.handle_type_command(command).await,
        Some(Case { command }) => cli.handle_case_command(command).await,
        Some(Step { command }) => cli.handle_step_command(command).await,
        None => cli.list_cases().await,
    }
}
