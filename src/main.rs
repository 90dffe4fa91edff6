use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::client::HttpCatalogClient;
use crate::config::KeyResolver;
use crate::session::FileSessionProvider;

mod app;
mod auth;
mod catalog;
mod cli;
mod client;
pub mod commands;
mod config;
mod session;
mod theme;
pub mod tui;
mod ui;

pub use theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting lazybooking");

    let args = cli::Args::parse();

    let mut config = config::load()?;
    config.apply_cli_args(&args);

    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone())));
    let theme = theme::theme_from_name(&config.theme.name);
    let client = Arc::new(HttpCatalogClient::new(&config.api)?);
    let session_path = config.session.resolved_path();
    info!("Reading session from {:?}", session_path);
    let session = Arc::new(FileSessionProvider::new(session_path));

    let mut app = App::new(&config, client, session, resolver, theme);
    app.run().await?;

    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = config::data_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "lazybooking.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
