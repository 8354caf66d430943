#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Entry point for the building footprints API server.

use std::path::PathBuf;

use clap::Parser;
use footprints_server::config::ServerConfig;

/// Serve the building footprints API.
#[derive(Parser)]
#[command(name = "footprints_server")]
#[command(about = "Serve the building footprints API")]
struct Cli {
    /// Address to bind to [env: `BIND_ADDR`, default 127.0.0.1].
    #[arg(long)]
    bind_addr: Option<String>,

    /// Port to listen on [env: `PORT`, default 8080].
    #[arg(long)]
    port: Option<u16>,

    /// Path to the buildings `SQLite` database [env: `BUILDINGS_DB_PATH`].
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let mut config = ServerConfig::from_env();
    if let Some(bind_addr) = cli.bind_addr {
        config.bind_addr = bind_addr;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(db_path) = cli.db_path {
        config.db_path = db_path;
    }

    footprints_server::run_server(config).await
}
