// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Formwerk — Universal File Conversion Service
//
// Entry point. Initialises logging, loads the server configuration, and runs
// the HTTP server until interrupted.

use std::path::{Path, PathBuf};

use clap::Parser;
use formwerk_core::{Result, ServerConfig};

#[derive(Parser)]
#[command(name = "formwerk")]
#[command(author, version, about = "Universal file conversion service")]
struct Cli {
    /// Path to the JSON config file
    #[arg(short, long, default_value = "formwerk.json")]
    config: PathBuf,

    /// Override the configured bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the configured listen port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    tracing::info!("Formwerk starting");

    let mut config = match load_config(&cli.config) {
        Some(config) => config,
        None => {
            // First run: write the defaults so the operator has a file to edit.
            let config = ServerConfig::default();
            if let Err(e) = persist_config(&cli.config, &config) {
                tracing::warn!(error = %e, path = %cli.config.display(), "Could not write default config");
            }
            config
        }
    };
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    if let Err(e) = formwerk_server::start_server(config).await {
        tracing::error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

// -- Config file persistence -------------------------------------------------

fn load_config(path: &Path) -> Option<ServerConfig> {
    let data = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&data).ok()
}

fn persist_config(path: &Path, config: &ServerConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}
