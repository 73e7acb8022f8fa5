//! # kc-idp-setup
//!
//! Registers an external identity provider with a Keycloak realm.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![allow(clippy::uninlined_format_args)]

use clap::Parser;
use kc_idp_setup::{
    cli::{Cli, Command},
    commands::{run_configure, run_render, run_urls},
    output::error,
    SetupConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let mut config = match SetupConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error(&format!("Failed to load configuration: {}", e));
            std::process::exit(1);
        }
    };
    config.apply_overrides(
        cli.server.as_deref(),
        cli.realm.as_deref(),
        cli.webapp_url.as_deref(),
    );

    // Execute command
    let result = match cli.command {
        Command::Configure => run_configure(&config).await.map(|_| ()),
        Command::Urls => run_urls(&config, cli.output),
        Command::Render { app, offline } => {
            run_render(&config, app.as_deref(), offline, cli.output)
                .await
                .map(|_| ())
        }
    };

    if let Err(e) = result {
        error(&e.to_string());
        std::process::exit(1);
    }
}
