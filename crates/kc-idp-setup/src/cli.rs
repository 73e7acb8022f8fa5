//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

/// Keycloak identity provider setup tool.
#[derive(Debug, Parser)]
#[command(name = "kc-idp-setup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to ~/.keycloak/idp-setup.toml).
    #[arg(short, long, env = "KC_IDP_SETUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Server URL (overrides config).
    #[arg(short, long, env = "KC_SERVER_URL")]
    pub server: Option<String>,

    /// Realm to configure (overrides config).
    #[arg(short, long, env = "KC_REALM")]
    pub realm: Option<String>,

    /// Webapp base URL (overrides config).
    #[arg(short, long, env = "WEBAPP_URL")]
    pub webapp_url: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or update the managed identity provider in the realm.
    Configure,

    /// Print discovery and redirect URLs of the configured providers.
    Urls,

    /// Print the broker config of a provider.
    Render {
        /// App name of the provider (defaults to the first configured).
        #[arg(long)]
        app: Option<String>,

        /// Skip the discovery import and start from an empty map.
        #[arg(long)]
        offline: bool,
    },
}
