//! # kc-idp-setup
//!
//! Identity provider broker setup for Keycloak realms.
//!
//! This crate provides:
//! - The configuration map helper that derives discovery and redirect URLs
//!   and assembles the broker configuration keys
//! - A realm-scoped admin API seam plus its reqwest implementation
//! - The configurator that creates or updates the managed identity provider
//! - The `kc-idp-setup` command-line tool

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]

pub mod admin;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_map;
pub mod configurator;
pub mod dto;
pub mod error;
pub mod output;

pub use admin::{AdminClient, RealmIdentityProviders};
pub use config::{IdentityProviderConfig, IdentityProviderType, KeycloakConfig, SetupConfig};
pub use config_map::{ConfigMap, ConfigurationMapService};
pub use configurator::{ConfigureOutcome, IdentityProvidersConfigurator};
pub use error::{SetupError, SetupResult};
