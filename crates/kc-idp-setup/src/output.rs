//! Output formatting utilities.

use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::config_map::ConfigMap;

/// Output format.
#[derive(Debug, Clone, Copy, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}

/// Config keys whose values are never printed in tables.
const SECRET_KEYS: &[&str] = &["clientSecret"];

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// One config entry for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct ConfigEntry {
    /// Config key.
    #[tabled(rename = "Key")]
    pub key: String,
    /// Config value.
    #[tabled(rename = "Value")]
    pub value: String,
}

/// Provider URLs for display.
#[derive(Debug, Clone, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct ProviderUrls {
    /// App name.
    #[tabled(rename = "App")]
    pub app_name: String,
    /// Provider kind.
    #[tabled(rename = "Type")]
    pub provider_type: String,
    /// Realm the broker entry lives in.
    #[tabled(rename = "Realm")]
    pub realm: String,
    /// Discovery document URL.
    #[tabled(rename = "Discovery URL")]
    pub discovery_url: String,
    /// Broker redirect URL.
    #[tabled(rename = "Redirect URL")]
    pub redirect_url: String,
}

/// Outputs rows in the specified format.
pub fn output<T: Tabled + Serialize>(data: &[T], format: OutputFormat) -> crate::SetupResult<()> {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                info("No results found.");
            } else {
                let table = Table::new(data).with(Style::rounded()).to_string();
                println!("{table}");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data)?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Outputs a config map. Secrets are masked in table format.
pub fn output_config(config: &ConfigMap, format: OutputFormat) -> crate::SetupResult<()> {
    match format {
        OutputFormat::Table => output(&config_entries(config), format),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(config)?;
            println!("{json}");
            Ok(())
        }
    }
}

/// Converts a config map to display rows with secrets masked.
#[must_use]
pub fn config_entries(config: &ConfigMap) -> Vec<ConfigEntry> {
    config
        .iter()
        .map(|(key, value)| ConfigEntry {
            key: key.clone(),
            value: if SECRET_KEYS.contains(&key.as_str()) {
                mask_secret(value)
            } else {
                value.clone()
            },
        })
        .collect()
}

/// Masks a secret value.
fn mask_secret(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_client_secret() {
        let mut config = ConfigMap::new();
        config.insert("clientId".to_string(), "client".to_string());
        config.insert("clientSecret".to_string(), "shh".to_string());

        let entries = config_entries(&config);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, "clientId");
        assert_eq!(entries[0].value, "client");
        assert_eq!(entries[1].key, "clientSecret");
        assert_eq!(entries[1].value, "****");
    }

    #[test]
    fn empty_secret_stays_empty() {
        assert_eq!(mask_secret(""), "");
    }
}
