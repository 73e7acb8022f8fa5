//! Keycloak admin API representations.

use serde::{Deserialize, Serialize};

use crate::config_map::ConfigMap;

/// Request body for importing provider settings from a discovery document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportConfigRequest {
    /// Keycloak provider id (e.g., `oidc`).
    pub provider_id: String,
    /// URL of the OpenID Connect discovery document.
    pub from_url: String,
}

/// Identity provider (broker) representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProviderRepresentation {
    /// Unique alias within the realm.
    pub alias: String,
    /// Server-assigned identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<String>,
    /// Label shown on the login page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Provider implementation id.
    pub provider_id: String,
    /// Whether the provider is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Trust emails supplied by the provider.
    #[serde(default)]
    pub trust_email: bool,
    /// Store provider tokens.
    #[serde(default)]
    pub store_token: bool,
    /// Only allow linking existing accounts.
    #[serde(default)]
    pub link_only: bool,
    /// Flow run on first broker login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_broker_login_flow_alias: Option<String>,
    /// Provider-specific settings.
    #[serde(default)]
    pub config: ConfigMap,
}

impl IdentityProviderRepresentation {
    /// Creates an enabled representation with an empty config.
    pub fn new(alias: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            internal_id: None,
            display_name: None,
            provider_id: provider_id.into(),
            enabled: true,
            trust_email: false,
            store_token: false,
            link_only: false,
            first_broker_login_flow_alias: None,
            config: ConfigMap::new(),
        }
    }

    /// Returns whether the config holds `key` with the value `"true"`.
    #[must_use]
    pub fn config_flag(&self, key: &str) -> bool {
        self.config.get(key).is_some_and(|v| v == "true")
    }
}
