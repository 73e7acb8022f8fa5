//! Setup configuration.
//!
//! Loaded from a TOML file, with server, realm and webapp URL overridable
//! from the command line or environment.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{SetupError, SetupResult};

/// Keycloak provider id used when registering brokered OIDC providers.
pub const OIDC_PROVIDER_ID: &str = "oidc";

/// Top-level setup configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetupConfig {
    /// Base URL of the webapp the realm serves (e.g., https://app.example.com).
    #[serde(default)]
    pub webapp_url: String,

    /// Keycloak connection settings.
    #[serde(default)]
    pub keycloak: KeycloakConfig,

    /// External identity providers to broker.
    #[serde(default)]
    pub identity_providers: Vec<IdentityProviderConfig>,
}

impl SetupConfig {
    /// Loads configuration from `path`, or from the default location.
    ///
    /// An explicit path must exist. Without one, a missing default file
    /// yields the default configuration.
    pub fn load(path: Option<&Path>) -> SetupResult<Self> {
        let config_path = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(SetupError::Config(format!(
                        "config file not found: {}",
                        p.display()
                    )));
                }
                p.to_path_buf()
            }
            None => {
                let default_path = Self::default_path()?;
                if !default_path.exists() {
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = std::fs::read_to_string(&config_path)?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> SetupResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Gets the default configuration file path.
    pub fn default_path() -> SetupResult<PathBuf> {
        let home = dirs_next::home_dir()
            .ok_or_else(|| SetupError::Config("could not determine home directory".to_string()))?;
        Ok(home.join(".keycloak").join("idp-setup.toml"))
    }

    /// Applies command-line / environment overrides.
    pub fn apply_overrides(
        &mut self,
        server: Option<&str>,
        realm: Option<&str>,
        webapp_url: Option<&str>,
    ) {
        if let Some(s) = server {
            self.keycloak.server_url = s.to_string();
        }
        if let Some(r) = realm {
            self.keycloak.realm = r.to_string();
        }
        if let Some(w) = webapp_url {
            self.webapp_url = w.to_string();
        }
    }

    /// Finds a configured provider by app name, or the first one.
    pub fn provider(&self, app_name: Option<&str>) -> SetupResult<&IdentityProviderConfig> {
        match app_name {
            Some(name) => self
                .identity_providers
                .iter()
                .find(|p| p.app_name == name)
                .ok_or_else(|| SetupError::NotFound {
                    resource_type: "configured identity provider".to_string(),
                    id: name.to_string(),
                }),
            None => self.identity_providers.first().ok_or_else(|| {
                SetupError::Config("no identity providers configured".to_string())
            }),
        }
    }
}

/// Keycloak connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeycloakConfig {
    /// Server URL (e.g., http://localhost:8080).
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Realm the identity provider is registered in.
    #[serde(default = "default_realm")]
    pub realm: String,

    /// Realm the admin credentials belong to.
    #[serde(default = "default_realm")]
    pub admin_realm: String,

    /// Admin credentials.
    #[serde(default)]
    pub auth: AdminAuth,
}

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_realm() -> String {
    "master".to_string()
}

impl Default for KeycloakConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            realm: default_realm(),
            admin_realm: default_realm(),
            auth: AdminAuth::default(),
        }
    }
}

/// Admin API credentials.
///
/// A password grant is used when `username` is set, client credentials
/// otherwise.
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminAuth {
    /// Client ID used to obtain the admin token.
    #[serde(default = "default_admin_client_id")]
    pub client_id: String,
    /// Client secret (confidential clients).
    pub client_secret: Option<String>,
    /// Admin username.
    pub username: Option<String>,
    /// Admin password.
    pub password: Option<String>,
}

fn default_admin_client_id() -> String {
    "admin-cli".to_string()
}

impl Default for AdminAuth {
    fn default() -> Self {
        Self {
            client_id: default_admin_client_id(),
            client_secret: None,
            username: None,
            password: None,
        }
    }
}

impl fmt::Debug for AdminAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminAuth")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Kind of external identity provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityProviderType {
    /// Okta.
    #[default]
    Okta,
    /// Any OpenID Connect provider.
    Oidc,
}

impl IdentityProviderType {
    /// Keycloak provider id used to import and register this provider.
    #[must_use]
    pub fn keycloak_provider_id(self) -> &'static str {
        match self {
            Self::Okta | Self::Oidc => OIDC_PROVIDER_ID,
        }
    }
}

impl fmt::Display for IdentityProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Okta => write!(f, "okta"),
            Self::Oidc => write!(f, "oidc"),
        }
    }
}

/// External identity provider descriptor.
#[derive(Clone, Serialize, Deserialize)]
pub struct IdentityProviderConfig {
    /// Provider kind.
    #[serde(rename = "type", default)]
    pub provider_type: IdentityProviderType,
    /// Provider domain (e.g., example.okta.com).
    pub domain: String,
    /// App name; also the Keycloak alias of the broker entry.
    pub app_name: String,
    /// OAuth client id registered at the provider.
    pub client_id: String,
    /// OAuth client secret registered at the provider.
    pub client_secret: String,
    /// Label shown on the login page.
    pub display_name: Option<String>,
}

impl fmt::Debug for IdentityProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityProviderConfig")
            .field("provider_type", &self.provider_type)
            .field("domain", &self.domain)
            .field("app_name", &self.app_name)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("display_name", &self.display_name)
            .finish()
    }
}
