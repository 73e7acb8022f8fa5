//! Broker configuration map assembly.
//!
//! Derives the discovery and redirect URLs for an external identity provider
//! and builds the key/value config Keycloak expects for a brokered OIDC
//! provider.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::admin::RealmIdentityProviders;
use crate::config::{IdentityProviderConfig, KeycloakConfig};
use crate::dto::ImportConfigRequest;
use crate::SetupResult;

/// Identity provider config as sent to and returned by Keycloak.
pub type ConfigMap = BTreeMap<String, String>;

/// Scopes requested from every brokered provider.
pub const DEFAULT_SCOPE: &str = "openid email profile";

/// Imported key that breaks Okta integrations; never forwarded.
pub const VALIDATE_SIGNATURE_KEY: &str = "validateSignature";

/// Builds broker configuration for one webapp realm.
#[derive(Debug, Clone)]
pub struct ConfigurationMapService {
    webapp_url: String,
    realm: String,
}

impl ConfigurationMapService {
    /// Creates a service for `webapp_url` and the realm in `keycloak`.
    pub fn new(webapp_url: impl Into<String>, keycloak: &KeycloakConfig) -> Self {
        Self {
            webapp_url: webapp_url.into(),
            realm: keycloak.realm.clone(),
        }
    }

    /// Imports provider settings from the provider's discovery document.
    ///
    /// Errors from the admin client are returned unchanged.
    pub async fn import_provider_from(
        &self,
        realm: &dyn RealmIdentityProviders,
        provider: &IdentityProviderConfig,
        provider_type_id: &str,
    ) -> SetupResult<ConfigMap> {
        let request = ImportConfigRequest {
            provider_id: provider_type_id.to_string(),
            from_url: self.provider_discovery_url(provider),
        };
        tracing::debug!(
            app = %provider.app_name,
            from_url = %request.from_url,
            "Importing identity provider config"
        );
        realm.import_from(&request).await
    }

    /// Builds the final provider config on top of `base`.
    ///
    /// Every entry of `base` is kept except `validateSignature`; the
    /// required keys are then set from `provider` and always win.
    #[must_use]
    pub fn setup_provider_config(
        &self,
        provider: &IdentityProviderConfig,
        base: &ConfigMap,
    ) -> ConfigMap {
        let overlay = [
            ("clientId", provider.client_id.clone()),
            ("clientSecret", provider.client_secret.clone()),
            ("defaultScope", DEFAULT_SCOPE.to_string()),
            ("redirectUris", self.provider_redirect_url(provider)),
            ("backchannelSupported", "true".to_string()),
            ("backchannel_logout_session_supported", "true".to_string()),
        ];

        base.iter()
            .filter(|(key, _)| key.as_str() != VALIDATE_SIGNATURE_KEY)
            .map(|(k, v)| (k.clone(), v.clone()))
            .chain(overlay.into_iter().map(|(k, v)| (k.to_string(), v)))
            .collect()
    }

    /// Broker endpoint Keycloak receives the provider's callback on.
    #[must_use]
    pub fn provider_redirect_url(&self, provider: &IdentityProviderConfig) -> String {
        format!(
            "{}auth/realms/{}/broker/{}/endpoint",
            with_trailing_slash(&self.webapp_url),
            self.realm,
            provider.app_name
        )
    }

    /// OpenID Connect discovery document of the provider.
    #[must_use]
    pub fn provider_discovery_url(&self, provider: &IdentityProviderConfig) -> String {
        format!(
            "https://{}.well-known/openid-configuration",
            with_trailing_slash(&provider.domain)
        )
    }

    /// Realm the service builds config for.
    pub fn realm(&self) -> &str {
        &self.realm
    }
}

fn with_trailing_slash(url: &str) -> Cow<'_, str> {
    if url.ends_with('/') {
        Cow::Borrowed(url)
    } else {
        Cow::Owned(format!("{url}/"))
    }
}
