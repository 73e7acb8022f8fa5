//! Provider URL listing command.

use crate::config::SetupConfig;
use crate::config_map::ConfigurationMapService;
use crate::output::{output, OutputFormat, ProviderUrls};

use super::map_service;

/// Prints discovery and redirect URLs of every configured provider.
pub fn run_urls(config: &SetupConfig, format: OutputFormat) -> crate::SetupResult<()> {
    let rows = provider_urls(&map_service(config), config);
    output(&rows, format)
}

/// Builds one row per configured provider.
#[must_use]
pub fn provider_urls(
    service: &ConfigurationMapService,
    config: &SetupConfig,
) -> Vec<ProviderUrls> {
    config
        .identity_providers
        .iter()
        .map(|provider| ProviderUrls {
            app_name: provider.app_name.clone(),
            provider_type: provider.provider_type.to_string(),
            realm: service.realm().to_string(),
            discovery_url: service.provider_discovery_url(provider),
            redirect_url: service.provider_redirect_url(provider),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{config, provider};
    use crate::config::IdentityProviderType;

    #[test]
    fn one_row_per_provider() {
        let mut corp = provider("corp", "login.example.org/");
        corp.provider_type = IdentityProviderType::Oidc;
        let config = config(vec![provider("okta", "example.okta.com"), corp]);

        let rows = provider_urls(&map_service(&config), &config);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].app_name, "okta");
        assert_eq!(rows[0].provider_type, "okta");
        assert_eq!(rows[0].realm, "airbyte");
        assert_eq!(
            rows[0].discovery_url,
            "https://example.okta.com/.well-known/openid-configuration"
        );
        assert_eq!(
            rows[0].redirect_url,
            "https://app.example.com/auth/realms/airbyte/broker/okta/endpoint"
        );

        assert_eq!(rows[1].app_name, "corp");
        assert_eq!(rows[1].provider_type, "oidc");
        assert_eq!(
            rows[1].discovery_url,
            "https://login.example.org/.well-known/openid-configuration"
        );
        assert_eq!(
            rows[1].redirect_url,
            "https://app.example.com/auth/realms/airbyte/broker/corp/endpoint"
        );
    }

    #[test]
    fn no_providers_no_rows() {
        let config = config(Vec::new());
        assert!(provider_urls(&map_service(&config), &config).is_empty());
        assert!(run_urls(&config, OutputFormat::Json).is_ok());
    }
}
