//! Provider config rendering command.

use crate::admin::{AdminClient, RealmIdentityProviders};
use crate::config::{IdentityProviderConfig, SetupConfig};
use crate::config_map::{ConfigMap, ConfigurationMapService};
use crate::output::{output_config, OutputFormat};

use super::map_service;

/// Prints the broker config of one provider.
///
/// With `offline` the discovery import is skipped and no admin client is
/// created.
pub async fn run_render(
    config: &SetupConfig,
    app: Option<&str>,
    offline: bool,
    format: OutputFormat,
) -> crate::SetupResult<ConfigMap> {
    let provider = config.provider(app)?;
    let service = map_service(config);

    let rendered = if offline {
        render_config(&service, provider, None).await?
    } else {
        let client = AdminClient::new(&config.keycloak)?;
        let realm: &dyn RealmIdentityProviders = &client;
        render_config(&service, provider, Some(realm)).await?
    };

    output_config(&rendered, format)?;
    Ok(rendered)
}

/// Builds the final config, importing the base map when a realm is given.
pub async fn render_config(
    service: &ConfigurationMapService,
    provider: &IdentityProviderConfig,
    realm: Option<&dyn RealmIdentityProviders>,
) -> crate::SetupResult<ConfigMap> {
    let base = match realm {
        Some(realm) => {
            let provider_id = provider.provider_type.keycloak_provider_id();
            service
                .import_provider_from(realm, provider, provider_id)
                .await?
        }
        None => ConfigMap::new(),
    };
    Ok(service.setup_provider_config(provider, &base))
}
