//! Identity provider configure command.

use crate::admin::AdminClient;
use crate::config::SetupConfig;
use crate::configurator::{ConfigureOutcome, IdentityProvidersConfigurator};
use crate::output::{info, success, warning};

use super::map_service;

/// Runs the configure command against the configured server.
pub async fn run_configure(config: &SetupConfig) -> crate::SetupResult<ConfigureOutcome> {
    let client = AdminClient::new(&config.keycloak)?;
    info(&format!(
        "Configuring identity provider in realm '{}' at {}",
        client.realm(),
        client.base_url()
    ));

    let service = map_service(config);
    let outcome = IdentityProvidersConfigurator::new(&service, &config.identity_providers)
        .configure(&client)
        .await?;

    match &outcome {
        ConfigureOutcome::Skipped { .. } => warning(&outcome.to_string()),
        _ => success(&outcome.to_string()),
    }
    Ok(outcome)
}
