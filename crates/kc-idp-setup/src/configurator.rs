//! Creates or updates the managed identity provider of a realm.

use std::fmt;

use crate::admin::RealmIdentityProviders;
use crate::config::IdentityProviderConfig;
use crate::config_map::ConfigurationMapService;
use crate::dto::IdentityProviderRepresentation;
use crate::SetupResult;

/// Config entry marking the identity provider this tool owns.
pub const MANAGED_IDP_KEY: &str = "managed-idp";

/// Marker value.
pub const MANAGED_IDP_VALUE: &str = "true";

/// Result of a configure run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigureOutcome {
    /// A new identity provider was created.
    Created {
        /// Alias of the created provider.
        alias: String,
    },
    /// An existing identity provider was replaced.
    Updated {
        /// Alias the update was sent to.
        alias: String,
    },
    /// Nothing was changed.
    Skipped {
        /// Why the run did nothing.
        reason: String,
    },
}

impl fmt::Display for ConfigureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { alias } => write!(f, "Identity provider '{}' created", alias),
            Self::Updated { alias } => write!(f, "Identity provider '{}' updated", alias),
            Self::Skipped { reason } => write!(f, "Identity provider setup skipped: {}", reason),
        }
    }
}

/// Applies the configured identity provider to a realm.
pub struct IdentityProvidersConfigurator<'a> {
    service: &'a ConfigurationMapService,
    providers: &'a [IdentityProviderConfig],
}

impl<'a> IdentityProvidersConfigurator<'a> {
    /// Creates a configurator.
    pub fn new(
        service: &'a ConfigurationMapService,
        providers: &'a [IdentityProviderConfig],
    ) -> Self {
        Self { service, providers }
    }

    /// Creates the managed provider, or updates it when the realm already
    /// has one.
    ///
    /// An existing provider is updated when it carries the managed marker,
    /// or when it is the only provider in the realm. Ambiguous realms are
    /// left untouched.
    pub async fn configure(
        &self,
        realm: &dyn RealmIdentityProviders,
    ) -> SetupResult<ConfigureOutcome> {
        let Some(provider) = self.providers.first() else {
            tracing::info!("No identity providers configured, skipping setup");
            return Ok(skipped("no identity providers configured"));
        };
        if self.providers.len() > 1 {
            tracing::warn!(
                count = self.providers.len(),
                app = %provider.app_name,
                "Multiple identity providers configured, only the first is used"
            );
        }

        let existing = realm.find_all().await?;
        if existing.is_empty() {
            tracing::info!(app = %provider.app_name, "No existing identity providers, creating");
            let idp = self.build_idp(realm, provider).await?;
            realm.create(&idp).await?;
            tracing::info!(alias = %idp.alias, "Identity provider created");
            return Ok(ConfigureOutcome::Created { alias: idp.alias });
        }

        let managed: Vec<&IdentityProviderRepresentation> = existing
            .iter()
            .filter(|idp| idp.config_flag(MANAGED_IDP_KEY))
            .collect();

        let target = match managed.as_slice() {
            [single] => {
                tracing::info!(alias = %single.alias, "Found managed identity provider, updating");
                *single
            }
            [] if existing.len() == 1 => {
                tracing::info!(
                    alias = %existing[0].alias,
                    "Found exactly one identity provider, updating and marking it as managed"
                );
                &existing[0]
            }
            [] => {
                tracing::warn!(
                    count = existing.len(),
                    "Multiple identity providers exist, none marked as managed, skipping setup"
                );
                return Ok(skipped(
                    "multiple identity providers exist and none is marked as managed",
                ));
            }
            _ => {
                tracing::warn!(
                    count = managed.len(),
                    key = MANAGED_IDP_KEY,
                    "Multiple identity providers are marked as managed, skipping setup"
                );
                return Ok(skipped("multiple identity providers are marked as managed"));
            }
        };

        let mut idp = self.build_idp(realm, provider).await?;
        idp.internal_id = target.internal_id.clone();
        realm.update(&target.alias, &idp).await?;
        tracing::info!(alias = %target.alias, "Identity provider updated");
        Ok(ConfigureOutcome::Updated {
            alias: target.alias.clone(),
        })
    }

    async fn build_idp(
        &self,
        realm: &dyn RealmIdentityProviders,
        provider: &IdentityProviderConfig,
    ) -> SetupResult<IdentityProviderRepresentation> {
        let provider_id = provider.provider_type.keycloak_provider_id();
        let imported = self
            .service
            .import_provider_from(realm, provider, provider_id)
            .await?;

        let mut config = self.service.setup_provider_config(provider, &imported);
        config.insert(MANAGED_IDP_KEY.to_string(), MANAGED_IDP_VALUE.to_string());

        let mut idp = IdentityProviderRepresentation::new(&provider.app_name, provider_id);
        idp.display_name = provider.display_name.clone();
        idp.config = config;
        Ok(idp)
    }
}

fn skipped(reason: &str) -> ConfigureOutcome {
    ConfigureOutcome::Skipped {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IdentityProviderType, KeycloakConfig};
    use crate::config_map::ConfigMap;
    use crate::dto::ImportConfigRequest;
    use crate::SetupError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeRealm {
        existing: Vec<IdentityProviderRepresentation>,
        imports: Mutex<Vec<ImportConfigRequest>>,
        created: Mutex<Vec<IdentityProviderRepresentation>>,
        updated: Mutex<Vec<(String, IdentityProviderRepresentation)>>,
        fail_import: bool,
    }

    #[async_trait]
    impl RealmIdentityProviders for FakeRealm {
        async fn import_from(&self, request: &ImportConfigRequest) -> SetupResult<ConfigMap> {
            self.imports.lock().unwrap().push(request.clone());
            if self.fail_import {
                return Err(SetupError::Api {
                    status: 400,
                    message: "unable to fetch discovery document".to_string(),
                });
            }
            let mut config = ConfigMap::new();
            config.insert("issuer".to_string(), "https://example.okta.com".to_string());
            config.insert("validateSignature".to_string(), "true".to_string());
            Ok(config)
        }

        async fn find_all(&self) -> SetupResult<Vec<IdentityProviderRepresentation>> {
            Ok(self.existing.clone())
        }

        async fn create(&self, idp: &IdentityProviderRepresentation) -> SetupResult<()> {
            self.created.lock().unwrap().push(idp.clone());
            Ok(())
        }

        async fn update(
            &self,
            alias: &str,
            idp: &IdentityProviderRepresentation,
        ) -> SetupResult<()> {
            self.updated
                .lock()
                .unwrap()
                .push((alias.to_string(), idp.clone()));
            Ok(())
        }
    }

    fn service() -> ConfigurationMapService {
        let keycloak = KeycloakConfig {
            realm: "airbyte".to_string(),
            ..KeycloakConfig::default()
        };
        ConfigurationMapService::new("https://app.example.com", &keycloak)
    }

    fn provider(app_name: &str) -> IdentityProviderConfig {
        IdentityProviderConfig {
            provider_type: IdentityProviderType::Okta,
            domain: "example.okta.com".to_string(),
            app_name: app_name.to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            display_name: Some("Okta".to_string()),
        }
    }

    fn existing(alias: &str, internal_id: &str, managed: bool) -> IdentityProviderRepresentation {
        let mut idp = IdentityProviderRepresentation::new(alias, "oidc");
        idp.internal_id = Some(internal_id.to_string());
        if managed {
            idp.config
                .insert(MANAGED_IDP_KEY.to_string(), MANAGED_IDP_VALUE.to_string());
        }
        idp
    }

    #[tokio::test]
    async fn skips_without_configured_providers() {
        let service = service();
        let realm = FakeRealm::default();
        let outcome = IdentityProvidersConfigurator::new(&service, &[])
            .configure(&realm)
            .await
            .unwrap();

        assert!(matches!(outcome, ConfigureOutcome::Skipped { .. }));
        assert!(realm.imports.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn creates_when_realm_is_empty() {
        let service = service();
        let providers = [provider("okta")];
        let realm = FakeRealm::default();

        let outcome = IdentityProvidersConfigurator::new(&service, &providers)
            .configure(&realm)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ConfigureOutcome::Created {
                alias: "okta".to_string()
            }
        );

        let imports = realm.imports.lock().unwrap();
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].provider_id, "oidc");
        assert_eq!(
            imports[0].from_url,
            "https://example.okta.com/.well-known/openid-configuration"
        );

        let created = realm.created.lock().unwrap();
        let idp = &created[0];
        assert_eq!(idp.alias, "okta");
        assert_eq!(idp.provider_id, "oidc");
        assert!(idp.enabled);
        assert_eq!(idp.display_name.as_deref(), Some("Okta"));
        assert_eq!(idp.config["issuer"], "https://example.okta.com");
        assert_eq!(idp.config["clientId"], "client");
        assert!(!idp.config.contains_key("validateSignature"));
        assert!(idp.config_flag(MANAGED_IDP_KEY));
    }

    #[tokio::test]
    async fn updates_managed_provider() {
        let service = service();
        let providers = [provider("okta")];
        let realm = FakeRealm {
            existing: vec![
                existing("google", "id-1", false),
                existing("old-okta", "id-2", true),
            ],
            ..FakeRealm::default()
        };

        let outcome = IdentityProvidersConfigurator::new(&service, &providers)
            .configure(&realm)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ConfigureOutcome::Updated {
                alias: "old-okta".to_string()
            }
        );

        let updated = realm.updated.lock().unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].0, "old-okta");
        assert_eq!(updated[0].1.alias, "okta");
        assert_eq!(updated[0].1.internal_id.as_deref(), Some("id-2"));
        assert!(realm.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn updates_and_marks_single_unmanaged_provider() {
        let service = service();
        let providers = [provider("okta")];
        let realm = FakeRealm {
            existing: vec![existing("legacy", "id-9", false)],
            ..FakeRealm::default()
        };

        let outcome = IdentityProvidersConfigurator::new(&service, &providers)
            .configure(&realm)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ConfigureOutcome::Updated {
                alias: "legacy".to_string()
            }
        );

        let updated = realm.updated.lock().unwrap();
        assert_eq!(updated[0].1.internal_id.as_deref(), Some("id-9"));
        assert!(updated[0].1.config_flag(MANAGED_IDP_KEY));
    }

    #[tokio::test]
    async fn skips_ambiguous_unmanaged_realm() {
        let service = service();
        let providers = [provider("okta")];
        let realm = FakeRealm {
            existing: vec![existing("a", "id-1", false), existing("b", "id-2", false)],
            ..FakeRealm::default()
        };

        let outcome = IdentityProvidersConfigurator::new(&service, &providers)
            .configure(&realm)
            .await
            .unwrap();
        assert!(matches!(outcome, ConfigureOutcome::Skipped { .. }));
        assert!(realm.imports.lock().unwrap().is_empty());
        assert!(realm.updated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn skips_when_several_are_managed() {
        let service = service();
        let providers = [provider("okta")];
        let realm = FakeRealm {
            existing: vec![existing("a", "id-1", true), existing("b", "id-2", true)],
            ..FakeRealm::default()
        };

        let outcome = IdentityProvidersConfigurator::new(&service, &providers)
            .configure(&realm)
            .await
            .unwrap();
        assert!(matches!(outcome, ConfigureOutcome::Skipped { .. }));
        assert!(realm.updated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn uses_first_of_several_configured() {
        let service = service();
        let providers = [provider("first"), provider("second")];
        let realm = FakeRealm::default();

        let outcome = IdentityProvidersConfigurator::new(&service, &providers)
            .configure(&realm)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ConfigureOutcome::Created {
                alias: "first".to_string()
            }
        );
    }

    #[tokio::test]
    async fn import_errors_propagate() {
        let service = service();
        let providers = [provider("okta")];
        let realm = FakeRealm {
            fail_import: true,
            ..FakeRealm::default()
        };

        let err = IdentityProvidersConfigurator::new(&service, &providers)
            .configure(&realm)
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::Api { status: 400, .. }));
        assert!(realm.created.lock().unwrap().is_empty());
    }

    #[test]
    fn outcome_display() {
        let outcome = ConfigureOutcome::Created {
            alias: "okta".to_string(),
        };
        assert_eq!(outcome.to_string(), "Identity provider 'okta' created");
    }
}
