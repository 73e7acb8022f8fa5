//! Keycloak admin API access for a single realm.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::config::{AdminAuth, KeycloakConfig};
use crate::config_map::ConfigMap;
use crate::dto::{IdentityProviderRepresentation, ImportConfigRequest};
use crate::{SetupError, SetupResult};

/// Identity provider operations of one realm.
#[async_trait]
pub trait RealmIdentityProviders: Send + Sync {
    /// Imports provider settings from a discovery document.
    async fn import_from(&self, request: &ImportConfigRequest) -> SetupResult<ConfigMap>;

    /// Lists every identity provider in the realm.
    async fn find_all(&self) -> SetupResult<Vec<IdentityProviderRepresentation>>;

    /// Creates an identity provider.
    async fn create(&self, idp: &IdentityProviderRepresentation) -> SetupResult<()>;

    /// Replaces the identity provider stored under `alias`.
    async fn update(&self, alias: &str, idp: &IdentityProviderRepresentation) -> SetupResult<()>;
}

/// Admin API client bound to one realm.
pub struct AdminClient {
    client: reqwest::Client,
    base_url: String,
    realm: String,
    admin_realm: String,
    auth: AdminAuth,
    token: OnceCell<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl AdminClient {
    /// Creates a new admin client.
    pub fn new(config: &KeycloakConfig) -> SetupResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            realm: config.realm.clone(),
            admin_realm: config.admin_realm.clone(),
            auth: config.auth.clone(),
            token: OnceCell::new(),
        })
    }

    /// Gets the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Gets the realm this client operates on.
    pub fn realm(&self) -> &str {
        &self.realm
    }

    fn idp_path(&self, suffix: &str) -> String {
        format!(
            "{}/admin/realms/{}/identity-provider/{}",
            self.base_url, self.realm, suffix
        )
    }

    /// Returns the cached admin token, requesting one on first use.
    async fn token(&self) -> SetupResult<&str> {
        let token = self
            .token
            .get_or_try_init(|| self.request_token())
            .await?;
        Ok(token.as_str())
    }

    async fn request_token(&self) -> SetupResult<String> {
        let url = format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url, self.admin_realm
        );

        let mut form: Vec<(&str, &str)> = vec![("client_id", self.auth.client_id.as_str())];
        if let Some(secret) = &self.auth.client_secret {
            form.push(("client_secret", secret.as_str()));
        }
        match &self.auth.username {
            Some(username) => {
                let password = self.auth.password.as_deref().ok_or_else(|| {
                    SetupError::Auth("password is required with username".to_string())
                })?;
                form.push(("grant_type", "password"));
                form.push(("username", username.as_str()));
                form.push(("password", password));
            }
            None => {
                if self.auth.client_secret.is_none() {
                    return Err(SetupError::Auth(
                        "either username/password or client_secret must be configured"
                            .to_string(),
                    ));
                }
                form.push(("grant_type", "client_credentials"));
            }
        }

        let response = self.client.post(&url).form(&form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SetupError::Auth(format!(
                "token request failed: {} - {}",
                status.as_u16(),
                message
            )));
        }

        let token: TokenResponse = response.json().await?;
        tracing::debug!(realm = %self.admin_realm, "Obtained admin token");
        Ok(token.access_token)
    }
}

#[async_trait]
impl RealmIdentityProviders for AdminClient {
    async fn import_from(&self, request: &ImportConfigRequest) -> SetupResult<ConfigMap> {
        let token = self.token().await?;
        let response = self
            .client
            .post(self.idp_path("import-config"))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;
        handle_response(response).await
    }

    async fn find_all(&self) -> SetupResult<Vec<IdentityProviderRepresentation>> {
        let token = self.token().await?;
        let response = self
            .client
            .get(self.idp_path("instances"))
            .bearer_auth(token)
            .send()
            .await?;
        handle_response(response).await
    }

    async fn create(&self, idp: &IdentityProviderRepresentation) -> SetupResult<()> {
        let token = self.token().await?;
        let response = self
            .client
            .post(self.idp_path("instances"))
            .bearer_auth(token)
            .json(idp)
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(SetupError::identity_provider_exists(&idp.alias));
        }
        handle_empty_response(response).await
    }

    async fn update(&self, alias: &str, idp: &IdentityProviderRepresentation) -> SetupResult<()> {
        let token = self.token().await?;
        let response = self
            .client
            .put(self.idp_path(&format!("instances/{alias}")))
            .bearer_auth(token)
            .json(idp)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SetupError::identity_provider_not_found(alias));
        }
        handle_empty_response(response).await
    }
}

/// Handles a response with a body.
async fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> SetupResult<T> {
    let status = response.status();

    if status.is_success() {
        response.json().await.map_err(SetupError::Http)
    } else {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(SetupError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Handles a response without a body.
async fn handle_empty_response(response: reqwest::Response) -> SetupResult<()> {
    let status = response.status();

    if status.is_success() {
        Ok(())
    } else {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(SetupError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
