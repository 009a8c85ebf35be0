//! Identity provider capability.
//!
//! The service never sees passwords beyond forwarding them at signup, and
//! never stores credentials. Token verification and account creation are
//! delegated to an external provider; [`HttpIdentityProvider`] talks to a
//! GoTrue-compatible REST API.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid or expired token")]
    InvalidToken,
    /// The provider refused the request; carries its message.
    #[error("{0}")]
    Rejected(String),
    #[error("invalid identity provider configuration: {0}")]
    Config(String),
    #[error("identity provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityUser {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves a bearer token to the id of the user it was issued to.
    async fn verify_token(&self, token: &str) -> Result<String, IdentityError>;

    async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<IdentityUser, IdentityError>;
}

#[derive(Debug, Deserialize)]
struct UserMetadata {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
    email: Option<String>,
    user_metadata: Option<UserMetadata>,
}

impl From<UserResponse> for IdentityUser {
    fn from(value: UserResponse) -> Self {
        Self {
            id: value.id,
            email: value.email,
            name: value.user_metadata.and_then(|meta| meta.name),
        }
    }
}

/// The provider reports errors under different keys depending on the
/// endpoint.
#[derive(Debug, Default, Deserialize)]
struct ProviderError {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ProviderError {
    fn into_message(self, status: StatusCode) -> String {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
            .unwrap_or_else(|| format!("identity provider returned {status}"))
    }
}

#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    base_url: Url,
    anon_key: String,
    service_key: String,
    http: reqwest::Client,
}

impl HttpIdentityProvider {
    /// `anon_key` identifies the project on token checks; `service_key` is
    /// needed for the admin endpoint used at signup.
    pub fn new(base_url: &str, anon_key: &str, service_key: &str) -> Result<Self, IdentityError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|err| IdentityError::Config(format!("invalid url: {err}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            anon_key: anon_key.to_string(),
            service_key: service_key.to_string(),
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, IdentityError> {
        self.base_url
            .join(path)
            .map_err(|err| IdentityError::Config(format!("invalid url: {err}")))
    }

    async fn rejection(res: reqwest::Response) -> IdentityError {
        let status = res.status();
        let body = res.json::<ProviderError>().await.unwrap_or_default();
        IdentityError::Rejected(body.into_message(status))
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<String, IdentityError> {
        let res = self
            .http
            .get(self.endpoint("auth/v1/user")?)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        match res.status() {
            status if status.is_success() => Ok(res.json::<UserResponse>().await?.id),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(IdentityError::InvalidToken),
            _ => Err(Self::rejection(res).await),
        }
    }

    async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<IdentityUser, IdentityError> {
        let res = self
            .http
            .post(self.endpoint("auth/v1/admin/users")?)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&json!({
                "email": email,
                "password": password,
                "user_metadata": { "name": name },
                // No mail server is configured; accounts are usable at once.
                "email_confirm": true,
            }))
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(Self::rejection(res).await);
        }
        Ok(res.json::<UserResponse>().await?.into())
    }
}
