use log::{info, warn};
use reqwest::{Client, StatusCode, Url};
use rocket::serde::json::serde_json;
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

use crate::error::{Error, Result};
use crate::model::identity::Identity;

use super::IdentityProvider;

/// Settings for an OAuth 2.0 authorization-code provider, derived from `Rocket.toml` and
/// `ROCKET_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthConfig {
    // non-secrets
    pub client_id: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    /// Our callback, exactly as registered with the provider.
    pub redirect_url: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    // secrets
    pub client_secret: String,
}

fn default_scopes() -> Vec<String> {
    ["openid", "email", "profile"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// A configured endpoint that isn't a valid URL.
#[derive(Debug, Error)]
#[error("Invalid `{field}`: {reason}")]
pub struct InvalidUrl {
    field: &'static str,
    reason: String,
}

fn parse_url(field: &'static str, value: &str) -> std::result::Result<Url, InvalidUrl> {
    Url::parse(value).map_err(|e| InvalidUrl {
        field,
        reason: e.to_string(),
    })
}

/// Signs users in against a real provider over HTTPS.
pub struct OAuthProvider {
    config: OAuthConfig,
    auth_url: Url,
    token_url: Url,
    userinfo_url: Url,
    http: Client,
}

impl OAuthProvider {
    pub fn new(config: OAuthConfig) -> std::result::Result<Self, InvalidUrl> {
        let auth_url = parse_url("auth_url", &config.auth_url)?;
        let token_url = parse_url("token_url", &config.token_url)?;
        let userinfo_url = parse_url("userinfo_url", &config.userinfo_url)?;
        parse_url("redirect_url", &config.redirect_url)?;
        Ok(Self {
            config,
            auth_url,
            token_url,
            userinfo_url,
            http: Client::new(),
        })
    }
}

#[rocket::async_trait]
impl IdentityProvider for OAuthProvider {
    fn authorize_url(&self, state: &str) -> String {
        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_url)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.config.scopes.join(" "))
            .append_pair("state", state);
        url.into()
    }

    async fn exchange(&self, code: &str) -> Result<Identity> {
        // Trade the code for an access token.
        let response = self
            .http
            .post(self.token_url.clone())
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
            ])
            .send()
            .await?;
        accepted("token exchange", response.status())?;
        let token: TokenResponse = decode("token exchange", &response.bytes().await?)?;

        // Ask who the token belongs to.
        let response = self
            .http
            .get(self.userinfo_url.clone())
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        accepted("userinfo", response.status())?;
        let user_info: UserInfo = decode("userinfo", &response.bytes().await?)?;

        let identity = user_info.into_identity()?;
        info!("Identity provider verified {}", identity.email);
        Ok(identity)
    }
}

/// A provider that answers, but not with success, has refused the sign-in.
fn accepted(step: &str, status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        warn!("Identity provider {step} returned {status}");
        Err(Error::IdentityProvider(format!("{step} returned {status}")))
    }
}

/// Parse a provider reply. A reply we can't understand is a refusal, not a transport failure.
fn decode<T: DeserializeOwned>(step: &str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        warn!("Unreadable {step} reply: {e}");
        Error::IdentityProvider(format!("unreadable {step} reply"))
    })
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Profile returned by the userinfo endpoint. OpenID Connect providers say `sub`; older
/// OAuth-only endpoints say `id`.
#[derive(Debug, Deserialize)]
struct UserInfo {
    #[serde(alias = "id")]
    sub: String,
    email: Option<String>,
    email_verified: Option<bool>,
    name: Option<String>,
    picture: Option<String>,
}

impl UserInfo {
    fn into_identity(self) -> Result<Identity> {
        let email = self
            .email
            .filter(|email| !email.trim().is_empty())
            .ok_or_else(|| Error::IdentityProvider("no email address was shared".to_string()))?;
        if self.email_verified == Some(false) {
            return Err(Error::IdentityProvider(format!(
                "email address {email} is not verified"
            )));
        }
        let name = self.name.unwrap_or_else(|| email.clone());
        Ok(Identity::new(
            self.sub,
            &email,
            name,
            self.picture.unwrap_or_default(),
        ))
    }
}
