//! OAuth2 authorization-code login against Google, Kakao and Naver.
//!
//! Flow: `/api/oauth2/authorization/{provider}` redirects to the provider with a
//! random `state` (also stored in a short-lived cookie); the provider calls back
//! `/api/login/oauth2/code/{provider}`, where the code is exchanged for a token
//! and the user-info document is mapped to [`OAuth2UserInfo`].

pub mod client;
pub mod user_info;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use url::Url;
use utoipa::ToSchema;

use crate::config::Config;
use crate::errors::AppError;

pub use client::OAuth2Client;
pub use user_info::OAuth2UserInfo;

pub const AUTHORIZATION_BASE_PATH: &str = "/api/oauth2/authorization";
pub const LOGIN_PROCESSING_BASE_PATH: &str = "/api/login/oauth2/code";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum OAuth2Provider {
    Google,
    Kakao,
    Naver,
}

impl OAuth2Provider {
    /// Registration id used in URLs (`/api/oauth2/authorization/google`)
    pub fn registration_id(&self) -> &'static str {
        match self {
            OAuth2Provider::Google => "google",
            OAuth2Provider::Kakao => "kakao",
            OAuth2Provider::Naver => "naver",
        }
    }

    /// Value persisted in `users.provider`
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuth2Provider::Google => "GOOGLE",
            OAuth2Provider::Kakao => "KAKAO",
            OAuth2Provider::Naver => "NAVER",
        }
    }
}

impl fmt::Display for OAuth2Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuth2Provider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(OAuth2Provider::Google),
            "kakao" => Ok(OAuth2Provider::Kakao),
            "naver" => Ok(OAuth2Provider::Naver),
            _ => Err(AppError::NotFound("OAuth2 provider")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientRegistration {
    pub provider: OAuth2Provider,
    pub client_id: String,
    pub client_secret: String,
    pub authorization_uri: String,
    pub token_uri: String,
    pub user_info_uri: String,
    pub scopes: Vec<String>,
    pub redirect_uri: String,
}

impl ClientRegistration {
    /// Registration with the provider's well-known endpoints.
    pub fn well_known(
        provider: OAuth2Provider,
        client_id: String,
        client_secret: String,
        public_url: &str,
    ) -> Self {
        let (authorization_uri, token_uri, user_info_uri, scopes): (&str, &str, &str, &[&str]) =
            match provider {
                OAuth2Provider::Google => (
                    "https://accounts.google.com/o/oauth2/v2/auth",
                    "https://oauth2.googleapis.com/token",
                    "https://www.googleapis.com/oauth2/v3/userinfo",
                    &["openid", "email", "profile"],
                ),
                OAuth2Provider::Kakao => (
                    "https://kauth.kakao.com/oauth/authorize",
                    "https://kauth.kakao.com/oauth/token",
                    "https://kapi.kakao.com/v2/user/me",
                    &["profile_nickname", "profile_image", "account_email"],
                ),
                OAuth2Provider::Naver => (
                    "https://nid.naver.com/oauth2.0/authorize",
                    "https://nid.naver.com/oauth2.0/token",
                    "https://openapi.naver.com/v1/nid/me",
                    &["name", "email", "profile_image"],
                ),
            };

        Self {
            provider,
            client_id,
            client_secret,
            authorization_uri: authorization_uri.to_string(),
            token_uri: token_uri.to_string(),
            user_info_uri: user_info_uri.to_string(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            redirect_uri: format!(
                "{}{}/{}",
                public_url.trim_end_matches('/'),
                LOGIN_PROCESSING_BASE_PATH,
                provider.registration_id()
            ),
        }
    }
}

/// Configured providers, keyed by provider.
#[derive(Debug, Clone, Default)]
pub struct ClientRegistrations {
    registrations: HashMap<OAuth2Provider, ClientRegistration>,
}

impl ClientRegistrations {
    pub fn from_config(config: &Config) -> Self {
        let public_url = config.effective_public_url();
        let mut registrations = Self::default();

        for (provider, id, secret) in [
            (
                OAuth2Provider::Google,
                &config.google_client_id,
                &config.google_client_secret,
            ),
            (
                OAuth2Provider::Kakao,
                &config.kakao_client_id,
                &config.kakao_client_secret,
            ),
            (
                OAuth2Provider::Naver,
                &config.naver_client_id,
                &config.naver_client_secret,
            ),
        ] {
            if let (Some(id), Some(secret)) = (id, secret) {
                registrations.insert(ClientRegistration::well_known(
                    provider,
                    id.clone(),
                    secret.clone(),
                    &public_url,
                ));
            } else {
                log::info!("OAuth2 provider {} is not configured", provider);
            }
        }

        registrations
    }

    pub fn insert(&mut self, registration: ClientRegistration) {
        self.registrations.insert(registration.provider, registration);
    }

    pub fn get(&self, provider: OAuth2Provider) -> Result<&ClientRegistration, AppError> {
        self.registrations
            .get(&provider)
            .ok_or(AppError::NotFound("OAuth2 provider"))
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

/// Builds the provider authorization URL. Adds the per-provider extras the
/// frontend relies on (account chooser for Google and Kakao).
pub fn resolve_authorization_url(
    registration: &ClientRegistration,
    state: &str,
) -> Result<Url, AppError> {
    let mut url = Url::parse(&registration.authorization_uri)
        .map_err(|e| AppError::OAuth2(format!("bad authorization uri: {}", e)))?;

    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("response_type", "code")
            .append_pair("client_id", &registration.client_id)
            .append_pair("redirect_uri", &registration.redirect_uri)
            .append_pair("state", state);
        if !registration.scopes.is_empty() {
            query.append_pair("scope", &registration.scopes.join(" "));
        }
        match registration.provider {
            OAuth2Provider::Google | OAuth2Provider::Kakao => {
                query.append_pair("prompt", "select_account");
            }
            OAuth2Provider::Naver => {}
        }
    }

    Ok(url)
}
