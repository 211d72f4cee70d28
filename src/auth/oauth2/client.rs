use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::{ClientRegistration, OAuth2UserInfo};
use crate::errors::AppError;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// HTTP side of the login: code exchange and user-info fetch.
#[derive(Clone)]
pub struct OAuth2Client {
    client: Client,
}

impl Default for OAuth2Client {
    fn default() -> Self {
        Self::new()
    }
}

impl OAuth2Client {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub async fn load_user(
        &self,
        registration: &ClientRegistration,
        code: &str,
    ) -> Result<OAuth2UserInfo, AppError> {
        let access_token = self.exchange_code(registration, code).await?;
        let attributes = self.fetch_user_info(registration, &access_token).await?;
        OAuth2UserInfo::from_attributes(registration.provider, &attributes)
    }

    async fn exchange_code(
        &self,
        registration: &ClientRegistration,
        code: &str,
    ) -> Result<String, AppError> {
        let response = self
            .client
            .post(&registration.token_uri)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", registration.redirect_uri.as_str()),
                ("client_id", registration.client_id.as_str()),
                ("client_secret", registration.client_secret.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            log::warn!(
                "{} token endpoint returned {}: {}",
                registration.provider,
                status,
                error_text
            );
            return Err(AppError::OAuth2(format!(
                "token exchange failed with status {}",
                status
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::OAuth2(format!("unexpected token response: {}", e)))?;
        Ok(token.access_token)
    }

    async fn fetch_user_info(
        &self,
        registration: &ClientRegistration,
        access_token: &str,
    ) -> Result<Value, AppError> {
        let response = self
            .client
            .get(&registration.user_info_uri)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            log::warn!(
                "{} user-info endpoint returned {}",
                registration.provider,
                status
            );
            return Err(AppError::OAuth2(format!(
                "user info request failed with status {}",
                status
            )));
        }

        Ok(response.json::<Value>().await?)
    }
}
