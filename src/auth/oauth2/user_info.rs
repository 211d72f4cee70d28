use serde_json::Value;

use super::OAuth2Provider;
use crate::errors::AppError;

/// Provider-neutral view of the user-info document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuth2UserInfo {
    pub provider: OAuth2Provider,
    pub email: String,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub profile_image_url: Option<String>,
}

impl OAuth2UserInfo {
    pub fn from_attributes(provider: OAuth2Provider, attributes: &Value) -> Result<Self, AppError> {
        let info = match provider {
            OAuth2Provider::Google => Self {
                provider,
                email: required_str(attributes, "/email")?,
                name: optional_str(attributes, "/name"),
                nickname: optional_str(attributes, "/given_name"),
                profile_image_url: optional_str(attributes, "/picture"),
            },
            OAuth2Provider::Kakao => Self {
                provider,
                email: required_str(attributes, "/kakao_account/email")?,
                name: optional_str(attributes, "/kakao_account/name"),
                nickname: optional_str(attributes, "/kakao_account/profile/nickname")
                    .or_else(|| optional_str(attributes, "/properties/nickname")),
                profile_image_url: optional_str(
                    attributes,
                    "/kakao_account/profile/profile_image_url",
                ),
            },
            // Naver оборачивает всё в `response`
            OAuth2Provider::Naver => Self {
                provider,
                email: required_str(attributes, "/response/email")?,
                name: optional_str(attributes, "/response/name"),
                nickname: optional_str(attributes, "/response/nickname"),
                profile_image_url: optional_str(attributes, "/response/profile_image"),
            },
        };
        Ok(info)
    }

    /// Preferred display name: nickname, then name, then the e-mail local part.
    pub fn display_name(&self) -> String {
        self.nickname
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| {
                self.email
                    .split('@')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            })
    }
}

fn optional_str(attributes: &Value, pointer: &str) -> Option<String> {
    attributes
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn required_str(attributes: &Value, pointer: &str) -> Result<String, AppError> {
    optional_str(attributes, pointer)
        .ok_or_else(|| AppError::OAuth2(format!("user info has no `{}`", pointer)))
}
