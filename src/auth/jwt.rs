use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::principal::{Principal, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenCategory {
    Access,
    Refresh,
}

/// JWT claims issued for both access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User e-mail
    pub sub: String,
    pub id: i64,
    pub role: String,
    pub category: TokenCategory,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn principal(&self) -> Result<Principal, TokenError> {
        let role = self.role.parse::<Role>().map_err(|_| TokenError::Invalid)?;
        Ok(Principal {
            id: self.id,
            email: self.sub.clone(),
            role,
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token invalid")]
    Invalid,
    #[error("expected a {expected:?} token")]
    WrongCategory { expected: TokenCategory },
    #[error("token signing failed")]
    Signing,
}

#[derive(Clone)]
pub struct JwtUtil {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl JwtUtil {
    pub fn new(secret: &str, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl_secs
    }

    pub fn create_access_token(&self, principal: &Principal) -> Result<String, TokenError> {
        self.create_token(principal, TokenCategory::Access, self.access_ttl_secs)
    }

    pub fn create_refresh_token(&self, principal: &Principal) -> Result<String, TokenError> {
        self.create_token(principal, TokenCategory::Refresh, self.refresh_ttl_secs)
    }

    fn create_token(
        &self,
        principal: &Principal,
        category: TokenCategory,
        ttl_secs: i64,
    ) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: principal.email.clone(),
            id: principal.id,
            role: principal.role.as_str().to_string(),
            category,
            iat: now,
            exp: now + ttl_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Signing)
    }

    /// Проверяет подпись, срок действия и категорию токена
    pub fn verify(&self, token: &str, expected: TokenCategory) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        if data.claims.category != expected {
            return Err(TokenError::WrongCategory { expected });
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn util() -> JwtUtil {
        JwtUtil::new("test-secret-test-secret-test-secret", 60, 120)
    }

    fn principal() -> Principal {
        Principal {
            id: 7,
            email: "cook@nangpago.kr".to_string(),
            role: Role::User,
        }
    }

    #[test]
    fn access_token_carries_the_principal() {
        let jwt = util();
        let token = jwt.create_access_token(&principal()).unwrap();
        let claims = jwt.verify(&token, TokenCategory::Access).unwrap();
        assert_eq!(claims.principal().unwrap(), principal());
        assert_eq!(claims.exp - claims.iat, 60);
    }

    #[test]
    fn refresh_token_is_not_accepted_as_access() {
        let jwt = util();
        let token = jwt.create_refresh_token(&principal()).unwrap();
        assert_eq!(
            jwt.verify(&token, TokenCategory::Access).unwrap_err(),
            TokenError::WrongCategory {
                expected: TokenCategory::Access
            }
        );
        assert!(jwt.verify(&token, TokenCategory::Refresh).is_ok());
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let jwt = JwtUtil::new("test-secret-test-secret-test-secret", -10, 120);
        let token = jwt.create_access_token(&principal()).unwrap();
        assert_eq!(
            jwt.verify(&token, TokenCategory::Access).unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn token_signed_with_another_secret_is_invalid() {
        let other = JwtUtil::new("another-secret-another-secret-xx", 60, 120);
        let token = other.create_access_token(&principal()).unwrap();
        assert_eq!(
            util().verify(&token, TokenCategory::Access).unwrap_err(),
            TokenError::Invalid
        );
        assert_eq!(
            util().verify("not-a-jwt", TokenCategory::Access).unwrap_err(),
            TokenError::Invalid
        );
    }
}
