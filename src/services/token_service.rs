use actix_web::cookie::Cookie;
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter, Set,
};

use super::user_service;
use crate::{
    auth::{
        JwtUtil, Principal, TokenCategory,
        cookies::{ACCESS_COOKIE, REFRESH_COOKIE, auth_cookie},
    },
    config::Config,
    database::models::refresh_tokens,
    errors::AppError,
};

#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access: String,
    pub refresh: String,
}

impl IssuedTokens {
    pub fn cookies(&self, jwt: &JwtUtil, config: &Config) -> [Cookie<'static>; 2] {
        let secure = config.effective_cookie_secure();
        [
            auth_cookie(ACCESS_COOKIE, self.access.clone(), jwt.access_ttl_secs(), secure),
            auth_cookie(REFRESH_COOKIE, self.refresh.clone(), jwt.refresh_ttl_secs(), secure),
        ]
    }
}

/// Issues an access/refresh pair and stores the refresh token (one per user).
pub async fn issue<C: ConnectionTrait>(
    db: &C,
    jwt: &JwtUtil,
    principal: &Principal,
) -> Result<IssuedTokens, AppError> {
    let access = jwt
        .create_access_token(principal)
        .map_err(|_| AppError::Internal)?;
    let refresh = jwt
        .create_refresh_token(principal)
        .map_err(|_| AppError::Internal)?;

    let expires_at = Utc::now() + Duration::seconds(jwt.refresh_ttl_secs());
    let stored = refresh_tokens::Entity::find()
        .filter(refresh_tokens::Column::Email.eq(principal.email.as_str()))
        .one(db)
        .await?;

    match stored {
        Some(existing) => {
            let mut active = existing.into_active_model();
            active.token = Set(refresh.clone());
            active.expires_at = Set(expires_at);
            active.update(db).await?;
        }
        None => {
            refresh_tokens::ActiveModel {
                email: Set(principal.email.clone()),
                token: Set(refresh.clone()),
                expires_at: Set(expires_at),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }

    Ok(IssuedTokens { access, refresh })
}

/// Exchanges a refresh token for a fresh pair. The presented token must be the
/// one currently stored for the user, so a rotated-out token is rejected.
pub async fn reissue<C: ConnectionTrait>(
    db: &C,
    jwt: &JwtUtil,
    refresh_token: &str,
) -> Result<(IssuedTokens, Principal), AppError> {
    let claims = jwt
        .verify(refresh_token, TokenCategory::Refresh)
        .map_err(|e| AppError::Unauthorized(format!("refresh {}", e)))?;

    let stored = refresh_tokens::Entity::find()
        .filter(refresh_tokens::Column::Email.eq(claims.sub.as_str()))
        .one(db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("refresh token revoked".to_string()))?;

    if stored.token != refresh_token || stored.expires_at < Utc::now() {
        return Err(AppError::Unauthorized("refresh token revoked".to_string()));
    }

    // роль могла измениться с момента выдачи токена
    let user = user_service::find_by_email(db, &claims.sub).await?;
    let principal = user_service::principal_of(&user);
    let tokens = issue(db, jwt, &principal).await?;
    Ok((tokens, principal))
}

pub async fn revoke<C: ConnectionTrait>(db: &C, email: &str) -> Result<(), AppError> {
    refresh_tokens::Entity::delete_many()
        .filter(refresh_tokens::Column::Email.eq(email))
        .exec(db)
        .await?;
    Ok(())
}
