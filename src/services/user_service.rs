use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter, Set,
};
use uuid::Uuid;

use crate::{
    api::validation::validate_email,
    auth::{Principal, Role, oauth2::OAuth2UserInfo},
    database::models::users,
    errors::AppError,
};

const NICKNAME_ATTEMPTS: usize = 5;

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<users::Model, AppError> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await?
        .ok_or(AppError::NotFound("User"))
}

pub fn principal_of(user: &users::Model) -> Principal {
    Principal {
        id: user.id,
        email: user.email.clone(),
        role: user.role.parse().unwrap_or(Role::User),
    }
}

/// Создаёт пользователя при первом входе или обновляет профиль при повторном.
/// E-mail, уже привязанный к другому провайдеру, отклоняется.
pub async fn register_or_update<C: ConnectionTrait>(
    db: &C,
    info: &OAuth2UserInfo,
) -> Result<users::Model, AppError> {
    if !validate_email(&info.email) {
        return Err(AppError::OAuth2(format!("`{}` is not a valid e-mail", info.email)));
    }

    let existing = users::Entity::find()
        .filter(users::Column::Email.eq(info.email.as_str()))
        .one(db)
        .await?;

    if let Some(user) = existing {
        if user.provider != info.provider.as_str() {
            log::warn!(
                "{} tried to log in with {} but is registered with {}",
                info.email,
                info.provider,
                user.provider
            );
            return Err(AppError::Conflict(format!(
                "{} is already registered with {}",
                info.email, user.provider
            )));
        }

        let mut active = user.into_active_model();
        if let Some(image) = &info.profile_image_url {
            active.profile_image_url = Set(Some(image.clone()));
        }
        active.updated_at = Set(Utc::now());
        return Ok(active.update(db).await?);
    }

    let nickname = available_nickname(db, &info.display_name()).await?;
    let now = Utc::now();
    let user = users::ActiveModel {
        email: Set(info.email.clone()),
        nickname: Set(nickname),
        name: Set(info.name.clone()),
        provider: Set(info.provider.as_str().to_string()),
        role: Set(Role::User.as_str().to_string()),
        profile_image_url: Set(info.profile_image_url.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!("registered new {} user {}", info.provider, user.email);
    Ok(user)
}

async fn available_nickname<C: ConnectionTrait>(db: &C, base: &str) -> Result<String, AppError> {
    let mut candidate = base.to_string();
    for _ in 0..NICKNAME_ATTEMPTS {
        let taken = users::Entity::find()
            .filter(users::Column::Nickname.eq(candidate.as_str()))
            .one(db)
            .await?
            .is_some();
        if !taken {
            return Ok(candidate);
        }
        let suffix = Uuid::new_v4().simple().to_string();
        candidate = format!("{}{}", base, &suffix[..4]);
    }
    Err(AppError::Conflict(format!("no free nickname for `{}`", base)))
}
