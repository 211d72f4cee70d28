use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::{recipe_service, user_service};
use crate::{
    database::{models::recipe_favorites, unique::insert_once},
    errors::AppError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeFavoriteResponse {
    pub recipe_id: i64,
    pub favorite: bool,
}

async fn find_favorite<C: ConnectionTrait>(
    db: &C,
    recipe_id: i64,
    user_id: i64,
) -> Result<Option<recipe_favorites::Model>, AppError> {
    Ok(recipe_favorites::Entity::find()
        .filter(recipe_favorites::Column::RecipeId.eq(recipe_id))
        .filter(recipe_favorites::Column::UserId.eq(user_id))
        .one(db)
        .await?)
}

pub async fn is_favorite(
    db: &DatabaseConnection,
    recipe_id: i64,
    email: &str,
) -> Result<bool, AppError> {
    let user = user_service::find_by_email(db, email).await?;
    recipe_service::find_recipe(db, recipe_id).await?;
    Ok(find_favorite(db, recipe_id, user.id).await?.is_some())
}

/// Inserts the favorite row; `false` when it is already there.
pub async fn insert_favorite(
    txn: &DatabaseTransaction,
    recipe_id: i64,
    user_id: i64,
) -> Result<bool, AppError> {
    insert_once(
        txn,
        recipe_favorites::ActiveModel {
            recipe_id: Set(recipe_id),
            user_id: Set(user_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        },
    )
    .await
}

pub async fn toggle_favorite(
    db: &DatabaseConnection,
    recipe_id: i64,
    email: &str,
) -> Result<RecipeFavoriteResponse, AppError> {
    let txn = db.begin().await?;

    let user = user_service::find_by_email(&txn, email).await?;
    recipe_service::find_recipe(&txn, recipe_id).await?;

    let favorite = match find_favorite(&txn, recipe_id, user.id).await? {
        Some(existing) => {
            recipe_favorites::Entity::delete_by_id(existing.id)
                .exec(&txn)
                .await?;
            false
        }
        None => {
            insert_favorite(&txn, recipe_id, user.id).await?;
            true
        }
    };

    txn.commit().await?;
    Ok(RecipeFavoriteResponse {
        recipe_id,
        favorite,
    })
}
