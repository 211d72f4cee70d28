use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, Set, TransactionTrait, sea_query::Expr,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::{recipe_service, user_service};
use crate::{
    database::{
        models::{recipe_likes, recipes},
        unique::insert_once,
    },
    errors::AppError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeLikeResponse {
    pub recipe_id: i64,
    pub liked: bool,
    pub like_count: i32,
}

async fn find_like<C: ConnectionTrait>(
    db: &C,
    recipe_id: i64,
    user_id: i64,
) -> Result<Option<recipe_likes::Model>, AppError> {
    Ok(recipe_likes::Entity::find()
        .filter(recipe_likes::Column::RecipeId.eq(recipe_id))
        .filter(recipe_likes::Column::UserId.eq(user_id))
        .one(db)
        .await?)
}

pub async fn is_liked(db: &DatabaseConnection, recipe_id: i64, email: &str) -> Result<bool, AppError> {
    let user = user_service::find_by_email(db, email).await?;
    recipe_service::find_recipe(db, recipe_id).await?;
    Ok(find_like(db, recipe_id, user.id).await?.is_some())
}

pub async fn like_count(db: &DatabaseConnection, recipe_id: i64) -> Result<i32, AppError> {
    Ok(recipe_service::find_recipe(db, recipe_id).await?.like_count)
}

/// Inserts the like row; `false` when it is already there.
pub async fn insert_like(
    txn: &DatabaseTransaction,
    recipe_id: i64,
    user_id: i64,
) -> Result<bool, AppError> {
    insert_once(
        txn,
        recipe_likes::ActiveModel {
            recipe_id: Set(recipe_id),
            user_id: Set(user_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        },
    )
    .await
}

async fn shift_like_count(txn: &DatabaseTransaction, recipe_id: i64, delta: i32) -> Result<(), AppError> {
    let mut update = recipes::Entity::update_many()
        .col_expr(
            recipes::Column::LikeCount,
            Expr::col(recipes::Column::LikeCount).add(delta),
        )
        .filter(recipes::Column::Id.eq(recipe_id));
    if delta < 0 {
        update = update.filter(recipes::Column::LikeCount.gt(0));
    }
    update.exec(txn).await?;
    Ok(())
}

/// Liked → unlike and decrement; otherwise like and increment.
/// Row and counter change in one transaction. The counter moves only when
/// this request actually added or removed the row, so a double click ends in
/// a consistent state instead of an error.
pub async fn toggle_like(
    db: &DatabaseConnection,
    recipe_id: i64,
    email: &str,
) -> Result<RecipeLikeResponse, AppError> {
    let txn = db.begin().await?;

    let user = user_service::find_by_email(&txn, email).await?;
    recipe_service::find_recipe(&txn, recipe_id).await?;

    let liked = match find_like(&txn, recipe_id, user.id).await? {
        Some(like) => {
            let removed = recipe_likes::Entity::delete_by_id(like.id)
                .exec(&txn)
                .await?
                .rows_affected;
            if removed > 0 {
                shift_like_count(&txn, recipe_id, -1).await?;
            }
            false
        }
        None => {
            if insert_like(&txn, recipe_id, user.id).await? {
                shift_like_count(&txn, recipe_id, 1).await?;
            }
            true
        }
    };

    let like_count = recipe_service::find_recipe(&txn, recipe_id).await?.like_count;
    txn.commit().await?;

    log::debug!(
        "user {} {} recipe {}",
        user.id,
        if liked { "liked" } else { "unliked" },
        recipe_id
    );

    Ok(RecipeLikeResponse {
        recipe_id,
        liked,
        like_count,
    })
}
