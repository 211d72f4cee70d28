use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::{recipe_service, user_service};
use crate::{
    api::response::PageResponse,
    database::models::{recipe_comments, users},
    errors::AppError,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub recipe_id: i64,
    pub content: String,
    pub nickname: String,
    /// true, если комментарий написал текущий пользователь
    pub is_own_comment: bool,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

impl CommentResponse {
    fn build(comment: recipe_comments::Model, author: Option<&users::Model>, viewer: Option<i64>) -> Self {
        Self {
            is_own_comment: viewer == Some(comment.user_id),
            nickname: author
                .map(|user| user.nickname.clone())
                .unwrap_or_else(|| "(알 수 없음)".to_string()),
            id: comment.id,
            recipe_id: comment.recipe_id,
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

/// Newest first. `page` is zero-based.
pub async fn comments(
    db: &DatabaseConnection,
    recipe_id: i64,
    page: u64,
    size: u64,
    viewer: Option<i64>,
) -> Result<PageResponse<CommentResponse>, AppError> {
    recipe_service::find_recipe(db, recipe_id).await?;

    let paginator = recipe_comments::Entity::find()
        .filter(recipe_comments::Column::RecipeId.eq(recipe_id))
        .order_by_desc(recipe_comments::Column::CreatedAt)
        .order_by_desc(recipe_comments::Column::Id)
        .find_also_related(users::Entity)
        .paginate(db, size);

    let total = paginator.num_items().await?;
    let content = paginator
        .fetch_page(page)
        .await?
        .into_iter()
        .map(|(comment, author)| CommentResponse::build(comment, author.as_ref(), viewer))
        .collect();

    Ok(PageResponse::new(content, page, size, total))
}

pub async fn count(db: &DatabaseConnection, recipe_id: i64) -> Result<u64, AppError> {
    Ok(recipe_comments::Entity::find()
        .filter(recipe_comments::Column::RecipeId.eq(recipe_id))
        .count(db)
        .await?)
}

pub async fn create(
    db: &DatabaseConnection,
    recipe_id: i64,
    email: &str,
    content: String,
) -> Result<CommentResponse, AppError> {
    let user = user_service::find_by_email(db, email).await?;
    recipe_service::find_recipe(db, recipe_id).await?;

    let now = Utc::now();
    let comment = recipe_comments::ActiveModel {
        recipe_id: Set(recipe_id),
        user_id: Set(user.id),
        content: Set(content),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(CommentResponse::build(comment, Some(&user), Some(user.id)))
}

async fn find_own_comment(
    db: &DatabaseConnection,
    recipe_id: i64,
    comment_id: i64,
    user: &users::Model,
) -> Result<recipe_comments::Model, AppError> {
    let comment = recipe_comments::Entity::find_by_id(comment_id)
        .filter(recipe_comments::Column::RecipeId.eq(recipe_id))
        .one(db)
        .await?
        .ok_or(AppError::NotFound("Comment"))?;

    if comment.user_id != user.id {
        return Err(AppError::Forbidden(
            "Only the author can change this comment".to_string(),
        ));
    }
    Ok(comment)
}

pub async fn update(
    db: &DatabaseConnection,
    recipe_id: i64,
    comment_id: i64,
    email: &str,
    content: String,
) -> Result<CommentResponse, AppError> {
    let user = user_service::find_by_email(db, email).await?;
    let comment = find_own_comment(db, recipe_id, comment_id, &user).await?;

    let mut active = comment.into_active_model();
    active.content = Set(content);
    active.updated_at = Set(Utc::now());
    let updated = active.update(db).await?;

    Ok(CommentResponse::build(updated, Some(&user), Some(user.id)))
}

pub async fn delete(
    db: &DatabaseConnection,
    recipe_id: i64,
    comment_id: i64,
    email: &str,
) -> Result<(), AppError> {
    let user = user_service::find_by_email(db, email).await?;
    let comment = find_own_comment(db, recipe_id, comment_id, &user).await?;
    comment.delete(db).await?;
    Ok(())
}
