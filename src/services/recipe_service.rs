use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    database::models::{recipe_comments, recipes},
    errors::AppError,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub cooking_method: Option<String>,
    pub ingredients: Vec<String>,
    pub manuals: Vec<String>,
    pub main_image: Option<String>,
    pub calorie: Option<i32>,
    pub like_count: i32,
    pub comment_count: u64,
}

pub async fn find_recipe<C: ConnectionTrait>(db: &C, id: i64) -> Result<recipes::Model, AppError> {
    recipes::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound("Recipe"))
}

pub async fn recipe_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<RecipeResponse, AppError> {
    let recipe = find_recipe(db, id).await?;
    let comment_count = recipe_comments::Entity::find()
        .filter(recipe_comments::Column::RecipeId.eq(id))
        .count(db)
        .await?;

    Ok(RecipeResponse {
        id: recipe.id,
        ingredients: recipe.ingredient_list(),
        manuals: recipe.manual_steps(),
        name: recipe.name,
        category: recipe.category,
        cooking_method: recipe.cooking_method,
        main_image: recipe.main_image,
        calorie: recipe.calorie,
        like_count: recipe.like_count,
        comment_count,
    })
}
