use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub cooking_method: Option<String>,
    /// Ингредиенты через запятую, как они приходят из исходного датасета
    #[sea_orm(column_type = "Text")]
    pub ingredients: String,
    /// JSON-массив шагов приготовления
    pub manuals: Json,
    pub main_image: Option<String>,
    pub calorie: Option<i32>,
    pub like_count: i32,
    pub created_at: DateTimeUtc,
}

impl Model {
    pub fn ingredient_list(&self) -> Vec<String> {
        self.ingredients
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn manual_steps(&self) -> Vec<String> {
        serde_json::from_value(self.manuals.clone()).unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipe_likes::Entity")]
    RecipeLikes,
    #[sea_orm(has_many = "super::recipe_favorites::Entity")]
    RecipeFavorites,
    #[sea_orm(has_many = "super::recipe_comments::Entity")]
    RecipeComments,
}

impl Related<super::recipe_likes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeLikes.def()
    }
}

impl Related<super::recipe_favorites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeFavorites.def()
    }
}

impl Related<super::recipe_comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeComments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
