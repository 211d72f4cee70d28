use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub nickname: String,
    pub name: Option<String>,
    /// GOOGLE | KAKAO | NAVER
    pub provider: String,
    pub role: String,
    pub profile_image_url: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
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
