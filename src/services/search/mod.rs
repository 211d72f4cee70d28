//! Recipe search store.
//!
//! Production talks to Elasticsearch over its REST API ([`ElasticsearchIndex`]);
//! [`InMemoryRecipeIndex`] stands in when no cluster is configured.

pub mod elastic;
pub mod memory;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{api::response::PageResponse, database::models::recipes, errors::AppError};

pub use elastic::ElasticsearchIndex;
pub use memory::InMemoryRecipeIndex;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum SearchType {
    #[default]
    Ingredients,
    Name,
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchType::Ingredients => f.write_str("INGREDIENTS"),
            SearchType::Name => f.write_str("NAME"),
        }
    }
}

impl FromStr for SearchType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INGREDIENTS" => Ok(SearchType::Ingredients),
            "NAME" => Ok(SearchType::Name),
            other => Err(AppError::InvalidInput(format!(
                "searchType must be INGREDIENTS or NAME, got `{}`",
                other
            ))),
        }
    }
}

/// Document stored in the `recipes` index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDocument {
    pub id: i64,
    pub name: String,
    pub ingredients: Vec<String>,
    pub category: Option<String>,
    pub cooking_method: Option<String>,
    pub main_image: Option<String>,
    pub like_count: i32,
}

impl From<&recipes::Model> for RecipeDocument {
    fn from(recipe: &recipes::Model) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            ingredients: recipe.ingredient_list(),
            category: recipe.category.clone(),
            cooking_method: recipe.cooking_method.clone(),
            main_image: recipe.main_image.clone(),
            like_count: recipe.like_count,
        }
    }
}

/// Zero-based search request handed to the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub page: u64,
    pub size: u64,
    pub keyword: Option<String>,
    pub search_type: SearchType,
}

impl SearchQuery {
    /// Keyword with surrounding whitespace removed; blank keywords mean "everything".
    pub fn keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkIndexOutcome {
    pub indexed: usize,
    pub failed_ids: Vec<i64>,
}

#[async_trait]
pub trait RecipeSearchIndex: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<PageResponse<RecipeDocument>, AppError>;

    /// Upserts documents by recipe id.
    async fn bulk_index(&self, documents: &[RecipeDocument]) -> Result<BulkIndexOutcome, AppError>;

    async fn ping(&self) -> Result<(), AppError>;

    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_type_parses_case_insensitively() {
        assert_eq!("name".parse::<SearchType>().unwrap(), SearchType::Name);
        assert_eq!(
            " Ingredients ".parse::<SearchType>().unwrap(),
            SearchType::Ingredients
        );
        assert!("TITLE".parse::<SearchType>().is_err());
        assert_eq!(SearchType::default(), SearchType::Ingredients);
    }

    #[test]
    fn blank_keyword_means_no_filter() {
        let query = SearchQuery {
            page: 2,
            size: 10,
            keyword: Some("   ".to_string()),
            search_type: SearchType::Name,
        };
        assert_eq!(query.keyword(), None);
        assert_eq!(query.offset(), 20);
    }
}
