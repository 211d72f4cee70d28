use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BulkIndexOutcome, RecipeDocument, RecipeSearchIndex, SearchQuery, SearchType};
use crate::{api::response::PageResponse, errors::AppError};

/// Process-local index with substring matching. Used when `ELASTICSEARCH_URL`
/// is not configured and in tests.
#[derive(Clone, Default)]
pub struct InMemoryRecipeIndex {
    documents: Arc<RwLock<BTreeMap<i64, RecipeDocument>>>,
}

impl InMemoryRecipeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

fn matches(document: &RecipeDocument, keyword: &str, search_type: SearchType) -> bool {
    let keyword = keyword.to_lowercase();
    match search_type {
        // каждый термин должен встретиться хотя бы в одном ингредиенте
        SearchType::Ingredients => keyword.split_whitespace().all(|term| {
            document
                .ingredients
                .iter()
                .any(|ingredient| ingredient.to_lowercase().contains(term))
        }),
        SearchType::Name => document.name.to_lowercase().contains(&keyword),
    }
}

#[async_trait]
impl RecipeSearchIndex for InMemoryRecipeIndex {
    async fn search(&self, query: &SearchQuery) -> Result<PageResponse<RecipeDocument>, AppError> {
        let documents = self.documents.read().await;
        let mut hits: Vec<&RecipeDocument> = documents
            .values()
            .filter(|document| match query.keyword() {
                Some(keyword) => matches(document, keyword, query.search_type),
                None => true,
            })
            .collect();
        hits.sort_by(|a, b| b.like_count.cmp(&a.like_count).then(a.id.cmp(&b.id)));

        let total = hits.len() as u64;
        let content = hits
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.size as usize)
            .cloned()
            .collect();
        Ok(PageResponse::new(content, query.page, query.size, total))
    }

    async fn bulk_index(&self, documents: &[RecipeDocument]) -> Result<BulkIndexOutcome, AppError> {
        let mut index = self.documents.write().await;
        for document in documents {
            index.insert(document.id, document.clone());
        }
        Ok(BulkIndexOutcome {
            indexed: documents.len(),
            failed_ids: Vec::new(),
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}
