use async_trait::async_trait;
use reqwest::{Client, Method, header};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};

use super::{BulkIndexOutcome, RecipeDocument, RecipeSearchIndex, SearchQuery, SearchType};
use crate::{api::response::PageResponse, errors::AppError};

#[derive(Clone)]
pub struct ElasticsearchIndex {
    client: Client,
    base_url: String,
    index: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    total: TotalHits,
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct TotalHits {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: RecipeDocument,
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    errors: bool,
    items: Vec<BulkItem>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    index: BulkItemResult,
}

#[derive(Debug, Deserialize)]
struct BulkItemResult {
    #[serde(rename = "_id")]
    id: String,
    status: u16,
    error: Option<Value>,
}

// Generic request helpers
impl ElasticsearchIndex {
    pub fn new(base_url: &str, index: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            index: index.to_string(),
        }
    }

    async fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<R, AppError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request_builder = self.client.request(method, &url);

        match body {
            Some(RequestBody::Json(value)) => request_builder = request_builder.json(&value),
            Some(RequestBody::NdJson(lines)) => {
                request_builder = request_builder
                    .header(header::CONTENT_TYPE, "application/x-ndjson")
                    .body(lines)
            }
            None => {}
        }

        let response = request_builder
            .send()
            .await
            .map_err(|e| AppError::Search(format!("request to {} failed: {}", path, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error reading response body".to_string());
            log::error!("Elasticsearch error on path {}: {} - {}", path, status, error_text);
            return Err(AppError::Search(format!(
                "request to {} failed with status {}",
                path, status
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| AppError::Search(format!("unexpected response from {}: {}", path, e)))
    }
}

enum RequestBody {
    Json(Value),
    NdJson(String),
}

fn search_body(query: &SearchQuery) -> Value {
    let filter = match (query.keyword(), query.search_type) {
        (None, _) => json!({ "match_all": {} }),
        (Some(keyword), SearchType::Ingredients) => json!({
            "match": { "ingredients": { "query": keyword, "operator": "and" } }
        }),
        (Some(keyword), SearchType::Name) => json!({
            "match": { "name": { "query": keyword } }
        }),
    };

    json!({
        "from": query.offset(),
        "size": query.size,
        "track_total_hits": true,
        "query": filter,
        "sort": ["_score", { "likeCount": "desc" }, { "id": "asc" }],
    })
}

fn bulk_body(index: &str, documents: &[RecipeDocument]) -> Result<String, AppError> {
    let mut lines = String::new();
    for document in documents {
        let action = json!({ "index": { "_index": index, "_id": document.id.to_string() } });
        lines.push_str(&serde_json::to_string(&action)?);
        lines.push('\n');
        lines.push_str(&serde_json::to_string(document)?);
        lines.push('\n');
    }
    Ok(lines)
}

#[async_trait]
impl RecipeSearchIndex for ElasticsearchIndex {
    async fn search(&self, query: &SearchQuery) -> Result<PageResponse<RecipeDocument>, AppError> {
        let path = format!("/{}/_search", self.index);
        let response: SearchResponse = self
            .request(Method::POST, &path, Some(RequestBody::Json(search_body(query))))
            .await?;

        let content = response.hits.hits.into_iter().map(|hit| hit.source).collect();
        Ok(PageResponse::new(
            content,
            query.page,
            query.size,
            response.hits.total.value,
        ))
    }

    async fn bulk_index(&self, documents: &[RecipeDocument]) -> Result<BulkIndexOutcome, AppError> {
        if documents.is_empty() {
            return Ok(BulkIndexOutcome::default());
        }

        let body = bulk_body(&self.index, documents)?;
        let response: BulkResponse = self
            .request(Method::POST, "/_bulk", Some(RequestBody::NdJson(body)))
            .await?;

        let mut outcome = BulkIndexOutcome::default();
        for item in response.items {
            let result = item.index;
            if result.error.is_none() && (200..300).contains(&result.status) {
                outcome.indexed += 1;
            } else {
                log::warn!(
                    "document {} was not indexed: status={} error={:?}",
                    result.id,
                    result.status,
                    result.error
                );
                if let Ok(id) = result.id.parse() {
                    outcome.failed_ids.push(id);
                }
            }
        }

        if response.errors && outcome.failed_ids.is_empty() {
            log::warn!("bulk response flagged errors without failed items");
        }
        Ok(outcome)
    }

    async fn ping(&self) -> Result<(), AppError> {
        let _: Value = self.request(Method::GET, "/", None).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "elasticsearch"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingredient_search_requires_every_term() {
        let body = search_body(&SearchQuery {
            page: 1,
            size: 20,
            keyword: Some("egg rice".to_string()),
            search_type: SearchType::Ingredients,
        });
        assert_eq!(body["from"], 20);
        assert_eq!(body["size"], 20);
        assert_eq!(body["query"]["match"]["ingredients"]["query"], "egg rice");
        assert_eq!(body["query"]["match"]["ingredients"]["operator"], "and");
    }

    #[test]
    fn missing_keyword_matches_everything() {
        let body = search_body(&SearchQuery {
            page: 0,
            size: 10,
            keyword: None,
            search_type: SearchType::Name,
        });
        assert!(body["query"]["match_all"].is_object());
    }

    #[test]
    fn bulk_body_is_action_then_source_per_document() {
        let document = RecipeDocument {
            id: 5,
            name: "김치볶음밥".to_string(),
            ingredients: vec!["김치".to_string(), "밥".to_string()],
            category: None,
            cooking_method: None,
            main_image: None,
            like_count: 3,
        };
        let body = bulk_body("recipes", &[document]).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 2);
        let action: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(action["index"]["_id"], "5");
        assert_eq!(action["index"]["_index"], "recipes");
        let source: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(source["likeCount"], 3);
        assert!(body.ends_with('\n'));
    }
}
