use serde::Deserialize;
use utoipa::ToSchema;

pub const SYNC_SUCCESS_MESSAGE: &str = "MySQL 데이터를 Elastic에 성공적으로 동기화했습니다";

/// Query of `GET /api/recipe/search`. `pageNo` is 1-based.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSearchParams {
    pub page_no: Option<i64>,
    pub page_size: Option<i64>,
    pub keyword: Option<String>,
    pub search_type: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page_no: Option<i64>,
    pub page_size: Option<i64>,
}
