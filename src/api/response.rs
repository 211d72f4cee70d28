use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_MESSAGE: &str = "success";

/// Envelope for every successful JSON response: `{"data": .., "message": ..}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResponseDto<T> {
    pub data: T,
    pub message: String,
}

impl<T> ResponseDto<T> {
    pub fn of(data: T) -> Self {
        Self::with_message(data, DEFAULT_MESSAGE)
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
        }
    }
}

/// One page of results. `current_page` is zero-based.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub current_page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub last: bool,
}

impl<T> PageResponse<T> {
    pub fn new(content: Vec<T>, page: u64, page_size: u64, total_items: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_items.div_ceil(page_size)
        };
        Self {
            content,
            current_page: page,
            page_size,
            total_items,
            total_pages,
            last: page + 1 >= total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResponse<U> {
        PageResponse {
            content: self.content.into_iter().map(f).collect(),
            current_page: self.current_page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            last: self.last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_math() {
        let page = PageResponse::new(vec![1, 2, 3], 0, 3, 7);
        assert_eq!(page.total_pages, 3);
        assert!(!page.last);

        let page = PageResponse::new(vec![7], 2, 3, 7);
        assert!(page.last);

        let empty: PageResponse<i32> = PageResponse::new(vec![], 0, 10, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.last);
    }

    #[test]
    fn envelope_defaults_to_success_message() {
        let body = serde_json::to_value(ResponseDto::of(3)).unwrap();
        assert_eq!(body, serde_json::json!({ "data": 3, "message": "success" }));
    }
}
