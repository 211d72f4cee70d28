//! Простые функции валидации для входных DTO.
//! Позволяет раннее отбрасывание некорректных данных.

use regex::Regex;

use crate::errors::AppError;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;
pub const MAX_COMMENT_CHARS: usize = 500;
/// Предел `offset + size` для страниц, как `index.max_result_window` в Elasticsearch.
pub const MAX_RESULT_WINDOW: u64 = 10_000;

lazy_static::lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
    static ref CONTROL_RE: Regex = Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap();
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn ensure_max_len(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}

/// Converts the client's 1-based `pageNo`/`pageSize` into a zero-based page
/// index and a size. `pageNo < 1` is always rejected, as is any page that
/// ends past [`MAX_RESULT_WINDOW`].
pub fn page_request(page_no: Option<i64>, page_size: Option<i64>) -> Result<(u64, u64), AppError> {
    let page_no = page_no.unwrap_or(1);
    if page_no < 1 {
        return Err(AppError::InvalidPage);
    }

    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE as i64);
    if page_size < 1 || page_size as u64 > MAX_PAGE_SIZE {
        return Err(AppError::InvalidInput(format!(
            "pageSize must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }

    let (page, size) = ((page_no - 1) as u64, page_size as u64);
    let window_end = page
        .checked_mul(size)
        .and_then(|offset| offset.checked_add(size));
    match window_end {
        Some(end) if end <= MAX_RESULT_WINDOW => Ok((page, size)),
        _ => Err(AppError::InvalidInput(format!(
            "pageNo * pageSize must not exceed {}",
            MAX_RESULT_WINDOW
        ))),
    }
}

/// Trims the comment, drops control characters and checks the length.
pub fn sanitize_comment(content: &str) -> Result<String, AppError> {
    let cleaned = CONTROL_RE.replace_all(content, "");
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("Comment must not be empty".to_string()));
    }
    if !ensure_max_len(trimmed, MAX_COMMENT_CHARS) {
        return Err(AppError::InvalidInput(format!(
            "Comment must be at most {} characters",
            MAX_COMMENT_CHARS
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_zero_is_rejected_whatever_the_size() {
        for size in [None, Some(1), Some(10), Some(-5), Some(1000)] {
            assert!(matches!(page_request(Some(0), size), Err(AppError::InvalidPage)));
        }
        assert!(matches!(page_request(Some(-1), None), Err(AppError::InvalidPage)));
    }

    #[test]
    fn first_page_is_index_zero() {
        assert_eq!(page_request(Some(1), Some(20)).unwrap(), (0, 20));
        assert_eq!(page_request(None, None).unwrap(), (0, DEFAULT_PAGE_SIZE));
        assert_eq!(page_request(Some(3), None).unwrap(), (2, DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn page_size_is_bounded() {
        assert!(matches!(page_request(Some(1), Some(0)), Err(AppError::InvalidInput(_))));
        assert!(matches!(page_request(Some(1), Some(101)), Err(AppError::InvalidInput(_))));
        assert!(page_request(Some(1), Some(100)).is_ok());
    }

    #[test]
    fn pages_past_the_result_window_are_rejected() {
        assert!(matches!(
            page_request(Some(i64::MAX), Some(10)),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            page_request(Some(i64::MAX), Some(MAX_PAGE_SIZE as i64)),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(page_request(Some(1001), Some(10)), Err(AppError::InvalidInput(_))));
        assert_eq!(page_request(Some(1000), Some(10)).unwrap(), (999, 10));
        assert_eq!(page_request(Some(100), Some(100)).unwrap(), (99, 100));
    }

    #[test]
    fn comment_is_trimmed_and_cleaned() {
        assert_eq!(sanitize_comment("  맛있어요\u{7}  ").unwrap(), "맛있어요");
        assert_eq!(sanitize_comment("line1\nline2").unwrap(), "line1\nline2");
        assert!(sanitize_comment("   ").is_err());
        assert!(sanitize_comment(&"가".repeat(501)).is_err());
        assert!(sanitize_comment(&"가".repeat(500)).is_ok());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("cook@nangpago.kr"));
        assert!(!validate_email("cook@localhost"));
    }
}
