use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

/// Унифицированная структура ответа об ошибке
#[derive(Serialize)]
pub struct ErrorResponse<'a> {
    pub code: &'a str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl<'a> ErrorResponse<'a> {
    pub fn new(code: &'a str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            trace_id: None,
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

pub const UNAUTHENTICATED_MESSAGE: &str = "Authentication is required to access this resource";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbError(DbErr),

    #[error("Reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Page number must be 1 or greater")]
    InvalidPage,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Нет principal там, где он обязателен; тело совпадает с entry point фильтра
    #[error("{}", UNAUTHENTICATED_MESSAGE)]
    Unauthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Search store error: {0}")]
    Search(String),

    #[error("OAuth2 login failed: {0}")]
    OAuth2(String),

    #[error("Internal server error")]
    Internal,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DbError(_)
            | AppError::ReqwestError(_)
            | AppError::JsonError(_)
            | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) | AppError::InvalidPage => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Unauthenticated | AppError::OAuth2(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Search(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(self.body())
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => AppError::Conflict(detail),
            _ => AppError::DbError(err),
        }
    }
}

impl AppError {
    pub fn body(&self) -> ErrorResponse<'static> {
        ErrorResponse::new(self.code(), self.to_string())
    }

    /// Тот же ответ, что и `error_response`, но с `trace_id` запроса.
    pub fn traced_response(&self, trace_id: &str) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body().with_trace_id(trace_id))
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::DbError(_) => "DB_ERROR",
            AppError::ReqwestError(_) => "HTTP_ERROR",
            AppError::JsonError(_) => "JSON_ERROR",
            AppError::NotFound("Recipe") => "NOT_FOUND_RECIPE",
            AppError::NotFound("User") => "NOT_FOUND_USER",
            AppError::NotFound("Comment") => "NOT_FOUND_COMMENT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::InvalidPage => "BAD_REQUEST_INVALID_PAGE",
            AppError::Unauthorized(_) | AppError::Unauthenticated => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Search(_) => "SEARCH_ERROR",
            AppError::OAuth2(_) => "OAUTH2_ERROR",
            AppError::Internal => "INTERNAL",
        }
    }
}
