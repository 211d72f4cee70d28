use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    api::{
        recipes::PageParams,
        response::{PageResponse, ResponseDto},
        validation::{page_request, sanitize_comment},
    },
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    services::comment_service::{self, CommentResponse},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRequest {
    pub content: String,
}

#[utoipa::path(
    get,
    path = "/api/recipe/{id}/comment",
    tag = "Comments",
    params(
        ("id" = i64, Path, description = "Recipe ID"),
        ("pageNo" = Option<i64>, Query, description = "1-based page number (default 1)"),
        ("pageSize" = Option<i64>, Query, description = "Page size (default 10)"),
    ),
    responses(
        (status = 200, description = "Comments, newest first", body = ResponseDto<PageResponse<CommentResponse>>),
        (status = 404, description = "Recipe not found")
    )
)]
#[get("/{id}/comment")]
pub async fn get_comments(
    app_state: web::Data<AppState>,
    viewer: Option<AuthenticatedUser>,
    path: web::Path<i64>,
    query: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let (page, size) = page_request(query.page_no, query.page_size)?;
    let comments = comment_service::comments(
        &app_state.db,
        path.into_inner(),
        page,
        size,
        viewer.map(|user| user.id()),
    )
    .await?;
    Ok(HttpResponse::Ok().json(ResponseDto::of(comments)))
}

#[utoipa::path(
    get,
    path = "/api/recipe/{id}/comment/count",
    tag = "Comments",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Number of comments", body = ResponseDto<u64>)
    )
)]
#[get("/{id}/comment/count")]
pub async fn get_comment_count(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let count = comment_service::count(&app_state.db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ResponseDto::of(count)))
}

#[utoipa::path(
    post,
    path = "/api/recipe/{id}/comment",
    tag = "Comments",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = ResponseDto<CommentResponse>),
        (status = 400, description = "Empty or too long comment"),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Recipe not found")
    )
)]
#[post("/{id}/comment")]
pub async fn create_comment(
    app_state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<CommentRequest>,
) -> Result<HttpResponse, AppError> {
    let content = sanitize_comment(&body.content)?;
    let comment =
        comment_service::create(&app_state.db, path.into_inner(), user.email(), content).await?;
    Ok(HttpResponse::Created().json(ResponseDto::of(comment)))
}

#[utoipa::path(
    put,
    path = "/api/recipe/{id}/comment/{commentId}",
    tag = "Comments",
    params(
        ("id" = i64, Path, description = "Recipe ID"),
        ("commentId" = i64, Path, description = "Comment ID")
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = ResponseDto<CommentResponse>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found")
    )
)]
#[put("/{id}/comment/{commentId}")]
pub async fn update_comment(
    app_state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(i64, i64)>,
    body: web::Json<CommentRequest>,
) -> Result<HttpResponse, AppError> {
    let (recipe_id, comment_id) = path.into_inner();
    let content = sanitize_comment(&body.content)?;
    let comment =
        comment_service::update(&app_state.db, recipe_id, comment_id, user.email(), content)
            .await?;
    Ok(HttpResponse::Ok().json(ResponseDto::of(comment)))
}

#[utoipa::path(
    delete,
    path = "/api/recipe/{id}/comment/{commentId}",
    tag = "Comments",
    params(
        ("id" = i64, Path, description = "Recipe ID"),
        ("commentId" = i64, Path, description = "Comment ID")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found")
    )
)]
#[delete("/{id}/comment/{commentId}")]
pub async fn delete_comment(
    app_state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let (recipe_id, comment_id) = path.into_inner();
    comment_service::delete(&app_state.db, recipe_id, comment_id, user.email()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Registered inside the `/recipe` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_comments)
        .service(get_comment_count)
        .service(create_comment)
        .service(update_comment)
        .service(delete_comment);
}
