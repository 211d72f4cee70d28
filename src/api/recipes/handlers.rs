use actix_web::{HttpResponse, get, post, web};

use super::structures::{RecipeSearchParams, SYNC_SUCCESS_MESSAGE};
use crate::{
    api::{
        comments, favorites,
        response::{PageResponse, ResponseDto},
        validation::page_request,
    },
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    services::{
        like_service::{self, RecipeLikeResponse},
        recipe_service::{self, RecipeResponse},
        search::{RecipeDocument, SearchQuery, SearchType},
        search_sync::{self, SyncReport},
    },
};

/// Validates the 1-based search parameters and builds the zero-based query.
pub fn to_search_query(params: RecipeSearchParams) -> Result<SearchQuery, AppError> {
    let (page, size) = page_request(params.page_no, params.page_size)?;
    let search_type = match params.search_type.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw.parse::<SearchType>()?,
        _ => SearchType::default(),
    };

    Ok(SearchQuery {
        page,
        size,
        keyword: params.keyword,
        search_type,
    })
}

#[utoipa::path(
    get,
    path = "/api/recipe/{id}",
    tag = "Recipes",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe detail", body = ResponseDto<RecipeResponse>),
        (status = 404, description = "Recipe not found")
    )
)]
#[get("/{id}")]
pub async fn get_recipe(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let recipe = recipe_service::recipe_by_id(&app_state.db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ResponseDto::of(recipe)))
}

#[utoipa::path(
    get,
    path = "/api/recipe/{id}/like/status",
    tag = "Recipes",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Whether the current user likes the recipe", body = ResponseDto<bool>),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Recipe not found")
    )
)]
#[get("/{id}/like/status")]
pub async fn get_like_status(
    app_state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let liked = like_service::is_liked(&app_state.db, path.into_inner(), user.email()).await?;
    Ok(HttpResponse::Ok().json(ResponseDto::of(liked)))
}

#[utoipa::path(
    post,
    path = "/api/recipe/{id}/like/toggle",
    tag = "Recipes",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Like state after the toggle", body = ResponseDto<RecipeLikeResponse>),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "Recipe not found")
    )
)]
#[post("/{id}/like/toggle")]
pub async fn toggle_like(
    app_state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let result = like_service::toggle_like(&app_state.db, path.into_inner(), user.email()).await?;
    Ok(HttpResponse::Ok().json(ResponseDto::of(result)))
}

#[utoipa::path(
    get,
    path = "/api/recipe/{id}/like/count",
    tag = "Recipes",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Number of likes", body = ResponseDto<i32>),
        (status = 404, description = "Recipe not found")
    )
)]
#[get("/{id}/like/count")]
pub async fn get_like_count(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let count = like_service::like_count(&app_state.db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ResponseDto::of(count)))
}

#[utoipa::path(
    get,
    path = "/api/recipe/search",
    tag = "Recipes",
    params(
        ("pageNo" = Option<i64>, Query, description = "1-based page number (default 1)"),
        ("pageSize" = Option<i64>, Query, description = "Page size (default 10)"),
        ("keyword" = Option<String>, Query, description = "Search keyword"),
        ("searchType" = Option<String>, Query, description = "INGREDIENTS (default) or NAME"),
    ),
    responses(
        (status = 200, description = "One page of matching recipes", body = ResponseDto<PageResponse<RecipeDocument>>),
        (status = 400, description = "pageNo below 1 or bad searchType")
    )
)]
#[get("/search")]
pub async fn search_recipes(
    app_state: web::Data<AppState>,
    query: web::Query<RecipeSearchParams>,
) -> Result<HttpResponse, AppError> {
    let search_query = to_search_query(query.into_inner())?;
    let page = app_state.search.search(&search_query).await?;
    Ok(HttpResponse::Ok().json(ResponseDto::of(page)))
}

#[utoipa::path(
    post,
    path = "/api/recipe/bulk-upload/mysql",
    tag = "Recipes",
    responses(
        (status = 200, description = "Sync finished", body = ResponseDto<SyncReport>),
        (status = 401, description = "Not logged in"),
        (status = 502, description = "Search store unreachable")
    )
)]
#[post("/bulk-upload/mysql")]
pub async fn sync_recipes(
    app_state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    log::info!("search re-index requested by {}", user.email());
    let report = search_sync::sync_all(
        &app_state.db,
        app_state.search.as_ref(),
        app_state.config.effective_sync_batch_size(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(ResponseDto::with_message(report, SYNC_SUCCESS_MESSAGE)))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // `/search` и `/bulk-upload/mysql` регистрируются раньше `/{id}`
    cfg.service(
        web::scope("/recipe")
            .service(search_recipes)
            .service(sync_recipes)
            .service(get_recipe)
            .service(get_like_status)
            .service(toggle_like)
            .service(get_like_count)
            .configure(comments::configure)
            .configure(favorites::configure),
    );
}
