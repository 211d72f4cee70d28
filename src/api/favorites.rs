use actix_web::{HttpResponse, get, post, web};

use crate::{
    api::response::ResponseDto,
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    services::favorite_service::{self, RecipeFavoriteResponse},
};

#[utoipa::path(
    get,
    path = "/api/recipe/{id}/favorite/status",
    tag = "Favorites",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Whether the recipe is in the user's favorites", body = ResponseDto<bool>),
        (status = 401, description = "Not logged in")
    )
)]
#[get("/{id}/favorite/status")]
pub async fn get_favorite_status(
    app_state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let favorite =
        favorite_service::is_favorite(&app_state.db, path.into_inner(), user.email()).await?;
    Ok(HttpResponse::Ok().json(ResponseDto::of(favorite)))
}

#[utoipa::path(
    post,
    path = "/api/recipe/{id}/favorite/toggle",
    tag = "Favorites",
    params(
        ("id" = i64, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Favorite state after the toggle", body = ResponseDto<RecipeFavoriteResponse>),
        (status = 401, description = "Not logged in")
    )
)]
#[post("/{id}/favorite/toggle")]
pub async fn toggle_favorite(
    app_state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let result =
        favorite_service::toggle_favorite(&app_state.db, path.into_inner(), user.email()).await?;
    Ok(HttpResponse::Ok().json(ResponseDto::of(result)))
}

/// Registered inside the `/recipe` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_favorite_status).service(toggle_favorite);
}
