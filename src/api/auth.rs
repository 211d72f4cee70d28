use actix_web::{HttpRequest, HttpResponse, get, http::header, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    api::response::ResponseDto,
    app_state::AppState,
    auth::{
        AuthenticatedUser, Role,
        cookies::{OAUTH2_STATE_COOKIE, REFRESH_COOKIE, expired_cookie, oauth2_state_cookie},
        oauth2::{OAuth2Provider, resolve_authorization_url},
    },
    errors::AppError,
    services::{token_service, user_service},
};

#[derive(Debug, Deserialize)]
pub struct OAuth2CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginStatusResponse {
    pub email: String,
    pub role: Role,
}

#[utoipa::path(
    get,
    path = "/api/oauth2/authorization/{provider}",
    tag = "Auth",
    params(
        ("provider" = String, Path, description = "google, kakao or naver")
    ),
    responses(
        (status = 302, description = "Redirect to the provider's consent page"),
        (status = 404, description = "Provider unknown or not configured")
    )
)]
#[get("/oauth2/authorization/{provider}")]
pub async fn authorize(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let provider: OAuth2Provider = path.into_inner().parse()?;
    let registration = app_state.oauth2_registrations.get(provider)?;

    let state = Uuid::new_v4().simple().to_string();
    let location = resolve_authorization_url(registration, &state)?;

    Ok(HttpResponse::Found()
        .cookie(oauth2_state_cookie(
            state,
            app_state.config.effective_cookie_secure(),
        ))
        .insert_header((header::LOCATION, location.as_str()))
        .finish())
}

#[utoipa::path(
    get,
    path = "/api/login/oauth2/code/{provider}",
    tag = "Auth",
    params(
        ("provider" = String, Path, description = "google, kakao or naver"),
        ("code" = Option<String>, Query, description = "Authorization code"),
        ("state" = Option<String>, Query, description = "State issued by the authorization redirect"),
    ),
    responses(
        (status = 302, description = "Redirect to the client; on failure to `/login?error=<code>`")
    )
)]
#[get("/login/oauth2/code/{provider}")]
pub async fn login_callback(
    req: HttpRequest,
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<OAuth2CallbackParams>,
) -> HttpResponse {
    let client_host = app_state.config.client_host.trim_end_matches('/').to_string();
    let secure = app_state.config.effective_cookie_secure();

    let mut response = match complete_login(&req, &app_state, &path, &query).await {
        Ok(cookies) => {
            let mut builder = HttpResponse::Found();
            for cookie in cookies {
                builder.cookie(cookie);
            }
            builder
                .insert_header((header::LOCATION, client_host))
                .finish()
        }
        Err(e) => {
            log::warn!("OAuth2 login via {} failed: {}", path.as_str(), e);
            HttpResponse::Found()
                .insert_header((
                    header::LOCATION,
                    format!("{}/login?error={}", client_host, e.code().to_lowercase()),
                ))
                .finish()
        }
    };

    // state одноразовый
    if let Err(e) = response.add_cookie(&expired_cookie(OAUTH2_STATE_COOKIE, secure)) {
        log::error!("failed to expire the OAuth2 state cookie: {}", e);
    }
    response
}

async fn complete_login(
    req: &HttpRequest,
    app_state: &AppState,
    provider: &str,
    params: &OAuth2CallbackParams,
) -> Result<[actix_web::cookie::Cookie<'static>; 2], AppError> {
    if let Some(error) = &params.error {
        return Err(AppError::OAuth2(format!("provider returned `{}`", error)));
    }

    let provider: OAuth2Provider = provider.parse()?;
    let registration = app_state.oauth2_registrations.get(provider)?;

    let expected_state = req
        .cookie(OAUTH2_STATE_COOKIE)
        .map(|cookie| cookie.value().to_string());
    match (&params.state, expected_state) {
        (Some(state), Some(expected)) if *state == expected => {}
        _ => return Err(AppError::OAuth2("state mismatch".to_string())),
    }

    let code = params
        .code
        .as_deref()
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AppError::OAuth2("missing authorization code".to_string()))?;

    let info = app_state.oauth2_client.load_user(registration, code).await?;
    let user = user_service::register_or_update(&app_state.db, &info).await?;
    let principal = user_service::principal_of(&user);
    let tokens = token_service::issue(&app_state.db, &app_state.jwt, &principal).await?;

    log::info!("user {} logged in via {}", principal.email, provider);
    Ok(tokens.cookies(&app_state.jwt, &app_state.config))
}

#[utoipa::path(
    post,
    path = "/api/auth/reissue",
    tag = "Auth",
    responses(
        (status = 200, description = "New access and refresh cookies issued", body = ResponseDto<LoginStatusResponse>),
        (status = 401, description = "Refresh token missing, invalid or revoked")
    )
)]
#[post("/auth/reissue")]
pub async fn reissue(
    req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let refresh = req
        .cookie(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| AppError::Unauthorized("refresh token is missing".to_string()))?;

    let (tokens, principal) =
        token_service::reissue(&app_state.db, &app_state.jwt, &refresh).await?;

    let mut builder = HttpResponse::Ok();
    for cookie in tokens.cookies(&app_state.jwt, &app_state.config) {
        builder.cookie(cookie);
    }
    Ok(builder.json(ResponseDto::with_message(
        LoginStatusResponse {
            email: principal.email,
            role: principal.role,
        },
        "토큰이 재발급되었습니다",
    )))
}

#[utoipa::path(
    get,
    path = "/api/auth/status",
    tag = "Auth",
    responses(
        (status = 200, description = "Current login", body = ResponseDto<LoginStatusResponse>),
        (status = 401, description = "Not logged in")
    )
)]
#[get("/auth/status")]
pub async fn status(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let AuthenticatedUser(principal) = user;
    Ok(HttpResponse::Ok().json(ResponseDto::of(LoginStatusResponse {
        email: principal.email,
        role: principal.role,
    })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(authorize)
        .service(login_callback)
        .service(reissue)
        .service(status);
}
