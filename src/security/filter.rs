use std::rc::Rc;

use actix_web::{
    Error, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::{Method, header},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use super::{Decision, SecurityPolicy};
use crate::{
    api::response::ResponseDto,
    app_state::AppState,
    auth::{
        JwtUtil, Principal, TokenCategory,
        cookies::{ACCESS_COOKIE, REFRESH_COOKIE, expired_cookie},
    },
    errors::AppError,
    services::token_service,
};

pub const LOGOUT_PATH: &str = "/api/logout";

/// Stateless security filter chain.
///
/// For every request, in order:
/// 1. JWT filter: a valid access token (cookie `access` or `Authorization:
///    Bearer`) becomes the request [`Principal`];
/// 2. logout filter: `POST /api/logout` is answered here;
/// 3. authorization: [`SecurityPolicy`] decides, anonymous callers on
///    protected paths get the JSON 401 entry point ([`AppError::Unauthenticated`],
///    the same body the [`AuthenticatedUser`](crate::auth::AuthenticatedUser)
///    extractor produces).
pub struct SecurityFilter {
    state: web::Data<AppState>,
    policy: Rc<SecurityPolicy>,
}

impl SecurityFilter {
    pub fn new(state: web::Data<AppState>, policy: SecurityPolicy) -> Self {
        Self {
            state,
            policy: Rc::new(policy),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityFilter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityFilterMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityFilterMiddleware {
            service: Rc::new(service),
            state: self.state.clone(),
            policy: self.policy.clone(),
        }))
    }
}

pub struct SecurityFilterMiddleware<S> {
    service: Rc<S>,
    state: web::Data<AppState>,
    policy: Rc<SecurityPolicy>,
}

impl<S, B> Service<ServiceRequest> for SecurityFilterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let state = self.state.clone();
        let policy = self.policy.clone();

        Box::pin(async move {
            if let Some(principal) = authenticate(req.request(), &state.jwt) {
                req.extensions_mut().insert(principal);
            }

            if req.method() == Method::POST && req.path() == LOGOUT_PATH {
                let response = logout(req.request(), &state).await;
                return Ok(req.into_response(response).map_into_right_body());
            }

            let principal = req.extensions().get::<Principal>().cloned();
            match policy.decide(req.path(), principal.as_ref()) {
                Decision::Permit => service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body),
                Decision::Unauthenticated => {
                    log::debug!("anonymous request to protected path {}", req.path());
                    Ok(req.error_response(AppError::Unauthenticated).map_into_right_body())
                }
                Decision::Forbidden => {
                    log::warn!(
                        "principal {:?} lacks the role for {}",
                        principal.map(|p| p.email),
                        req.path()
                    );
                    Ok(req
                        .error_response(AppError::Forbidden("Access denied".to_string()))
                        .map_into_right_body())
                }
            }
        })
    }
}

/// Access-токены запроса: сначала cookie, потом `Authorization: Bearer`.
fn access_tokens(req: &HttpRequest) -> Vec<String> {
    let cookie = req.cookie(ACCESS_COOKIE).map(|c| c.value().to_string());
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string());
    cookie.into_iter().chain(header).collect()
}

/// Returns the principal for the first access token that verifies. Any token
/// problem leaves the request anonymous; the authorization step decides what
/// that means.
pub fn authenticate(req: &HttpRequest, jwt: &JwtUtil) -> Option<Principal> {
    access_tokens(req).into_iter().find_map(|token| {
        jwt.verify(&token, TokenCategory::Access)
            .and_then(|claims| claims.principal())
            .map_err(|e| log::debug!("access token rejected: {}", e))
            .ok()
    })
}

async fn logout(req: &HttpRequest, state: &AppState) -> HttpResponse {
    let principal_email = req
        .extensions()
        .get::<Principal>()
        .map(|principal| principal.email.clone());
    // Без access-токена пользователя узнаём по refresh cookie
    let email = principal_email.or_else(|| {
        let refresh = req.cookie(REFRESH_COOKIE)?;
        state
            .jwt
            .verify(refresh.value(), TokenCategory::Refresh)
            .ok()
            .map(|claims| claims.sub)
    });

    if let Some(email) = &email {
        match token_service::revoke(&state.db, email).await {
            Ok(()) => log::info!("user {} logged out", email),
            // cookies are cleared regardless
            Err(e) => log::error!("failed to revoke refresh token for {}: {}", email, e),
        }
    }

    let secure = state.config.effective_cookie_secure();
    HttpResponse::Ok()
        .cookie(expired_cookie(ACCESS_COOKIE, secure))
        .cookie(expired_cookie(REFRESH_COOKIE, secure))
        .json(ResponseDto::with_message((), "로그아웃 되었습니다"))
}
