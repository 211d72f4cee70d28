use sea_orm::ConnectionTrait;

use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{api::response::ResponseDto, app_state::AppState, database};

#[derive(Debug, Serialize, ToSchema)]
pub struct VersionResponse {
    pub name: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub name: String,
    pub up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub up: bool,
    pub database: ComponentHealth,
    pub search: ComponentHealth,
}

#[utoipa::path(
    get,
    path = "/api/common/version",
    tag = "Common",
    responses(
        (status = 200, description = "Running server version", body = ResponseDto<VersionResponse>)
    )
)]
#[get("/common/version")]
pub async fn version() -> HttpResponse {
    HttpResponse::Ok().json(ResponseDto::of(VersionResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    }))
}

#[utoipa::path(
    get,
    path = "/api/common/health",
    tag = "Common",
    responses(
        (status = 200, description = "Database and search store are reachable", body = ResponseDto<HealthResponse>),
        (status = 503, description = "At least one dependency is down", body = ResponseDto<HealthResponse>)
    )
)]
#[get("/common/health")]
pub async fn health(app_state: web::Data<AppState>) -> HttpResponse {
    let database = match database::ping(&app_state.db).await {
        Ok(()) => ComponentHealth {
            name: format!("{:?}", app_state.db.get_database_backend()),
            up: true,
            error: None,
        },
        Err(e) => ComponentHealth {
            name: format!("{:?}", app_state.db.get_database_backend()),
            up: false,
            error: Some(format!("{:#}", e)),
        },
    };

    let search = match app_state.search.ping().await {
        Ok(()) => ComponentHealth {
            name: app_state.search.name().to_string(),
            up: true,
            error: None,
        },
        Err(e) => ComponentHealth {
            name: app_state.search.name().to_string(),
            up: false,
            error: Some(e.to_string()),
        },
    };

    let up = database.up && search.up;
    if !up {
        log::warn!(
            "health check failed: database up={}, search up={}",
            database.up,
            search.up
        );
    }

    let body = ResponseDto::of(HealthResponse {
        up,
        database,
        search,
    });
    if up {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(version).service(health);
}
