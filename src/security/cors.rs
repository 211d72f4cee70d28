use actix_cors::Cors;
use actix_web::http::header;

/// CORS for the single frontend origin: any method and header, credentials
/// allowed, `Set-Cookie` exposed.
pub fn cors_policy(client_host: &str) -> Cors {
    Cors::default()
        .allowed_origin(client_host.trim_end_matches('/'))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .expose_headers([header::SET_COOKIE])
        .max_age(3600)
}
