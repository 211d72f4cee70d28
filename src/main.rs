use actix_web::{HttpServer, web};
use dotenvy::dotenv;

use nangpago::{app::create_app, app_state::AppState, config::Config, database};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Failed to load configuration: {}", e),
        )
    })?;
    let db = database::connect().await?;

    if config.database_auto_migrate.unwrap_or(false) {
        database::schema::create_tables(&db)
            .await
            .map_err(|e| std::io::Error::other(format!("Failed to create tables: {}", e)))?;
    }

    let host = config.host.clone();
    let port = config.port;
    let state = web::Data::new(AppState::new(db, config));

    log::info!(
        "Search store: {}, OAuth2 providers configured: {}",
        state.search.name(),
        state.oauth2_registrations.len()
    );
    log::info!("Starting server at http://{}:{}", host, port);
    log::info!("Swagger UI available at http://{}:{}/swagger-ui/index.html", host, port);

    HttpServer::new(move || create_app(state.clone()))
        .bind((host, port))?
        .run()
        .await
}
