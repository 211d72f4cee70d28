use actix_web::{
    App, Error,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::{Logger, NormalizePath},
    web,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    api::{
        auth, comments, common, favorites, middleware::RequestIdTracing, recipes,
    },
    app_state::AppState,
    auth::{Role, oauth2::OAuth2Provider},
    errors::AppError,
    security::{SecurityFilter, SecurityPolicy, cors_policy},
    services::{
        comment_service::CommentResponse,
        favorite_service::RecipeFavoriteResponse,
        like_service::RecipeLikeResponse,
        recipe_service::RecipeResponse,
        search::{BulkIndexOutcome, RecipeDocument, SearchType},
        search_sync::SyncReport,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Recipes
        recipes::get_recipe,
        recipes::get_like_status,
        recipes::toggle_like,
        recipes::get_like_count,
        recipes::search_recipes,
        recipes::sync_recipes,
        // Comments
        comments::get_comments,
        comments::get_comment_count,
        comments::create_comment,
        comments::update_comment,
        comments::delete_comment,
        // Favorites
        favorites::get_favorite_status,
        favorites::toggle_favorite,
        // Auth
        auth::authorize,
        auth::login_callback,
        auth::reissue,
        auth::status,
        // Common
        common::version,
        common::health,
    ),
    components(
        schemas(
            RecipeResponse,
            RecipeDocument,
            RecipeLikeResponse,
            RecipeFavoriteResponse,
            CommentResponse,
            comments::CommentRequest,
            SearchType,
            SyncReport,
            BulkIndexOutcome,
            auth::LoginStatusResponse,
            common::VersionResponse,
            common::HealthResponse,
            common::ComponentHealth,
            Role,
            OAuth2Provider,
        )
    ),
    tags(
        (name = "Recipes", description = "Recipe detail, likes, search and index sync"),
        (name = "Comments", description = "Recipe comments"),
        (name = "Favorites", description = "Favorite recipes of the current user"),
        (name = "Auth", description = "OAuth2 login and token lifecycle"),
        (name = "Common", description = "Version and health")
    )
)]
pub struct ApiDoc;

/// Builds the application with the full middleware stack.
///
/// Order, outermost first: CORS, access log, path normalization, request id,
/// security filter chain, routes.
///
/// Trailing slashes are trimmed, so Swagger UI is reached through
/// `/swagger-ui/index.html`.
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let client_host = state.config.client_host.clone();
    let json_limit = state.config.effective_max_body_bytes();

    App::new()
        .app_data(state.clone())
        .app_data(
            web::JsonConfig::default()
                .limit(json_limit)
                .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into()),
        )
        .app_data(
            web::QueryConfig::default()
                .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into()),
        )
        .wrap(SecurityFilter::new(state, SecurityPolicy::default()))
        .wrap(RequestIdTracing)
        .wrap(NormalizePath::trim())
        .wrap(Logger::default())
        .wrap(cors_policy(&client_host))
        .service(
            web::scope("/api")
                .configure(recipes::init_routes)
                .configure(auth::init_routes)
                .configure(common::init_routes),
        )
        .service(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
}
