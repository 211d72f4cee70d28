use std::sync::Arc;

use crate::auth::JwtUtil;
use crate::auth::oauth2::{ClientRegistrations, OAuth2Client};
use crate::config::Config;
use crate::services::search::{ElasticsearchIndex, InMemoryRecipeIndex, RecipeSearchIndex};
use sea_orm::DatabaseConnection;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub jwt: JwtUtil,
    pub search: Arc<dyn RecipeSearchIndex>,
    pub oauth2_registrations: ClientRegistrations,
    pub oauth2_client: OAuth2Client,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let search: Arc<dyn RecipeSearchIndex> = match &config.elasticsearch_url {
            Some(url) => Arc::new(ElasticsearchIndex::new(url, config.effective_search_index())),
            None => {
                log::warn!("ELASTICSEARCH_URL is not set, using the in-memory recipe index");
                Arc::new(InMemoryRecipeIndex::new())
            }
        };
        Self::with_search(db, config, search)
    }

    pub fn with_search(
        db: DatabaseConnection,
        config: Config,
        search: Arc<dyn RecipeSearchIndex>,
    ) -> Self {
        let jwt = JwtUtil::new(
            &config.jwt_secret,
            config.effective_access_token_ttl(),
            config.effective_refresh_token_ttl(),
        );
        let oauth2_registrations = ClientRegistrations::from_config(&config);

        Self {
            db,
            jwt,
            search,
            oauth2_registrations,
            oauth2_client: OAuth2Client::new(),
            config,
        }
    }
}
