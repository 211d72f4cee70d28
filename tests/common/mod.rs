#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_web::{cookie::Cookie, web};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use nangpago::{
    api::response::PageResponse,
    app_state::AppState,
    auth::{Role, cookies::ACCESS_COOKIE},
    config::{Config, DatabaseSettings},
    database::{
        self,
        models::{recipes, users},
        schema,
    },
    errors::AppError,
    services::{
        search::{
            BulkIndexOutcome, InMemoryRecipeIndex, RecipeDocument, RecipeSearchIndex, SearchQuery,
        },
        user_service,
    },
};

pub const CLIENT_HOST: &str = "http://localhost:5173";

pub fn test_config() -> Config {
    Config {
        client_host: CLIENT_HOST.to_string(),
        jwt_secret: "test-secret-that-is-at-least-32-bytes-long".to_string(),
        ..Config::default()
    }
}

/// `sqlite::memory:` через обычный коннектор, пул из одного соединения.
pub async fn test_db() -> DatabaseConnection {
    let settings = DatabaseSettings::default_from_url("sqlite::memory:".to_string());
    let db = database::connect_with_settings(&settings)
        .await
        .expect("sqlite connects");
    schema::create_tables(&db).await.expect("tables are created");
    db
}

pub fn state_with(db: DatabaseConnection, search: Arc<dyn RecipeSearchIndex>) -> AppState {
    AppState::with_search(db, test_config(), search)
}

pub async fn memory_state() -> (web::Data<AppState>, InMemoryRecipeIndex) {
    let index = InMemoryRecipeIndex::new();
    let state = state_with(test_db().await, Arc::new(index.clone()));
    (web::Data::new(state), index)
}

pub async fn seed_user(db: &DatabaseConnection, email: &str, nickname: &str, role: Role) -> users::Model {
    let now = Utc::now();
    users::ActiveModel {
        email: Set(email.to_string()),
        nickname: Set(nickname.to_string()),
        name: Set(None),
        provider: Set("GOOGLE".to_string()),
        role: Set(role.as_str().to_string()),
        profile_image_url: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("user is inserted")
}

pub async fn seed_recipe(db: &DatabaseConnection, name: &str, ingredients: &str) -> recipes::Model {
    recipes::ActiveModel {
        name: Set(name.to_string()),
        category: Set(Some("밥".to_string())),
        cooking_method: Set(Some("볶기".to_string())),
        ingredients: Set(ingredients.to_string()),
        manuals: Set(serde_json::json!(["재료를 준비한다", "볶는다"])),
        main_image: Set(None),
        calorie: Set(Some(450)),
        like_count: Set(0),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("recipe is inserted")
}

pub fn access_cookie(state: &AppState, user: &users::Model) -> Cookie<'static> {
    let token = state
        .jwt
        .create_access_token(&user_service::principal_of(user))
        .expect("token is signed");
    Cookie::new(ACCESS_COOKIE, token)
}

/// Remembers every query it receives and returns an empty page.
#[derive(Clone, Default)]
pub struct RecordingIndex {
    pub queries: Arc<Mutex<Vec<SearchQuery>>>,
}

impl RecordingIndex {
    pub fn recorded(&self) -> Vec<SearchQuery> {
        self.queries.lock().expect("lock is not poisoned").clone()
    }
}

#[async_trait]
impl RecipeSearchIndex for RecordingIndex {
    async fn search(&self, query: &SearchQuery) -> Result<PageResponse<RecipeDocument>, AppError> {
        self.queries
            .lock()
            .expect("lock is not poisoned")
            .push(query.clone());
        Ok(PageResponse::new(Vec::new(), query.page, query.size, 0))
    }

    async fn bulk_index(&self, documents: &[RecipeDocument]) -> Result<BulkIndexOutcome, AppError> {
        Ok(BulkIndexOutcome {
            indexed: documents.len(),
            failed_ids: Vec::new(),
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
