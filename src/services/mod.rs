pub mod comment_service;
pub mod favorite_service;
pub mod like_service;
pub mod recipe_service;
pub mod search;
pub mod search_sync;
pub mod token_service;
pub mod user_service;
