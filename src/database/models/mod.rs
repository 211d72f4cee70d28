pub mod recipe_comments;
pub mod recipe_favorites;
pub mod recipe_likes;
pub mod recipes;
pub mod refresh_tokens;
pub mod users;
