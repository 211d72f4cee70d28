pub mod auth;
pub mod comments;
pub mod common;
pub mod favorites;
pub mod middleware;
pub mod recipes;
pub mod response;
pub mod validation;
