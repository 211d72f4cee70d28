pub mod api;
pub mod app;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod security;
pub mod services;
