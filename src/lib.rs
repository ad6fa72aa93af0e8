pub mod app;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod render;
pub mod schema;
pub mod validator;
pub mod value;
