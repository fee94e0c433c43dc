pub mod analyzer;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod quality;
pub mod repository;
pub mod schema;
pub mod transformer;
pub mod validator;
