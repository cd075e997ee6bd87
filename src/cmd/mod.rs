pub mod app;
pub mod config;
pub mod delete;
pub mod edit;
pub mod generate_completions;
pub mod list;
pub mod new;
pub mod show;
