//! LendHub item-sharing platform
//!
//! A Rust implementation of the LendHub sharing backend, providing a REST
//! JSON API for listing items, booking them, reviewing them, and posting
//! item requests.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
