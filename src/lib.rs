//! Ouvrage Field Service Management System
//!
//! A Rust implementation of the Ouvrage field service server, providing a
//! REST JSON API for managing clients, equipment and maintenance
//! activities through their lifecycle.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod workflow;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
