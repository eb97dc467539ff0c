//! Washbay car-wash booking server
//!
//! REST JSON API for car-wash buildings, their half-hour slot grid, pitches,
//! add-on services and atomic multi-slot orders.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod scheduling;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
