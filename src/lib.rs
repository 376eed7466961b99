//! Vantage - Web Traffic Analytics Dashboard Server
//!
//! A small Rust REST API server that aggregates unique-visitor statistics
//! from an Elasticsearch analytics index and reshapes them for charting.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod elastic;
pub mod error;
pub mod models;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
