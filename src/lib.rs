//! BroRent - Peer-to-peer Item Rental Server
//!
//! A Rust REST API server for a residential community rental marketplace:
//! users list items, request to borrow them, owners approve and hand them
//! over, and staff export activity reports.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod reports;
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
