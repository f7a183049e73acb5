// =====================================================================================
// File: service-farm/src/lib.rs
// Description: HTTP-facing save/withdraw service for farm save games
// =====================================================================================

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod ports;
pub mod service;

use std::sync::Arc;

pub struct AppState {
    pub config: config::ServiceConfig,
    pub metrics: Arc<metrics::FarmMetrics>,
    pub save_service: Arc<dyn service::SaveService>,
}
