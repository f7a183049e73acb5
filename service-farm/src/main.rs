// =====================================================================================
// File: service-farm/src/main.rs
// Description: actix-web bootstrap for the save/withdraw service
// =====================================================================================

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use service_farm::config::ServiceConfig;
use service_farm::metrics::FarmMetrics;
use service_farm::ports::inmemory::{
    InMemoryChain, InMemoryEventStore, InMemoryRepository, InMemorySigner, InMemoryWallet, InMemoryWhitelist,
};
use service_farm::service::SaveServiceImpl;
use service_farm::{handlers, health, middleware, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = ServiceConfig::load().unwrap_or_else(|err| {
        eprintln!("invalid configuration: {err}, falling back to defaults");
        ServiceConfig::default()
    });

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .json()
        .init();

    // Bundled demo wiring: in-memory ports stand in for the real repository,
    // chain RPC client, signer, and whitelist, which live outside this
    // workspace (spec section 1 Non-goals).
    let save_service = Arc::new(SaveServiceImpl::from_config(
        Arc::new(InMemoryRepository::new()),
        Arc::new(InMemoryEventStore::new()),
        Arc::new(InMemoryChain::new()),
        Arc::new(InMemorySigner::new()),
        Arc::new(InMemoryWallet::new()),
        Arc::new(InMemoryWhitelist::new()),
        &config,
    ));

    let state = web::Data::new(AppState {
        config: config.clone(),
        metrics: Arc::new(FarmMetrics::new()),
        save_service,
    });

    let host = config.server.host.clone();
    let port = config.server.port;
    info!(host = %host, port, network = ?config.network, "service-farm starting");

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::RequestId)
            .app_data(state.clone())
            .route("/save", web::post().to(handlers::save))
            .route("/withdraw", web::post().to(handlers::withdraw))
            .route("/health", web::get().to(health::health))
            .route("/metrics", web::get().to(health::metrics))
    })
    .bind((host.as_str(), port))?;

    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    server.run().await
}
