// =====================================================================================
// File: service-farm/src/health.rs
// Description: Liveness/readiness probe
// =====================================================================================

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    network: &'static str,
}

pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let network = match state.config.network {
        crate::config::Network::Mainnet => "mainnet",
        crate::config::Network::Testnet => "testnet",
    };
    HttpResponse::Ok().json(HealthBody { status: "ok", network })
}

pub async fn metrics(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(state.metrics.gather())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::metrics::FarmMetrics;
    use crate::ports::inmemory::*;
    use crate::service::SaveServiceImpl;
    use std::sync::Arc;

    fn test_state() -> AppState {
        let config = ServiceConfig::default();
        let save_service = Arc::new(SaveServiceImpl::from_config(
            Arc::new(InMemoryRepository::new()),
            Arc::new(InMemoryEventStore::new()),
            Arc::new(InMemoryChain::new()),
            Arc::new(InMemorySigner::new()),
            Arc::new(InMemoryWallet::new()),
            Arc::new(InMemoryWhitelist::new()),
            &config,
        ));
        AppState {
            config,
            metrics: Arc::new(FarmMetrics::new()),
            save_service,
        }
    }

    #[actix_web::test]
    async fn health_reports_ok() {
        let state = web::Data::new(test_state());
        let resp = health(state).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    }
}
