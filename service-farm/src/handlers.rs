// =====================================================================================
// File: service-farm/src/handlers.rs
// Description: HTTP handlers for the save and withdraw endpoints
// =====================================================================================

use actix_web::{web, HttpResponse};
use tracing::{info, warn};

use crate::error::ServiceError;
use crate::models::{SaveRequest, WithdrawRequest, WithdrawResponse};
use crate::AppState;

pub async fn save(state: web::Data<AppState>, req: web::Json<SaveRequest>) -> Result<HttpResponse, ServiceError> {
    let req = req.into_inner();
    info!(farm_id = req.farm_id, actions = req.actions.len(), "save requested");
    state.metrics.saves_attempted_total.inc();

    let result = state
        .save_service
        .save(req.farm_id, &req.sender, &req.signature, req.actions)
        .await;

    match result {
        Ok(new_state) => {
            state.metrics.saves_committed_total.inc();
            Ok(HttpResponse::Ok().json(new_state))
        }
        Err(err) => {
            warn!(farm_id = req.farm_id, error = %err, "save rejected");
            state.metrics.saves_rejected_total.with_label_values(&[err.tag()]).inc();
            Err(err)
        }
    }
}

pub async fn withdraw(
    state: web::Data<AppState>,
    req: web::Json<WithdrawRequest>,
) -> Result<HttpResponse, ServiceError> {
    let req = req.into_inner();
    info!(farm_id = req.farm_id, sfl = %req.sfl, "withdraw requested");

    let outcome = state
        .save_service
        .withdraw(
            req.farm_id,
            &req.session_id,
            &req.sender,
            &req.signature,
            req.sfl,
            req.ids,
            req.amounts,
        )
        .await?;

    state.metrics.withdrawals_total.inc();
    Ok(HttpResponse::Ok().json(WithdrawResponse {
        signature: outcome.bundle.signature,
        deadline: outcome.bundle.deadline,
        tax_bps: outcome.tax_bps,
    }))
}
