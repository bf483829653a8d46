use axum::{extract::State, Json};
use serde::Serialize;

use super::AppState;
use crate::services::ViewPhase;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub view_phase: ViewPhase,
    pub wallet: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let view = state.view.snapshot().await;

    let wallet_status = if view.address.is_some() {
        "connected".to_string()
    } else {
        "disconnected".to_string()
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        view_phase: view.phase,
        wallet: wallet_status,
    })
}
