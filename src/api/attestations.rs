use axum::{extract::State, Json};
use serde::Serialize;

use crate::{
    error::Result,
    models::ApiResponse,
    services::{ViewPhase, ViewRow, ViewState},
    utils::address_to_lower_hex,
};

use super::AppState;

const EMPTY_MESSAGE: &str = "No attestations found. Start betting to see your activity!";

#[derive(Debug, Serialize)]
pub struct AttestationTableResponse {
    pub generation: u64,
    pub phase: ViewPhase,
    pub address: Option<String>,
    pub rows: Vec<ViewRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

fn table_response(view: &ViewState) -> AttestationTableResponse {
    let rows = view.rows();
    let message = if rows.is_empty() && view.phase != ViewPhase::AddressKnown {
        Some(EMPTY_MESSAGE.to_string())
    } else {
        None
    };

    AttestationTableResponse {
        generation: view.generation,
        phase: view.phase,
        address: view.address.as_ref().map(address_to_lower_hex),
        rows,
        message,
        warning: view.warning.clone(),
    }
}

/// GET /api/v1/attestations
pub async fn get_attestations(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AttestationTableResponse>>> {
    let view = state.view.snapshot().await;
    Ok(Json(ApiResponse::success(table_response(&view))))
}

/// POST /api/v1/attestations/refresh
pub async fn refresh_attestations(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AttestationTableResponse>>> {
    let view = state.view.load().await;
    Ok(Json(ApiResponse::success(table_response(&view))))
}
