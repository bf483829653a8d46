use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Wallet unavailable: {0}")]
    WalletUnavailable(String),

    #[error("Attestation query failed: {0}")]
    QueryFailure(String),

    #[error("Payload decode failed: {0}")]
    DecodeFailure(String),

    #[error("Battle oracle error: {0}")]
    OracleFailure(String),

    #[error("Claim submission failed: {0}")]
    ClaimSubmission(String),

    #[error("Blockchain RPC error: {0}")]
    BlockchainRPC(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::WalletUnavailable(_) => (StatusCode::UNAUTHORIZED, "WALLET_UNAVAILABLE"),
            AppError::QueryFailure(_) => (StatusCode::BAD_GATEWAY, "QUERY_FAILURE"),
            AppError::DecodeFailure(_) => (StatusCode::UNPROCESSABLE_ENTITY, "DECODE_FAILURE"),
            AppError::OracleFailure(_) => (StatusCode::BAD_GATEWAY, "ORACLE_FAILURE"),
            AppError::ClaimSubmission(_) => (StatusCode::BAD_GATEWAY, "CLAIM_FAILED"),
            AppError::BlockchainRPC(_) => (StatusCode::BAD_GATEWAY, "BLOCKCHAIN_RPC_ERROR"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = Json(ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details: None,
            },
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
