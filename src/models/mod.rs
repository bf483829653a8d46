// src/models/mod.rs
pub mod attestation;

use serde::Serialize;

pub use attestation::{
    AttestationPage,
    AttestationQuery,
    AttestationReceipt,
    AttestationRecord,
    AttestationRequest,
    ClaimRequest,
    ClaimabilityMap,
    DecodedRecord,
    Notification,
    NotificationLevel,
    SchemaDescriptor,
};

// ==================== API RESPONSE ====================
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
