// All service modules
pub mod attestation_view;
pub mod claim_submitter;
pub mod eligibility;
pub mod notification_service;

// Re-export for convenience
pub use attestation_view::{AttestationView, ViewPhase, ViewRow, ViewState};
pub use claim_submitter::ClaimSubmitter;
pub use eligibility::EligibilityEvaluator;
pub use notification_service::{NotificationService, Notifier};
