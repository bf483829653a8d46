use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{error::Result, models::ApiResponse};

use super::AppState;

/// Missing fields deserialize as blank and are rejected by the submitter,
/// after the wallet check, like any other malformed claim.
#[derive(Debug, Deserialize)]
pub struct ClaimBody {
    #[serde(default)]
    pub battle_id: String,
    #[serde(default)]
    pub meme_id: String,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub tx_hash: String,
    pub block_number: Option<u64>,
    pub refreshed: bool,
}

#[derive(Debug, Deserialize)]
pub struct EligibilityParams {
    pub battle_id: String,
    pub meme_id: String,
}

#[derive(Debug, Serialize)]
pub struct EligibilityResponse {
    pub battle_id: String,
    pub meme_id: String,
    pub claimable: bool,
}

/// POST /api/v1/claims
pub async fn submit_claim(
    State(state): State<AppState>,
    Json(body): Json<ClaimBody>,
) -> Result<Json<ApiResponse<ClaimResponse>>> {
    let receipt = state.view.claim(&body.battle_id, &body.meme_id).await?;

    let refreshed = if state.config.refresh_after_claim {
        state.view.load().await;
        true
    } else {
        false
    };

    Ok(Json(ApiResponse::success(ClaimResponse {
        tx_hash: format!("{:?}", receipt.tx_hash),
        block_number: receipt.block_number,
        refreshed,
    })))
}

/// GET /api/v1/claims/eligibility?battle_id=..&meme_id=..
pub async fn check_eligibility(
    State(state): State<AppState>,
    Query(params): Query<EligibilityParams>,
) -> Result<Json<ApiResponse<EligibilityResponse>>> {
    let claimable = state.view.can_claim(&params.battle_id, &params.meme_id).await;

    Ok(Json(ApiResponse::success(EligibilityResponse {
        battle_id: params.battle_id,
        meme_id: params.meme_id,
        claimable,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::test_app;
    use crate::config::Config;
    use crate::constants::{MSG_CLAIM_FAILED, MSG_CLAIM_STARTED, MSG_NO_WALLET};
    use crate::error::AppError;
    use crate::models::NotificationLevel;
    use crate::testing::{bet_record, MockIdentity, MockOracle, MockReader};

    const USER: &str = "0x00000000000000000000000000000000000000aa";

    fn body(battle_id: &str, meme_id: &str) -> Json<ClaimBody> {
        Json(ClaimBody {
            battle_id: battle_id.to_string(),
            meme_id: meme_id.to_string(),
        })
    }

    fn loaded_reader() -> MockReader {
        MockReader::rows(vec![bet_record("att-1", USER, "B1", 1, "1", 1, "USER_BET")])
    }

    #[tokio::test]
    async fn claim_refreshes_view_when_enabled() {
        let app = test_app(
            MockIdentity::address(USER),
            loaded_reader(),
            MockOracle::new().with_battle("B1", "ended", "1"),
            Config::for_tests(),
        );
        app.state.view.load().await;

        let Json(response) = submit_claim(State(app.state.clone()), body("B1", "1")).await.unwrap();
        assert!(response.data.refreshed);
        assert_eq!(response.data.tx_hash, format!("0x{}", "42".repeat(32)));
        assert_eq!(app.writer.calls(), 1);
        assert_eq!(app.reader.calls(), 2);
    }

    #[tokio::test]
    async fn claim_leaves_view_alone_when_refresh_disabled() {
        let mut config = Config::for_tests();
        config.refresh_after_claim = false;
        let app = test_app(
            MockIdentity::address(USER),
            loaded_reader(),
            MockOracle::new().with_battle("B1", "ended", "1"),
            config,
        );
        app.state.view.load().await;

        let Json(response) = submit_claim(State(app.state.clone()), body("B1", "1")).await.unwrap();
        assert!(!response.data.refreshed);
        assert_eq!(app.reader.calls(), 1);
    }

    #[tokio::test]
    async fn claim_without_wallet_is_rejected() {
        let app = test_app(
            MockIdentity::none(),
            MockReader::rows(vec![]),
            MockOracle::new(),
            Config::for_tests(),
        );
        app.state.view.load().await;
        let mut toasts = app.state.notifications.subscribe();

        let result = submit_claim(State(app.state.clone()), body("B1", "1")).await;
        assert!(matches!(result, Err(AppError::WalletUnavailable(_))));
        assert_eq!(app.writer.calls(), 0);
        assert!(toasts.try_recv().is_ok());
        assert!(toasts.try_recv().is_err());
    }

    #[tokio::test]
    async fn blank_claim_without_wallet_reports_only_missing_wallet() {
        let app = test_app(
            MockIdentity::none(),
            MockReader::rows(vec![]),
            MockOracle::new(),
            Config::for_tests(),
        );
        app.state.view.load().await;
        let mut toasts = app.state.notifications.subscribe();

        let result = submit_claim(State(app.state.clone()), body("", "")).await;
        assert!(matches!(result, Err(AppError::WalletUnavailable(_))));

        let toast = toasts.try_recv().unwrap();
        assert_eq!(toast.level, NotificationLevel::Error);
        assert_eq!(toast.message, MSG_NO_WALLET);
        assert!(toasts.try_recv().is_err());
        assert_eq!(app.writer.calls(), 0);
    }

    #[tokio::test]
    async fn blank_meme_id_is_reported_as_failed_claim() {
        let app = test_app(
            MockIdentity::address(USER),
            loaded_reader(),
            MockOracle::new().with_battle("B1", "ended", "1"),
            Config::for_tests(),
        );
        app.state.view.load().await;
        let mut toasts = app.state.notifications.subscribe();

        let result = submit_claim(State(app.state.clone()), body("B1", " ")).await;
        assert!(matches!(result, Err(AppError::ClaimSubmission(_))));

        let started = toasts.try_recv().unwrap();
        assert_eq!(started.level, NotificationLevel::Info);
        assert_eq!(started.message, MSG_CLAIM_STARTED);
        let failed = toasts.try_recv().unwrap();
        assert_eq!(failed.level, NotificationLevel::Error);
        assert_eq!(failed.message, MSG_CLAIM_FAILED);
        assert!(toasts.try_recv().is_err());
        assert_eq!(app.writer.calls(), 0);
        assert_eq!(app.reader.calls(), 1);
    }

    #[test]
    fn missing_body_fields_deserialize_as_blank() {
        let body: ClaimBody = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(body.battle_id.is_empty());
        assert!(body.meme_id.is_empty());
    }

    #[tokio::test]
    async fn eligibility_reflects_battle_outcome() {
        let app = test_app(
            MockIdentity::address(USER),
            MockReader::rows(vec![]),
            MockOracle::new().with_battle("B1", "ended", "1"),
            Config::for_tests(),
        );

        let params = |meme: &str| {
            Query(EligibilityParams {
                battle_id: "B1".to_string(),
                meme_id: meme.to_string(),
            })
        };

        let Json(winner) = check_eligibility(State(app.state.clone()), params("1")).await.unwrap();
        assert!(winner.data.claimable);
        let Json(loser) = check_eligibility(State(app.state.clone()), params("2")).await.unwrap();
        assert!(!loser.data.claimable);
    }
}
