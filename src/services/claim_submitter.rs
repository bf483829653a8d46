use std::sync::Arc;

use ethers::types::{Address, TxHash, U256};

use crate::{
    constants::{ACTION_CLAIM, MSG_CLAIM_FAILED, MSG_CLAIM_STARTED, MSG_CLAIM_SUCCEEDED, MSG_NO_WALLET},
    error::{AppError, Result},
    integrations::{AttestationWriter, TxHashHook},
    models::{AttestationReceipt, AttestationRequest, ClaimRequest},
    services::Notifier,
    utils::address_to_lower_hex,
};

pub struct ClaimSubmitter {
    writer: Arc<dyn AttestationWriter>,
    notifier: Arc<dyn Notifier>,
    schema_id: String,
}

impl ClaimSubmitter {
    pub fn new(
        writer: Arc<dyn AttestationWriter>,
        notifier: Arc<dyn Notifier>,
        schema_id: String,
    ) -> Self {
        Self {
            writer,
            notifier,
            schema_id,
        }
    }

    pub fn build_request(
        user: Address,
        battle_id: &str,
        entry_id: &str,
        now_unix: u64,
    ) -> Result<ClaimRequest> {
        if battle_id.trim().is_empty() {
            return Err(AppError::BadRequest("Missing battle id".to_string()));
        }
        if entry_id.trim().is_empty() {
            return Err(AppError::BadRequest("Missing meme id".to_string()));
        }
        let meme_id = U256::from_dec_str(entry_id.trim())
            .map_err(|e| AppError::BadRequest(format!("Invalid meme id {}: {}", entry_id, e)))?;

        Ok(ClaimRequest {
            user,
            battle_id: battle_id.to_string(),
            meme_id,
            bet_amount: U256::zero(),
            bet_timestamp: U256::from(now_unix),
            win_amount: U256::zero(),
            action: ACTION_CLAIM.to_string(),
        })
    }

    /// Publish a claim attestation for `entry_id` in `battle_id`.
    pub async fn submit_claim(
        &self,
        address: Option<Address>,
        battle_id: &str,
        entry_id: &str,
    ) -> Result<AttestationReceipt> {
        let Some(user) = address else {
            tracing::error!("No wallet connected");
            self.notifier.error(MSG_NO_WALLET);
            return Err(AppError::WalletUnavailable("No wallet connected".to_string()));
        };

        self.notifier.info(MSG_CLAIM_STARTED);

        match self.send(user, battle_id, entry_id).await {
            Ok(receipt) => {
                tracing::info!(
                    "Claim attestation created for battle {} meme {}: {:?}",
                    battle_id,
                    entry_id,
                    receipt.tx_hash
                );
                self.notifier.success(MSG_CLAIM_SUCCEEDED);
                Ok(receipt)
            }
            Err(e) => {
                tracing::error!("Error creating claim attestation: {}", e);
                self.notifier.error(MSG_CLAIM_FAILED);
                Err(AppError::ClaimSubmission(e.to_string()))
            }
        }
    }

    async fn send(&self, user: Address, battle_id: &str, entry_id: &str) -> Result<AttestationReceipt> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let claim = Self::build_request(user, battle_id, entry_id, now)?;

        let request = AttestationRequest {
            schema_id: self.schema_id.clone(),
            data: claim.to_tokens(),
            indexing_value: address_to_lower_hex(&user),
            resolver_fee: U256::zero(),
        };

        let log_hash: &TxHashHook = &|tx_hash: TxHash| {
            tracing::info!("Transaction hash: {:?}", tx_hash);
        };
        self.writer.create_attestation(&request, Some(log_hash)).await
    }
}
