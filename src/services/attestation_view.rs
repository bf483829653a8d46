use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ethers::types::Address;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::{
    error::Result,
    indexer::{sign_index_client::schema_query, AttestationReader, DecodedBatch, PayloadDecoder},
    integrations::IdentityProvider,
    models::{AttestationReceipt, AttestationRecord, ClaimabilityMap},
    services::{
        claim_submitter::ClaimSubmitter,
        eligibility::{BattleVerdict, EligibilityEvaluator},
    },
    utils::{address_to_lower_hex, same_address},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewPhase {
    Uninitialized,
    AddressKnown,
    RecordsLoaded,
    Decoded,
    Ready,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewState {
    pub generation: u64,
    pub phase: ViewPhase,
    pub address: Option<Address>,
    pub records: Vec<AttestationRecord>,
    pub decoded: DecodedBatch,
    pub claimable: ClaimabilityMap,
    pub warning: Option<String>,
}

/// One table row; decoded fields are absent when the payload did not decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewRow {
    pub id: String,
    pub battle_id: Option<String>,
    pub meme_id: Option<String>,
    pub bet_amount: Option<String>,
    pub bet_timestamp: Option<String>,
    pub action: Option<String>,
    pub claimable: bool,
}

impl ViewState {
    pub fn uninitialized(generation: u64) -> Self {
        Self {
            generation,
            phase: ViewPhase::Uninitialized,
            address: None,
            records: Vec::new(),
            decoded: DecodedBatch::default(),
            claimable: ClaimabilityMap::new(),
            warning: None,
        }
    }

    pub fn rows(&self) -> Vec<ViewRow> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let decoded = self.decoded.get(index);
                ViewRow {
                    id: record.id.clone(),
                    battle_id: decoded.map(|d| d.battle_id.clone()),
                    meme_id: decoded.map(|d| d.meme_id.clone()),
                    bet_amount: decoded.map(|d| d.bet_amount.clone()),
                    bet_timestamp: decoded.map(|d| d.bet_timestamp.clone()),
                    action: decoded.map(|d| d.action.clone()),
                    claimable: self.claimable.get(&record.id).copied().unwrap_or(false),
                }
            })
            .collect()
    }
}

/// Keep rows attested by `address`, ignoring letter case.
pub fn filter_by_attester(rows: Vec<AttestationRecord>, address: &str) -> Vec<AttestationRecord> {
    rows.into_iter()
        .filter(|row| same_address(&row.attester, address))
        .collect()
}

/// Entries only for records whose payload decoded.
pub fn claimability(
    records: &[AttestationRecord],
    decoded: &DecodedBatch,
    verdicts: &HashMap<String, BattleVerdict>,
) -> ClaimabilityMap {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let entry = decoded.get(index)?;
            let claimable = verdicts
                .get(&entry.battle_id)
                .map(|verdict| verdict.allows(&entry.meme_id))
                .unwrap_or(false);
            Some((record.id.clone(), claimable))
        })
        .collect()
}

/// Pure derivation of the steady view from fetched and evaluated data.
pub fn derive_view(
    generation: u64,
    address: Address,
    records: Vec<AttestationRecord>,
    decoded: DecodedBatch,
    verdicts: &HashMap<String, BattleVerdict>,
) -> ViewState {
    let evaluated = !records.is_empty() && decoded.has_decoded();
    let claimable = if evaluated {
        claimability(&records, &decoded, verdicts)
    } else {
        ClaimabilityMap::new()
    };

    ViewState {
        generation,
        phase: if evaluated { ViewPhase::Ready } else { ViewPhase::Decoded },
        address: Some(address),
        records,
        decoded,
        claimable,
        warning: None,
    }
}

/// Owns the view state of one account: fetch, decode, evaluate, claim.
pub struct AttestationView {
    identity: Arc<dyn IdentityProvider>,
    reader: Arc<dyn AttestationReader>,
    decoder: PayloadDecoder,
    evaluator: EligibilityEvaluator,
    submitter: ClaimSubmitter,
    index_schema_id: String,
    generation: AtomicU64,
    state: RwLock<ViewState>,
}

impl AttestationView {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        reader: Arc<dyn AttestationReader>,
        decoder: PayloadDecoder,
        evaluator: EligibilityEvaluator,
        submitter: ClaimSubmitter,
        index_schema_id: String,
    ) -> Self {
        Self {
            identity,
            reader,
            decoder,
            evaluator,
            submitter,
            index_schema_id,
            generation: AtomicU64::new(0),
            state: RwLock::new(ViewState::uninitialized(0)),
        }
    }

    pub async fn snapshot(&self) -> ViewState {
        self.state.read().await.clone()
    }

    /// Run one full fetch/decode/evaluate pass. Results of a pass that was
    /// overtaken by a newer `load` are discarded.
    pub async fn load(&self) -> ViewState {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("Loading attestation view (generation {})", generation);

        let address = match self.identity.active_address().await {
            Ok(Some(address)) => address,
            Ok(None) => {
                tracing::warn!("No wallet available; view stays uninitialized");
                return self.publish(ViewState::uninitialized(generation)).await;
            }
            Err(e) => {
                tracing::warn!("Wallet resolution failed: {}", e);
                return self.publish(ViewState::uninitialized(generation)).await;
            }
        };

        let mut progress = ViewState::uninitialized(generation);
        progress.phase = ViewPhase::AddressKnown;
        progress.address = Some(address);
        self.publish(progress.clone()).await;

        let query = schema_query(&self.index_schema_id);
        let (rows, warning) = match self.reader.query_records(&query).await {
            Ok(page) => (page.rows, None),
            Err(e) => {
                tracing::warn!("Attestation query failed, showing no records: {}", e);
                (Vec::new(), Some(e.to_string()))
            }
        };

        let records = filter_by_attester(rows, &address_to_lower_hex(&address));
        tracing::info!(
            "Loaded {} attestations for {}",
            records.len(),
            address_to_lower_hex(&address)
        );
        progress.phase = ViewPhase::RecordsLoaded;
        progress.records = records.clone();
        progress.warning = warning.clone();
        self.publish(progress.clone()).await;

        let decoded = self.decoder.decode_batch(&records);
        tracing::debug!(
            "Decoded {} of {} attestations",
            decoded.decoded_count(),
            decoded.len()
        );
        progress.phase = ViewPhase::Decoded;
        progress.decoded = decoded.clone();
        self.publish(progress).await;

        let verdicts = if !records.is_empty() && decoded.has_decoded() {
            self.evaluator
                .evaluate_battles(decoded.iter().flatten().map(|entry| entry.battle_id.as_str()))
                .await
        } else {
            HashMap::new()
        };

        let mut view = derive_view(generation, address, records, decoded, &verdicts);
        view.warning = warning;
        self.publish(view).await
    }

    async fn publish(&self, next: ViewState) -> ViewState {
        let mut state = self.state.write().await;
        let latest = self.generation.load(Ordering::SeqCst);
        if next.generation != latest || next.generation < state.generation {
            tracing::debug!(
                "Discarding stale view generation {} (latest {})",
                next.generation,
                latest
            );
            return state.clone();
        }
        *state = next;
        state.clone()
    }

    /// Single-entry eligibility check outside a load pass.
    pub async fn can_claim(&self, battle_id: &str, entry_id: &str) -> bool {
        self.evaluator.can_claim(battle_id, entry_id).await
    }

    /// Claim winnings for the account the view was loaded for. The view is
    /// left untouched; callers decide whether to `load` again.
    pub async fn claim(&self, battle_id: &str, entry_id: &str) -> Result<AttestationReceipt> {
        let address = self.state.read().await.address;
        self.submitter.submit_claim(address, battle_id, entry_id).await
    }
}
