// Test doubles for the injected collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;
use ethers::abi::{self, Token};
use ethers::types::{Address, TxHash, H256, U256};

use crate::{
    error::{AppError, Result},
    indexer::AttestationReader,
    integrations::{AttestationWriter, BattleOracle, IdentityProvider, TxHashHook},
    models::{
        AttestationPage, AttestationQuery, AttestationReceipt, AttestationRecord,
        AttestationRequest, Notification, NotificationLevel, SchemaDescriptor,
    },
    services::Notifier,
};

/// Unprefixed hex payload in bet schema layout.
pub fn bet_payload(battle_id: &str, meme_id: u64, bet_amount_wei: &str, timestamp: u64, action: &str) -> String {
    let tokens = vec![
        Token::Address(Address::zero()),
        Token::String(battle_id.to_string()),
        Token::Uint(U256::from(meme_id)),
        Token::Uint(U256::from_dec_str(bet_amount_wei).expect("test amount")),
        Token::Uint(U256::from(timestamp)),
        Token::Uint(U256::zero()),
        Token::String(action.to_string()),
    ];
    hex::encode(abi::encode(&tokens))
}

pub fn bet_record(
    id: &str,
    attester: &str,
    battle_id: &str,
    meme_id: u64,
    bet_amount_wei: &str,
    timestamp: u64,
    action: &str,
) -> AttestationRecord {
    AttestationRecord {
        id: id.to_string(),
        attester: attester.to_string(),
        data: Some(format!(
            "0x{}",
            bet_payload(battle_id, meme_id, bet_amount_wei, timestamp, action)
        )),
        schema: SchemaDescriptor::bet_schema(),
    }
}

pub struct MockIdentity {
    address: Option<Address>,
    fail: bool,
}

impl MockIdentity {
    pub fn address(address: &str) -> Self {
        Self {
            address: Some(address.parse().expect("test address")),
            fail: false,
        }
    }

    pub fn none() -> Self {
        Self {
            address: None,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            address: None,
            fail: true,
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentity {
    async fn active_address(&self) -> Result<Option<Address>> {
        if self.fail {
            return Err(AppError::WalletUnavailable("provider rejected".to_string()));
        }
        Ok(self.address)
    }
}

pub struct MockReader {
    rows: Vec<AttestationRecord>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockReader {
    pub fn rows(rows: Vec<AttestationRecord>) -> Self {
        Self {
            rows,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            rows: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AttestationReader for MockReader {
    async fn query_records(&self, _query: &AttestationQuery) -> Result<AttestationPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::QueryFailure("index unavailable".to_string()));
        }
        Ok(page_of(&self.rows))
    }
}

fn page_of(rows: &[AttestationRecord]) -> AttestationPage {
    AttestationPage {
        rows: rows.to_vec(),
        total: rows.len() as u64,
        page: 1,
        size: 100,
    }
}

/// First query parks until `release`; later queries answer at once.
pub struct GatedReader {
    first: Vec<AttestationRecord>,
    rest: Vec<AttestationRecord>,
    gate: Notify,
    calls: AtomicUsize,
}

impl GatedReader {
    pub fn new(first: Vec<AttestationRecord>, rest: Vec<AttestationRecord>) -> Self {
        Self {
            first,
            rest,
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AttestationReader for GatedReader {
    async fn query_records(&self, _query: &AttestationQuery) -> Result<AttestationPage> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.gate.notified().await;
            return Ok(page_of(&self.first));
        }
        Ok(page_of(&self.rest))
    }
}

#[derive(Default)]
pub struct MockOracle {
    battles: HashMap<String, (String, String)>,
    fail_winner: bool,
    status_calls: AtomicUsize,
    winner_calls: AtomicUsize,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_battle(mut self, battle_id: &str, status: &str, winner: &str) -> Self {
        self.battles
            .insert(battle_id.to_string(), (status.to_string(), winner.to_string()));
        self
    }

    pub fn failing_winner(mut self) -> Self {
        self.fail_winner = true;
        self
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn winner_calls(&self) -> usize {
        self.winner_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BattleOracle for MockOracle {
    async fn battle_status(&self, battle_id: &str) -> Result<String> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.battles
            .get(battle_id)
            .map(|(status, _)| status.clone())
            .ok_or_else(|| AppError::OracleFailure(format!("unknown battle {}", battle_id)))
    }

    async fn winning_entry(&self, battle_id: &str) -> Result<String> {
        self.winner_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_winner {
            return Err(AppError::OracleFailure("winner lookup failed".to_string()));
        }
        self.battles
            .get(battle_id)
            .map(|(_, winner)| winner.clone())
            .ok_or_else(|| AppError::OracleFailure(format!("unknown battle {}", battle_id)))
    }
}

pub struct MockWriter {
    fail: bool,
    calls: AtomicUsize,
    hooks_fired: AtomicUsize,
    last_request: Mutex<Option<AttestationRequest>>,
}

impl MockWriter {
    pub const TX_HASH: TxHash = H256([0x42; 32]);

    pub fn succeeding() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
            hooks_fired: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::succeeding()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn hooks_fired(&self) -> usize {
        self.hooks_fired.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<AttestationRequest> {
        self.last_request.lock().expect("writer lock").clone()
    }
}

#[async_trait]
impl AttestationWriter for MockWriter {
    async fn create_attestation(
        &self,
        request: &AttestationRequest,
        on_tx_hash: Option<&TxHashHook>,
    ) -> Result<AttestationReceipt> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().expect("writer lock") = Some(request.clone());
        if self.fail {
            return Err(AppError::BlockchainRPC("execution reverted".to_string()));
        }
        if let Some(hook) = on_tx_hash {
            self.hooks_fired.fetch_add(1, Ordering::SeqCst);
            hook(Self::TX_HASH);
        }
        Ok(AttestationReceipt {
            tx_hash: Self::TX_HASH,
            block_number: Some(1),
        })
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn levels(&self) -> Vec<NotificationLevel> {
        self.seen.lock().expect("notifier lock").iter().map(|n| n.level).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.seen
            .lock()
            .expect("notifier lock")
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().expect("notifier lock").push(notification);
    }
}
