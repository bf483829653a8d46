use chrono::{DateTime, Utc};
use ethers::abi::Token;
use ethers::types::{Address, TxHash, U256};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

// ==================== SCHEMA ====================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

#[cfg(test)]
impl SchemaField {
    pub fn new(name: &str, field_type: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: field_type.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<SchemaField>,
}

#[cfg(test)]
impl SchemaDescriptor {
    /// Field layout of the bet/claim schema.
    pub fn bet_schema() -> Self {
        Self {
            data: vec![
                SchemaField::new("user", "address"),
                SchemaField::new("battleId", "string"),
                SchemaField::new("meme_id", "uint256"),
                SchemaField::new("bet_amount", "uint256"),
                SchemaField::new("bet_timestamp", "uint256"),
                SchemaField::new("win_amount", "uint256"),
                SchemaField::new("action", "string"),
            ],
        }
    }
}

// ==================== ATTESTATION ====================
/// A row as returned by the attestation index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationRecord {
    pub id: String,
    pub attester: String,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub schema: SchemaDescriptor,
}

/// Index rows sometimes carry explicit nulls; treat them as absent.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedRecord {
    pub battle_id: String,
    pub meme_id: String,
    pub bet_amount: String,
    pub bet_timestamp: String,
    pub action: String,
}

/// Attestation id -> whether its owner can claim right now.
pub type ClaimabilityMap = HashMap<String, bool>;

// ==================== QUERY ====================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationQuery {
    pub id: String,
    pub schema_id: String,
    pub attester: String,
    pub page: u32,
    pub mode: String,
    pub indexing_value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttestationPage {
    #[serde(default)]
    pub rows: Vec<AttestationRecord>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
}

// ==================== CLAIM ====================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRequest {
    pub user: Address,
    pub battle_id: String,
    pub meme_id: U256,
    pub bet_amount: U256,
    pub bet_timestamp: U256,
    pub win_amount: U256,
    pub action: String,
}

impl ClaimRequest {
    /// ABI tokens in bet schema order.
    pub fn to_tokens(&self) -> Vec<Token> {
        vec![
            Token::Address(self.user),
            Token::String(self.battle_id.clone()),
            Token::Uint(self.meme_id),
            Token::Uint(self.bet_amount),
            Token::Uint(self.bet_timestamp),
            Token::Uint(self.win_amount),
            Token::String(self.action.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttestationRequest {
    pub schema_id: String,
    pub data: Vec<Token>,
    pub indexing_value: String,
    pub resolver_fee: U256,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttestationReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}

// ==================== NOTIFICATION ====================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: &str) -> Self {
        Self {
            level,
            message: message.to_string(),
            created_at: Utc::now(),
        }
    }
}
