use chrono::{FixedOffset, Offset, TimeZone, Utc};
use ethers::abi::{self, HumanReadableParser, ParamType, Token};
use ethers::types::U256;
use serde::Serialize;

use crate::{
    constants::{FIELD_ACTION, FIELD_BATTLE_ID, FIELD_BET_AMOUNT, FIELD_BET_TIMESTAMP, FIELD_MEME_ID},
    error::{AppError, Result},
    models::{AttestationRecord, DecodedRecord, SchemaDescriptor},
    utils::{address_to_lower_hex, format_ether_display, strip_hex_prefix, with_hex_prefix},
};

const DISPLAY_TIME_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Decodes ABI payloads of bet/claim attestations into display records.
#[derive(Debug, Clone)]
pub struct PayloadDecoder {
    display_offset: FixedOffset,
}

/// Decoder output aligned with the input records: slot `i` belongs to record
/// `i` and is `None` when that record could not be decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodedBatch {
    entries: Vec<Option<DecodedRecord>>,
}

impl DecodedBatch {
    pub fn from_entries(entries: Vec<Option<DecodedRecord>>) -> Self {
        Self { entries }
    }

    pub fn get(&self, index: usize) -> Option<&DecodedRecord> {
        self.entries.get(index).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn decoded_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    pub fn has_decoded(&self) -> bool {
        self.entries.iter().any(Option::is_some)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&DecodedRecord>> {
        self.entries.iter().map(Option::as_ref)
    }
}

impl PayloadDecoder {
    pub fn new(display_offset: FixedOffset) -> Self {
        Self { display_offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Resolve the schema's type strings into ABI parameter types.
    pub fn param_types(schema: &SchemaDescriptor) -> Result<Vec<ParamType>> {
        if schema.data.is_empty() {
            return Err(AppError::DecodeFailure("Schema has no fields".to_string()));
        }
        schema
            .data
            .iter()
            .map(|field| {
                HumanReadableParser::parse_type(&field.field_type).map_err(|e| {
                    AppError::DecodeFailure(format!(
                        "Unsupported type {} for field {}: {}",
                        field.field_type, field.name, e
                    ))
                })
            })
            .collect()
    }

    /// Decode a hex payload, with or without its `0x` marker, into one token
    /// per schema field.
    pub fn decode(&self, schema: &SchemaDescriptor, payload: &str) -> Result<Vec<Token>> {
        let types = Self::param_types(schema)?;
        let normalized = with_hex_prefix(payload.trim());
        let bytes = hex::decode(strip_hex_prefix(&normalized))
            .map_err(|e| AppError::DecodeFailure(format!("Invalid hex payload: {}", e)))?;

        let tokens = abi::decode(&types, &bytes)
            .map_err(|e| AppError::DecodeFailure(format!("ABI decode error: {}", e)))?;
        if tokens.len() != types.len() {
            return Err(AppError::DecodeFailure(format!(
                "Expected {} fields, decoded {}",
                types.len(),
                tokens.len()
            )));
        }
        Ok(tokens)
    }

    /// Map the decoded tuple onto the display record by fixed position.
    pub fn project(&self, tokens: &[Token]) -> Result<DecodedRecord> {
        Ok(DecodedRecord {
            battle_id: token_to_string(field(tokens, FIELD_BATTLE_ID)?),
            meme_id: token_to_string(field(tokens, FIELD_MEME_ID)?),
            bet_amount: format_ether_display(token_to_u256(field(tokens, FIELD_BET_AMOUNT)?)?)?,
            bet_timestamp: self.format_timestamp(token_to_u256(field(tokens, FIELD_BET_TIMESTAMP)?)?)?,
            action: token_to_string(field(tokens, FIELD_ACTION)?),
        })
    }

    pub fn decode_record(&self, record: &AttestationRecord) -> Result<DecodedRecord> {
        let payload = record
            .data
            .as_deref()
            .filter(|data| !strip_hex_prefix(data.trim()).is_empty())
            .ok_or_else(|| AppError::DecodeFailure("Empty payload".to_string()))?;
        let tokens = self.decode(&record.schema, payload)?;
        self.project(&tokens)
    }

    /// Decode every record; a failure only empties that record's slot.
    pub fn decode_batch(&self, records: &[AttestationRecord]) -> DecodedBatch {
        let entries = records
            .iter()
            .map(|record| match self.decode_record(record) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    tracing::warn!("Skipping attestation {}: {}", record.id, e);
                    None
                }
            })
            .collect();
        DecodedBatch::from_entries(entries)
    }

    pub fn format_timestamp(&self, seconds: U256) -> Result<String> {
        if seconds > U256::from(i64::MAX as u64) {
            return Err(AppError::DecodeFailure(format!("Timestamp out of range: {}", seconds)));
        }
        let datetime = self
            .display_offset
            .timestamp_opt(seconds.as_u64() as i64, 0)
            .single()
            .ok_or_else(|| AppError::DecodeFailure(format!("Timestamp out of range: {}", seconds)))?;
        Ok(datetime.format(DISPLAY_TIME_FORMAT).to_string())
    }
}

impl Default for PayloadDecoder {
    fn default() -> Self {
        Self::utc()
    }
}

fn field(tokens: &[Token], index: usize) -> Result<&Token> {
    tokens
        .get(index)
        .ok_or_else(|| AppError::DecodeFailure(format!("Missing field at position {}", index)))
}

fn token_to_string(token: &Token) -> String {
    match token {
        Token::String(value) => value.clone(),
        Token::Uint(value) | Token::Int(value) => value.to_string(),
        Token::Address(address) => address_to_lower_hex(address),
        Token::Bool(value) => value.to_string(),
        Token::Bytes(bytes) | Token::FixedBytes(bytes) => format!("0x{}", hex::encode(bytes)),
        other => other.to_string(),
    }
}

fn token_to_u256(token: &Token) -> Result<U256> {
    match token {
        Token::Uint(value) => Ok(*value),
        other => Err(AppError::DecodeFailure(format!("Expected unsigned integer, got {}", other))),
    }
}
