use serde::Deserialize;
use std::env;

use crate::constants::{
    ARBITRUM_SEPOLIA_CHAIN_ID, ATTESTATION_SCHEMA_ID, INDEX_SCHEMA_ID, SIGN_INDEX_TESTNET_URL,
    SIGN_PROTOCOL_ARBITRUM_SEPOLIA,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Sign Protocol
    pub sign_index_url: String,
    pub index_schema_id: String,
    pub attestation_schema_id: String,
    pub sign_protocol_address: String,

    // Blockchain
    pub arbitrum_rpc_url: String,
    pub chain_id: u64,

    // Wallet
    pub wallet_private_key: Option<String>,

    // Battle oracle
    pub battle_oracle_url: String,

    // Behaviour
    pub refresh_after_claim: bool,
    pub display_utc_offset_minutes: i32,

    // CORS
    pub cors_allowed_origins: String,
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| {
            let normalized = v.trim().to_ascii_lowercase();
            normalized == "1" || normalized == "true" || normalized == "yes" || normalized == "on"
        })
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            sign_index_url: env::var("SIGN_INDEX_URL")
                .unwrap_or_else(|_| SIGN_INDEX_TESTNET_URL.to_string()),
            index_schema_id: env::var("INDEX_SCHEMA_ID")
                .unwrap_or_else(|_| INDEX_SCHEMA_ID.to_string()),
            attestation_schema_id: env::var("ATTESTATION_SCHEMA_ID")
                .unwrap_or_else(|_| ATTESTATION_SCHEMA_ID.to_string()),
            sign_protocol_address: env::var("SIGN_PROTOCOL_ADDRESS")
                .unwrap_or_else(|_| SIGN_PROTOCOL_ARBITRUM_SEPOLIA.to_string()),

            arbitrum_rpc_url: env::var("ARBITRUM_RPC_URL")?,
            chain_id: env::var("CHAIN_ID")
                .unwrap_or_else(|_| ARBITRUM_SEPOLIA_CHAIN_ID.to_string())
                .parse()?,

            wallet_private_key: env::var("WALLET_PRIVATE_KEY").ok(),

            battle_oracle_url: env::var("BATTLE_ORACLE_URL")?,

            refresh_after_claim: env_flag("REFRESH_AFTER_CLAIM", true),
            display_utc_offset_minutes: env::var("DISPLAY_UTC_OFFSET_MINUTES")
                .unwrap_or_else(|_| "0".to_string())
                .parse()?,

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.arbitrum_rpc_url.trim().is_empty() {
            anyhow::bail!("ARBITRUM_RPC_URL is empty");
        }
        if self.battle_oracle_url.trim().is_empty() {
            anyhow::bail!("BATTLE_ORACLE_URL is empty");
        }
        url::Url::parse(&self.sign_index_url)
            .map_err(|e| anyhow::anyhow!("SIGN_INDEX_URL is invalid: {}", e))?;
        url::Url::parse(&self.battle_oracle_url)
            .map_err(|e| anyhow::anyhow!("BATTLE_ORACLE_URL is invalid: {}", e))?;
        if self.index_schema_id.trim().is_empty() || self.attestation_schema_id.trim().is_empty() {
            anyhow::bail!("Schema identifiers must not be empty");
        }
        if self.display_utc_offset_minutes.abs() >= 24 * 60 {
            anyhow::bail!("DISPLAY_UTC_OFFSET_MINUTES must be within one day");
        }

        if self.wallet_private_key.is_none() {
            tracing::warn!("WALLET_PRIVATE_KEY not set; the view stays uninitialized and claims are rejected");
        }
        if !self.index_schema_id.ends_with(&self.attestation_schema_id) {
            tracing::warn!(
                "Index schema {} does not match attestation schema {}",
                self.index_schema_id,
                self.attestation_schema_id
            );
        }
        if self.cors_allowed_origins.trim().is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; requests may be blocked");
        }

        Ok(())
    }

    /// Explicit CORS origins; empty means any origin.
    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty() && *origin != "*")
            .map(str::to_string)
            .collect()
    }

    pub fn is_testnet(&self) -> bool {
        if self.environment == "development" || self.environment == "testnet" {
            return true;
        }
        self.chain_id == ARBITRUM_SEPOLIA_CHAIN_ID
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 3000,
            environment: "development".to_string(),
            sign_index_url: SIGN_INDEX_TESTNET_URL.to_string(),
            index_schema_id: INDEX_SCHEMA_ID.to_string(),
            attestation_schema_id: ATTESTATION_SCHEMA_ID.to_string(),
            sign_protocol_address: SIGN_PROTOCOL_ARBITRUM_SEPOLIA.to_string(),
            arbitrum_rpc_url: "http://localhost:8545".to_string(),
            chain_id: ARBITRUM_SEPOLIA_CHAIN_ID,
            wallet_private_key: None,
            battle_oracle_url: "http://localhost:9000".to_string(),
            refresh_after_claim: true,
            display_utc_offset_minutes: 0,
            cors_allowed_origins: "*".to_string(),
        }
    }
}
