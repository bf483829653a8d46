use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    constants::HTTP_TIMEOUT_SECS,
    error::{AppError, Result},
};

/// Off-platform source of battle outcomes.
#[async_trait]
pub trait BattleOracle: Send + Sync {
    async fn battle_status(&self, battle_id: &str) -> Result<String>;
    async fn winning_entry(&self, battle_id: &str) -> Result<String>;
}

fn battle_field_url(base_url: &str, battle_id: &str, field: &str) -> Result<url::Url> {
    let mut url = url::Url::parse(base_url)
        .map_err(|e| AppError::Internal(format!("Invalid oracle URL: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| AppError::Internal("Oracle URL cannot carry a path".to_string()))?
        .pop_if_empty()
        .extend(&["battles", battle_id, &format!("{}.json", field)]);
    Ok(url)
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Realtime-database style REST oracle: `GET {base}/battles/{id}/{field}.json`.
pub struct HttpBattleOracle {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBattleOracle {
    pub fn new(base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("HTTP client error: {}", e)))?;
        Ok(Self { base_url, client })
    }

    async fn fetch_field(&self, battle_id: &str, field: &str) -> Result<String> {
        let url = battle_field_url(&self.base_url, battle_id, field)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::OracleFailure(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::OracleFailure(format!(
                "Oracle returned {} for {} of battle {}",
                response.status(),
                field,
                battle_id
            )));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| AppError::OracleFailure(e.to_string()))?;

        value_to_text(&value).ok_or_else(|| {
            AppError::OracleFailure(format!("No {} recorded for battle {}", field, battle_id))
        })
    }
}

#[async_trait]
impl BattleOracle for HttpBattleOracle {
    async fn battle_status(&self, battle_id: &str) -> Result<String> {
        self.fetch_field(battle_id, "status").await
    }

    async fn winning_entry(&self, battle_id: &str) -> Result<String> {
        self.fetch_field(battle_id, "winningMeme").await
    }
}
