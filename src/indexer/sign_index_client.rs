use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    constants::{ATTESTATION_MODE_ONCHAIN, HTTP_TIMEOUT_SECS},
    error::{AppError, Result},
    models::{AttestationPage, AttestationQuery},
};

/// Read path of the attestation index.
#[async_trait]
pub trait AttestationReader: Send + Sync {
    async fn query_records(&self, query: &AttestationQuery) -> Result<AttestationPage>;
}

/// First page of every attestation under `schema_id`, unfiltered by attester.
pub fn schema_query(schema_id: &str) -> AttestationQuery {
    AttestationQuery {
        id: String::new(),
        schema_id: schema_id.to_string(),
        attester: String::new(),
        page: 1,
        mode: ATTESTATION_MODE_ONCHAIN.to_string(),
        indexing_value: String::new(),
    }
}

fn attestation_list_url(base_url: &str, query: &AttestationQuery) -> Result<url::Url> {
    let mut url = url::Url::parse(&format!(
        "{}/index/attestations",
        base_url.trim_end_matches('/')
    ))
    .map_err(|e| AppError::Internal(format!("Invalid index URL: {}", e)))?;

    url.query_pairs_mut()
        .append_pair("id", &query.id)
        .append_pair("schemaId", &query.schema_id)
        .append_pair("attester", &query.attester)
        .append_pair("page", &query.page.to_string())
        .append_pair("mode", &query.mode)
        .append_pair("indexingValue", &query.indexing_value);
    Ok(url)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexResponse<T> {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

fn unwrap_response(response: IndexResponse<AttestationPage>) -> Result<AttestationPage> {
    if !response.success {
        return Err(AppError::QueryFailure(
            response
                .message
                .unwrap_or_else(|| "Index service rejected the query".to_string()),
        ));
    }
    Ok(response.data.unwrap_or_default())
}

/// Sign Protocol index REST client
pub struct SignIndexClient {
    base_url: String,
    client: reqwest::Client,
}

impl SignIndexClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("HTTP client error: {}", e)))?;
        Ok(Self { base_url, client })
    }
}

#[async_trait]
impl AttestationReader for SignIndexClient {
    async fn query_records(&self, query: &AttestationQuery) -> Result<AttestationPage> {
        let url = attestation_list_url(&self.base_url, query)?;
        tracing::debug!("Querying attestation index: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::QueryFailure(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::QueryFailure(format!(
                "Index service returned {}",
                response.status()
            )));
        }

        let body: IndexResponse<AttestationPage> = response
            .json()
            .await
            .map_err(|e| AppError::QueryFailure(e.to_string()))?;

        let page = unwrap_response(body)?;
        tracing::debug!("Index returned {} rows (total {})", page.rows.len(), page.total);
        Ok(page)
    }
}
