use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod constants;
mod error;
mod indexer;
mod integrations;
mod models;
mod services;
#[cfg(test)]
mod testing;
mod utils;
mod websocket;

use config::Config;
use constants::API_VERSION;
use indexer::{PayloadDecoder, SignIndexClient};
use integrations::{
    sign_protocol::DisabledWriter, wallet::wallet_from_private_key, AttestationWriter,
    HttpBattleOracle, LocalWalletIdentity, SignProtocolWriter,
};
use services::{AttestationView, ClaimSubmitter, EligibilityEvaluator, NotificationService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "battle_claims=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting battle claims backend");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("API Version: {}", API_VERSION);
    tracing::info!("Testnet: {}", config.is_testnet());

    let wallet = config
        .wallet_private_key
        .as_deref()
        .map(|key| wallet_from_private_key(key, config.chain_id))
        .transpose()?;

    let writer: Arc<dyn AttestationWriter> = match wallet.clone() {
        Some(wallet) => Arc::new(SignProtocolWriter::new(
            &config.arbitrum_rpc_url,
            &config.sign_protocol_address,
            wallet,
        )?),
        None => Arc::new(DisabledWriter),
    };

    let display_offset = chrono::FixedOffset::east_opt(config.display_utc_offset_minutes * 60)
        .ok_or_else(|| anyhow::anyhow!("Invalid display offset"))?;

    let notifications = NotificationService::new();
    let view = AttestationView::new(
        Arc::new(LocalWalletIdentity::new(wallet)),
        Arc::new(SignIndexClient::new(config.sign_index_url.clone())?),
        PayloadDecoder::new(display_offset),
        EligibilityEvaluator::new(Arc::new(HttpBattleOracle::new(
            config.battle_oracle_url.clone(),
        )?)),
        ClaimSubmitter::new(
            writer,
            Arc::new(notifications.clone()),
            config.attestation_schema_id.clone(),
        ),
        config.index_schema_id.clone(),
    );
    let view = Arc::new(view);

    // Initial load, same as a fresh mount
    let initial = view.load().await;
    tracing::info!(
        "Initial view: phase {:?}, {} records",
        initial.phase,
        initial.records.len()
    );

    let app_state = api::AppState::new(view, notifications, config.clone());
    let app = build_router(app_state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: api::AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins());

    Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Attestation table
        .route("/api/v1/attestations", get(api::attestations::get_attestations))
        .route(
            "/api/v1/attestations/refresh",
            post(api::attestations::refresh_attestations),
        )
        // Claims
        .route("/api/v1/claims", post(api::claims::submit_claim))
        .route(
            "/api/v1/claims/eligibility",
            get(api::claims::check_eligibility),
        )
        // WebSocket endpoints
        .route("/ws/notifications", get(websocket::notifications::handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return CorsLayer::very_permissive();
    }
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
