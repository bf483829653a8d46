use async_trait::async_trait;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;

use crate::error::{AppError, Result};

/// Supplies the account the view and claims act for.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` when no wallet is configured.
    async fn active_address(&self) -> Result<Option<Address>>;
}

pub fn wallet_from_private_key(private_key: &str, chain_id: u64) -> Result<LocalWallet> {
    let wallet = private_key
        .trim()
        .parse::<LocalWallet>()
        .map_err(|e| AppError::WalletUnavailable(format!("Invalid wallet key: {}", e)))?;
    Ok(wallet.with_chain_id(chain_id))
}

/// Identity backed by a locally held signing key.
#[derive(Debug, Clone)]
pub struct LocalWalletIdentity {
    wallet: Option<LocalWallet>,
}

impl LocalWalletIdentity {
    pub fn new(wallet: Option<LocalWallet>) -> Self {
        Self { wallet }
    }
}

#[async_trait]
impl IdentityProvider for LocalWalletIdentity {
    async fn active_address(&self) -> Result<Option<Address>> {
        Ok(self.wallet.as_ref().map(|wallet| wallet.address()))
    }
}
