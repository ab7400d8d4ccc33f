//! Identity subsystem: the wallet the agent acts as, the credential that lets it
//! be restored across restarts, and the tools it exposes to the model.

mod local;
mod toolkit;

pub use local::{LocalWallet, LocalWalletProvider, WalletData};
pub use toolkit::{GetWalletDetails, WalletToolkit};

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub const DEFAULT_NETWORK_ID: &str = "base-sepolia";

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("invalid wallet API credentials: {0}")]
    InvalidCredentials(String),

    #[error("stored wallet data is corrupt: {0}")]
    CorruptCredential(#[from] serde_json::Error),
}

/// Key material and network used to configure wallets
#[derive(Clone)]
pub struct WalletConfig {
    pub api_key_name: String,
    pub api_key_private_key: String,
    pub network_id: String,
}

impl WalletConfig {
    pub fn new(api_key_name: impl Into<String>, api_key_private_key: impl Into<String>) -> Self {
        Self {
            api_key_name: api_key_name.into(),
            api_key_private_key: api_key_private_key.into(),
            network_id: DEFAULT_NETWORK_ID.to_string(),
        }
    }

    pub fn with_network_id(mut self, network_id: impl Into<String>) -> Self {
        self.network_id = network_id.into();
        self
    }
}

impl std::fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletConfig")
            .field("api_key_name", &self.api_key_name)
            .field("network_id", &self.network_id)
            .finish_non_exhaustive()
    }
}

/// A configured wallet the agent acts as
#[async_trait]
pub trait Wallet: Send + Sync {
    fn wallet_id(&self) -> &str;

    fn network_id(&self) -> &str;

    fn default_address(&self) -> &str;

    /// Opaque credential that restores this wallet when handed back to the provider
    async fn export_credential(&self) -> Result<String, WalletError>;
}

/// Creates wallets, either fresh or restored from an exported credential
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn configure_with_credential(&self, credential: Option<String>) -> Result<Arc<dyn Wallet>, WalletError>;
}
