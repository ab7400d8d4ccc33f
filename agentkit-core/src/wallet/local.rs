use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{Wallet, WalletConfig, WalletError, WalletProvider};

/// Exported form of a local wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletData {
    pub wallet_id: String,
    pub seed: String,
    pub network_id: String,
    pub default_address_id: String,
}

/// Development wallet kept entirely on this machine.
///
/// It holds a random seed and a generated default address. It never signs or
/// broadcasts transactions.
#[derive(Debug)]
pub struct LocalWallet {
    data: WalletData,
}

impl LocalWallet {
    fn generate(network_id: &str) -> Self {
        Self {
            data: WalletData {
                wallet_id: Uuid::new_v4().to_string(),
                seed: random_hex(32),
                network_id: network_id.to_string(),
                default_address_id: format!("0x{}", random_hex(20)),
            },
        }
    }
}

fn random_hex(bytes: usize) -> String {
    (0..bytes).map(|_| format!("{:02x}", fastrand::u8(..))).collect()
}

#[async_trait]
impl Wallet for LocalWallet {
    fn wallet_id(&self) -> &str {
        &self.data.wallet_id
    }

    fn network_id(&self) -> &str {
        &self.data.network_id
    }

    fn default_address(&self) -> &str {
        &self.data.default_address_id
    }

    async fn export_credential(&self) -> Result<String, WalletError> {
        Ok(serde_json::to_string(&self.data)?)
    }
}

pub struct LocalWalletProvider {
    config: WalletConfig,
}

impl LocalWalletProvider {
    pub fn new(config: WalletConfig) -> Self {
        Self { config }
    }

    fn check_credentials(&self) -> Result<(), WalletError> {
        if self.config.api_key_name.trim().is_empty() {
            return Err(WalletError::InvalidCredentials("API key name is empty".to_string()));
        }
        if self.config.api_key_private_key.trim().is_empty() {
            return Err(WalletError::InvalidCredentials("API private key is empty".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl WalletProvider for LocalWalletProvider {
    async fn configure_with_credential(&self, credential: Option<String>) -> Result<Arc<dyn Wallet>, WalletError> {
        self.check_credentials()?;

        let wallet = match credential {
            Some(blob) => {
                let data: WalletData = serde_json::from_str(&blob)?;
                info!("Restored wallet {} on {}", data.wallet_id, data.network_id);
                LocalWallet { data }
            }
            None => {
                let wallet = LocalWallet::generate(&self.config.network_id);
                info!("Created wallet {} on {}", wallet.data.wallet_id, wallet.data.network_id);
                wallet
            }
        };

        Ok(Arc::new(wallet))
    }
}
