use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use super::Wallet;
use crate::tools::{Tool, ToolError, ToolSet};

/// Turns a configured wallet into the tools the agent can call
pub struct WalletToolkit {
    wallet: Arc<dyn Wallet>,
}

impl WalletToolkit {
    pub fn new(wallet: Arc<dyn Wallet>) -> Self {
        Self { wallet }
    }

    pub fn tools(&self) -> ToolSet {
        ToolSet::new().with(Arc::new(GetWalletDetails {
            wallet: self.wallet.clone(),
        }))
    }
}

/// This tool takes no input
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetWalletDetailsInput {}

pub struct GetWalletDetails {
    wallet: Arc<dyn Wallet>,
}

#[async_trait]
impl Tool for GetWalletDetails {
    fn name(&self) -> &str {
        "get_wallet_details"
    }

    fn description(&self) -> &str {
        "This tool will get details about the MPC Wallet."
    }

    fn parameters(&self) -> Value {
        serde_json::to_value(schemars::schema_for!(GetWalletDetailsInput))
            .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
    }

    async fn execute(&self, args: Value) -> Result<String, ToolError> {
        let _: GetWalletDetailsInput =
            serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
        Ok(format!(
            "Wallet: {} on network: {} with default address: {}",
            self.wallet.wallet_id(),
            self.wallet.network_id(),
            self.wallet.default_address()
        ))
    }
}
