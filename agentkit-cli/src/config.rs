use std::path::PathBuf;

use agentkit_core::wallet::{WalletConfig, DEFAULT_NETWORK_ID};
use agentkit_core::AgentConfig;
use agentkit_http::ServerConfig;
use agentkit_llm::LlmConfig;
use clap::Parser;

/// On-chain agent served over HTTP with streamed responses
#[derive(Parser, Debug)]
#[command(name = "agentkit", version, about)]
pub struct Cli {
    /// API key for the model endpoint
    #[arg(long, env = "XAI_API_KEY", hide_env_values = true)]
    pub xai_api_key: String,

    /// Wallet API key name
    #[arg(long, env = "CDP_API_KEY_NAME", hide_env_values = true)]
    pub cdp_api_key_name: String,

    /// Wallet API private key
    #[arg(long, env = "CDP_API_KEY_PRIVATE_KEY", hide_env_values = true)]
    pub cdp_api_key_private_key: String,

    /// Network new wallets are created on
    #[arg(long, env = "NETWORK_ID")]
    pub network_id: Option<String>,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// File the exported wallet data is persisted to
    #[arg(long, env = "WALLET_DATA_FILE", default_value = "wallet_data.txt")]
    pub wallet_data_file: PathBuf,

    #[arg(long, env = "LLM_BASE_URL", default_value = agentkit_llm::client::XAI_BASE_URL)]
    pub llm_base_url: String,

    #[arg(long, env = "LLM_MODEL", default_value = agentkit_llm::client::XAI_DEFAULT_MODEL)]
    pub llm_model: String,

    /// Agent and tool steps allowed per prompt
    #[arg(long, env = "AGENT_MAX_STEPS", default_value_t = 25)]
    pub max_steps: usize,
}

impl Cli {
    pub fn server_config(&self) -> ServerConfig {
        let llm = LlmConfig::xai(self.xai_api_key.clone())
            .with_base_url(self.llm_base_url.clone())
            .with_model(self.llm_model.clone());

        let wallet = WalletConfig::new(self.cdp_api_key_name.clone(), self.cdp_api_key_private_key.clone())
            .with_network_id(self.network_id.clone().unwrap_or_else(|| DEFAULT_NETWORK_ID.to_string()));

        let agent = AgentConfig::new(llm, wallet)
            .with_wallet_data_file(self.wallet_data_file.clone())
            .with_max_steps(self.max_steps);

        ServerConfig::new(format!("{}:{}", self.host, self.port), agent)
    }
}
