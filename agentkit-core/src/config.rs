use std::path::PathBuf;

use agentkit_llm::LlmConfig;

use crate::agent::engine::DEFAULT_THREAD_ID;
use crate::agent::react::{DEFAULT_MAX_STEPS, DEFAULT_SYSTEM_PROMPT};
use crate::credential::DEFAULT_WALLET_DATA_FILE;
use crate::wallet::WalletConfig;

/// Everything needed to bring up the agent session
#[derive(Clone, Debug)]
pub struct AgentConfig {
    pub llm: LlmConfig,
    pub wallet: WalletConfig,
    /// Where the exported wallet credential is persisted
    pub wallet_data_file: PathBuf,
    pub thread_id: String,
    pub system_prompt: String,
    pub max_steps: usize,
}

impl AgentConfig {
    pub fn new(llm: LlmConfig, wallet: WalletConfig) -> Self {
        Self {
            llm,
            wallet,
            wallet_data_file: PathBuf::from(DEFAULT_WALLET_DATA_FILE),
            thread_id: DEFAULT_THREAD_ID.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_wallet_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.wallet_data_file = path.into();
        self
    }

    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = thread_id.into();
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}
