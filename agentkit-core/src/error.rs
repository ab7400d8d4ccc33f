use agentkit_llm::LlmError;
use thiserror::Error;

use crate::credential::CredentialError;
use crate::wallet::WalletError;

/// Errors raised by the agent session and its reasoning loop
#[derive(Debug, Error)]
pub enum AgentError {
    /// Session could not be brought up; fatal at start-up
    #[error("agent initialization failed: {0}")]
    Initialization(String),

    /// Credential blob could not be read or written
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Identity subsystem failure
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// Model endpoint failure
    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    /// The reasoning loop could not be started
    #[error("agent invocation failed: {0}")]
    Invocation(String),

    /// The reasoning loop ran past its step budget without a final answer
    #[error("agent stopped after {0} steps without reaching a final answer")]
    StepLimit(usize),
}

impl AgentError {
    pub fn initialization(message: impl Into<String>) -> Self {
        Self::Initialization(message.into())
    }

    pub fn invocation(message: impl Into<String>) -> Self {
        Self::Invocation(message.into())
    }
}
