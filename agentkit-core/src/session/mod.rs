mod lifecycle;

pub use lifecycle::{PromptRun, ThreadLease};

use std::sync::Arc;

use agentkit_llm::{user, ChatProvider, LlmClient};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::agent::{ReactAgent, ReasoningEngine, ThreadConfig};
use crate::config::AgentConfig;
use crate::credential::CredentialStore;
use crate::wallet::{LocalWalletProvider, Wallet, WalletProvider, WalletToolkit};
use crate::AgentError;

/// A prompt that is known to be non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// The process-wide agent: one reasoning engine bound to one conversation thread.
///
/// Built once at start-up and shared by every request. Prompt runs are
/// serialized: `submit` waits for the previous run to be dropped before the
/// next one starts, so checkpoints of the shared thread never interleave.
pub struct AgentSession {
    engine: Arc<dyn ReasoningEngine>,
    thread: Arc<Mutex<ThreadConfig>>,
    thread_id: String,
    wallet: Option<Arc<dyn Wallet>>,
}

impl AgentSession {
    pub fn new(engine: Arc<dyn ReasoningEngine>, thread: ThreadConfig) -> Self {
        Self {
            thread_id: thread.thread_id.clone(),
            engine,
            thread: Arc::new(Mutex::new(thread)),
            wallet: None,
        }
    }

    /// Bring the session up from configuration: model client, wallet restored
    /// from (or persisted to) the credential file, wallet tools, thread memory.
    pub async fn initialize(config: &AgentConfig) -> Result<Self, AgentError> {
        let llm = LlmClient::new(config.llm.clone())
            .map_err(|e| AgentError::initialization(format!("model client: {}", e)))?;
        let provider = LocalWalletProvider::new(config.wallet.clone());
        let store = CredentialStore::new(&config.wallet_data_file);

        Self::initialize_with(Arc::new(llm), &provider, &store, config).await
    }

    /// Same as `initialize`, with the collaborators supplied by the caller
    pub async fn initialize_with(
        llm: Arc<dyn ChatProvider>,
        provider: &dyn WalletProvider,
        store: &CredentialStore,
        config: &AgentConfig,
    ) -> Result<Self, AgentError> {
        let existing = store
            .load()
            .await
            .map_err(|e| AgentError::initialization(e.to_string()))?;
        if existing.is_some() {
            debug!("Found wallet data in {}", store.path().display());
        }

        let wallet = provider
            .configure_with_credential(existing)
            .await
            .map_err(|e| AgentError::initialization(e.to_string()))?;
        let tools = WalletToolkit::new(wallet.clone()).tools();

        let engine = ReactAgent::new(llm, tools)
            .with_system_prompt(config.system_prompt.clone())
            .with_max_steps(config.max_steps);

        let exported = wallet
            .export_credential()
            .await
            .map_err(|e| AgentError::initialization(e.to_string()))?;
        store
            .save(&exported)
            .await
            .map_err(|e| AgentError::initialization(e.to_string()))?;

        info!(
            "Agent session ready: wallet {} on {}, tools [{}], thread \"{}\"",
            wallet.wallet_id(),
            wallet.network_id(),
            engine.tools().names().join(", "),
            config.thread_id
        );

        let mut session = Self::new(Arc::new(engine), ThreadConfig::new(config.thread_id.clone()));
        session.wallet = Some(wallet);
        Ok(session)
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn wallet(&self) -> Option<&Arc<dyn Wallet>> {
        self.wallet.as_ref()
    }

    /// Start a run for `prompt` on the shared thread.
    ///
    /// Waits while another run holds the thread. Fails only if the engine cannot
    /// start; failures during the run arrive as `Err` items of the returned stream.
    pub async fn submit(&self, prompt: Prompt) -> Result<PromptRun, AgentError> {
        debug!("[{}] Acquiring thread lock", self.thread_id);
        let guard = self.thread.clone().lock_owned().await;
        debug!("[{}] Thread lock acquired", self.thread_id);

        let events = self.engine.stream(vec![user(prompt.into_inner())], &guard)?;
        Ok(PromptRun::new(events, ThreadLease::new(guard)))
    }
}
