pub mod agent;
pub mod config;
pub mod credential;
pub mod error;
pub mod session;
pub mod tools;
pub mod wallet;

pub use agent::{AgentEvent, EventKind, EventStream, ReactAgent, ReasoningEngine, ThreadConfig};
pub use config::AgentConfig;
pub use credential::{CredentialError, CredentialStore};
pub use error::AgentError;
pub use session::{AgentSession, Prompt, PromptRun};
