pub mod prompt;
pub mod types;
pub mod wallet;

pub use prompt::handle_prompt;
pub use types::{PromptRequest, WalletResponse};
pub use wallet::handle_get_wallet;
