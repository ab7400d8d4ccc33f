pub mod apis;
pub mod error;
pub mod http;
pub mod streaming;

pub use error::{ApiJson, ErrorResponse};
pub use http::{router, start_server, ServerConfig, ServerState};
pub use streaming::{ChunkFormatter, EventFormatter, RelayError, RelayState, StreamRelay, DONE_SENTINEL};
