pub mod engine;
pub mod events;
pub mod memory;
pub mod react;

pub use engine::{EventStream, ReasoningEngine, ThreadConfig};
pub use events::{AgentEvent, EventKind};
pub use memory::MemoryCheckpointer;
pub use react::ReactAgent;
