pub mod registry;
pub mod roster;

pub use registry::AgentRegistry;
pub use roster::{default_agents, DEFAULT_ROSTER};
