//! These models represent the objects passed around by the agents
//!
//! There are two formats we need to interact with:
//! - anthropic messages/tools, sent from an agent to the LLM
//! - tool calls, sent from an agent to the system providing its capabilities
//!
//! We always immediately convert the anthropic payloads into the internal structs using the
//! helpers in `providers::utils`, so the internal models only track what the turn loop needs.
pub mod message;
pub mod role;
pub mod tool;
