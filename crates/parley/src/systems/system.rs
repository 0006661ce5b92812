use async_trait::async_trait;

use crate::errors::AgentResult;
use crate::models::tool::{Tool, ToolCall};

/// Core trait that defines the set of tools an agent can operate
#[async_trait]
pub trait System: Send + Sync {
    /// Get the name of the system
    fn name(&self) -> &str;

    /// Get the system description
    fn description(&self) -> &str;

    /// Get available tools, in the order they are advertised to the model
    fn tools(&self) -> &[Tool];

    /// Call a tool with the given arguments.
    ///
    /// An unrecognized tool name resolves to [`super::UNKNOWN_TOOL`] rather than an error.
    /// Arguments that do not match the tool's input schema fail with
    /// [`crate::errors::AgentError::InvalidParameters`].
    async fn call(&self, tool_call: ToolCall) -> AgentResult<String>;
}
