use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error("Invalid input for tool {tool}: {reason}")]
    InvalidParameters { tool: String, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AgentError {
    pub fn invalid_parameters<T: Into<String>, R: Into<String>>(tool: T, reason: R) -> Self {
        AgentError::InvalidParameters {
            tool: tool.into(),
            reason: reason.into(),
        }
    }
}

pub type AgentResult<T> = Result<T, AgentError>;
