use thiserror::Error;

/// Errors that can occur in the bidding agent system
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Coordinator worker failed: {0}")]
    WorkerJoin(#[from] tokio::task::JoinError),

    #[error("Invalid coordinator configuration: {0}")]
    ConfigError(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
