use thiserror::Error;

/// Rejections returned by auction commands
///
/// Both kinds are synchronous, local and non-fatal: the command had no
/// effect and the auction remains in its previous state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    /// Malformed or duplicate input supplied to a command
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Command is not legal given the current auction state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl AuctionError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        AuctionError::InvalidArgument(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        AuctionError::InvalidState(message.into())
    }
}

pub type AuctionResult<T> = Result<T, AuctionError>;
