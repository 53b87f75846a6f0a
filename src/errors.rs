use scribe_core::TransportError;

use crate::token::TokenError;

/// Every way a persist command can fail. None of these cross the command
/// boundary; they are translated into the completion's failure outcome.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("persist precondition failed: {0}")]
    InvalidState(&'static str),
    #[error("{field} missing from document store response")]
    MissingField { field: &'static str },
    #[error("document store response contained an empty result set")]
    EmptyResults,
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("failed to serialize activity: {0}")]
    Serialization(#[from] serde_json::Error),
}
