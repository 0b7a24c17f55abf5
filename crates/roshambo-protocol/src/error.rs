//! Error types for the protocol layer.
//!
//! Each crate in Roshambo defines its own error enum. A `ProtocolError`
//! always means the client sent something we couldn't interpret, never
//! that the game itself rejected a move.

/// Errors that can occur while interpreting client input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The move string is not one of `rock`, `paper`, or `scissors`.
    #[error("invalid choice: {0:?}")]
    InvalidChoice(String),

    /// An identifier was empty.
    #[error("empty {0} identifier")]
    EmptyIdentifier(&'static str),
}
