//! Unified error type for Roshambo.

use roshambo_protocol::ProtocolError;
use roshambo_session::SessionError;

/// Top-level error that wraps every crate-specific error.
///
/// `#[from]` on each variant lets `?` convert sub-crate errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoshamboError {
    /// Client input that didn't parse (bad move string, empty id).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session rule rejected the request (not found, full, round full...).
    #[error(transparent)]
    Session(#[from] SessionError),
}
