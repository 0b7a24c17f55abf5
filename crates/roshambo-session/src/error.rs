//! Error types for the session layer.

use roshambo_protocol::{ParticipantId, SessionId};

/// Errors that can occur during session operations.
///
/// All of these are caller-input errors. None is transient, so none is
/// worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The session does not exist (never created, or already destroyed).
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// The participant belongs to no live session.
    #[error("participant {0} is not in any session")]
    ParticipantNotFound(ParticipantId),

    /// Both participant slots are taken.
    #[error("session {0} is full")]
    SessionFull(SessionId),

    /// The participant already joined this session.
    #[error("participant {0} already in session {1}")]
    AlreadyJoined(ParticipantId, SessionId),

    /// The participant is already playing in a different session.
    #[error("participant {0} is already in session {1}")]
    AlreadyInSession(ParticipantId, SessionId),

    /// The participant is not one of this session's participants.
    #[error("participant {0} not in session {1}")]
    UnknownParticipant(ParticipantId, SessionId),

    /// The session does not have two participants yet.
    #[error("session {0} has not started")]
    NotStarted(SessionId),

    /// Two choices are already pending and the round has not been reset.
    #[error("round in session {0} is already decided")]
    RoundFull(SessionId),

    /// The participant already chose this round.
    #[error("participant {0} already chose this round in session {1}")]
    AlreadyChose(ParticipantId, SessionId),
}
