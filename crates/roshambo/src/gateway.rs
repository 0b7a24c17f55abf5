//! Event-style gateway between the transport and the session registry.
//!
//! Every inbound client request maps to one method here. Each method
//! returns the events to deliver and who gets them; the transport does
//! the actual sending. Rejections the client should simply be told about
//! (a full session) come back as events, and everything else comes back
//! as a [`RoshamboError`].

use roshambo_protocol::{Choice, ParticipantId, Recipient, ServerEvent, SessionId};
use roshambo_session::{
    ChoiceOutcome, JoinOutcome, SessionError, SessionRegistry,
};

use crate::RoshamboError;

/// One event and its destination.
pub type Dispatch = (Recipient, ServerEvent);

/// Entry point for the transport layer.
///
/// Share it behind an `Arc`; every method takes `&self`.
pub struct Gateway {
    registry: SessionRegistry,
}

impl Gateway {
    pub fn new(registry: SessionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Creates a session and tells the requester its id.
    pub async fn create(&self, requester: ParticipantId) -> Vec<Dispatch> {
        let session_id = self.registry.create().await;
        vec![(
            Recipient::Participant(requester),
            ServerEvent::Created { session_id },
        )]
    }

    /// Joins a participant to a session.
    ///
    /// A full session is reported to the requester alone. Otherwise the
    /// whole session hears that it is waiting, or that it has started.
    pub async fn join(
        &self,
        session_id: &SessionId,
        participant: ParticipantId,
    ) -> Result<Vec<Dispatch>, RoshamboError> {
        let outcome = match self.registry.join(session_id, participant.clone()).await {
            Ok(outcome) => outcome,
            Err(SessionError::SessionFull(full)) => {
                tracing::debug!(session_id = %full, %participant, "join refused: full");
                return Ok(vec![(
                    Recipient::Participant(participant),
                    ServerEvent::SessionFull { session_id: full },
                )]);
            }
            Err(e) => return Err(e.into()),
        };

        let room = Recipient::Session(session_id.clone());
        let event = match outcome {
            JoinOutcome::Waiting => ServerEvent::WaitingForPlayer,
            JoinOutcome::Started { score } => ServerEvent::Started { score },
        };
        Ok(vec![(room, event)])
    }

    /// Submits a move given as its wire string (`"rock"`, `"paper"`,
    /// `"scissors"`).
    pub async fn submit_choice(
        &self,
        session_id: &SessionId,
        participant: ParticipantId,
        choice: &str,
    ) -> Result<Vec<Dispatch>, RoshamboError> {
        let choice: Choice = choice.parse()?;
        self.submit(session_id, participant, choice).await
    }

    /// Submits an already-parsed move.
    ///
    /// The first move of a round nudges the rival; the second resolves the
    /// round and announces the result to the whole session.
    pub async fn submit(
        &self,
        session_id: &SessionId,
        participant: ParticipantId,
        choice: Choice,
    ) -> Result<Vec<Dispatch>, RoshamboError> {
        let outcome = self
            .registry
            .submit_choice(session_id, participant, choice)
            .await?;

        Ok(match outcome {
            ChoiceOutcome::WaitingOnOpponent { rival } => {
                vec![(Recipient::Participant(rival), ServerEvent::WaitingForMove)]
            }
            ChoiceOutcome::RoundOver { result, score } => vec![(
                Recipient::Session(session_id.clone()),
                ServerEvent::RoundOver { result, score },
            )],
        })
    }

    /// Opens a new round and re-announces the current score.
    pub async fn play_again(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<Dispatch>, RoshamboError> {
        let score = self.registry.reset_choices(session_id).await?;
        Ok(vec![(
            Recipient::Session(session_id.clone()),
            ServerEvent::Started { score },
        )])
    }

    /// Handles a dropped connection.
    ///
    /// If an opponent is still there the session goes back to waiting. If
    /// the session emptied it is already gone, and nobody is left to tell.
    pub async fn disconnect(
        &self,
        participant: &ParticipantId,
    ) -> Result<Vec<Dispatch>, RoshamboError> {
        let (session_id, remaining) =
            self.registry.remove_participant(participant).await?;

        if remaining == 0 {
            return Ok(Vec::new());
        }
        Ok(vec![(
            Recipient::Session(session_id),
            ServerEvent::WaitingForPlayer,
        )])
    }
}
