//! Session actor: an isolated Tokio task that owns one [`Session`].
//!
//! Each session runs in its own task, communicating with the outside world
//! through an mpsc channel. Commands are handled one at a time, which is
//! what keeps a disconnect from interleaving with a choice submission on
//! the same session.

use roshambo_protocol::{Choice, ParticipantId, Score, SessionId};
use tokio::sync::{mpsc, oneshot};

use crate::{
    ChoiceOutcome, JoinOutcome, RegistryConfig, Session, SessionError,
    SessionInfo,
};

/// Commands sent to a session actor through its channel.
///
/// Every variant carries a `oneshot::Sender` reply channel: the caller
/// sends the command and waits for the answer on that channel.
enum SessionCommand {
    Join {
        participant: ParticipantId,
        reply: oneshot::Sender<Result<JoinOutcome, SessionError>>,
    },

    SubmitChoice {
        participant: ParticipantId,
        choice: Choice,
        reply: oneshot::Sender<Result<ChoiceOutcome, SessionError>>,
    },

    ResetChoices {
        reply: oneshot::Sender<Score>,
    },

    RivalOf {
        participant: ParticipantId,
        reply: oneshot::Sender<Result<ParticipantId, SessionError>>,
    },

    /// Remove a participant. The reply carries how many remain.
    Leave {
        participant: ParticipantId,
        reply: oneshot::Sender<Result<usize, SessionError>>,
    },

    HasParticipant {
        participant: ParticipantId,
        reply: oneshot::Sender<bool>,
    },

    GetInfo {
        reply: oneshot::Sender<SessionInfo>,
    },
}

/// Handle to a running session actor.
///
/// Cheap to clone (it's an `mpsc::Sender` wrapper). The registry holds
/// one per session and hands out clones so callers never hold the
/// registry lock while waiting on a session.
///
/// Once the actor has stopped (its last participant left), every method
/// fails with [`SessionError::NotFound`].
#[derive(Clone)]
pub struct SessionHandle {
    session_id: SessionId,
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// The id of the session this handle talks to.
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Returns `true` if both handles talk to the same actor.
    pub fn same_session(&self, other: &SessionHandle) -> bool {
        self.sender.same_channel(&other.sender)
    }

    /// Adds a participant. See [`Session::join`](crate::Session::join).
    pub async fn join(
        &self,
        participant: ParticipantId,
    ) -> Result<JoinOutcome, SessionError> {
        self.request(|reply| SessionCommand::Join { participant, reply })
            .await?
    }

    /// Records a move for the current round.
    pub async fn submit_choice(
        &self,
        participant: ParticipantId,
        choice: Choice,
    ) -> Result<ChoiceOutcome, SessionError> {
        self.request(|reply| SessionCommand::SubmitChoice {
            participant,
            choice,
            reply,
        })
        .await?
    }

    /// Opens a new round and returns the score.
    pub async fn reset_choices(&self) -> Result<Score, SessionError> {
        self.request(|reply| SessionCommand::ResetChoices { reply })
            .await
    }

    /// Returns the other participant.
    pub async fn rival_of(
        &self,
        participant: ParticipantId,
    ) -> Result<ParticipantId, SessionError> {
        self.request(|reply| SessionCommand::RivalOf { participant, reply })
            .await?
    }

    /// Removes a participant and returns how many remain. When that
    /// reaches zero the actor stops.
    pub async fn leave(
        &self,
        participant: ParticipantId,
    ) -> Result<usize, SessionError> {
        self.request(|reply| SessionCommand::Leave { participant, reply })
            .await?
    }

    /// Whether `participant` is in this session.
    pub async fn has_participant(
        &self,
        participant: ParticipantId,
    ) -> Result<bool, SessionError> {
        self.request(|reply| SessionCommand::HasParticipant {
            participant,
            reply,
        })
        .await
    }

    /// A snapshot of the session.
    pub async fn get_info(&self) -> Result<SessionInfo, SessionError> {
        self.request(|reply| SessionCommand::GetInfo { reply }).await
    }

    /// Sends a command built around a fresh reply channel and waits for
    /// the answer. A closed channel on either leg means the actor is gone.
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(build(reply_tx))
            .await
            .map_err(|_| self.gone())?;
        reply_rx.await.map_err(|_| self.gone())
    }

    /// Logs and builds the error for a stopped actor.
    fn gone(&self) -> SessionError {
        tracing::warn!(session_id = %self.session_id, "session actor is gone");
        SessionError::NotFound(self.session_id.clone())
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct SessionActor {
    session: Session,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl SessionActor {
    /// Runs the actor loop until the last participant leaves or every
    /// handle is dropped.
    async fn run(mut self) {
        let session_id = self.session.id().clone();
        tracing::debug!(%session_id, "session actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                SessionCommand::Join { participant, reply } => {
                    let result = self.handle_join(participant);
                    let _ = reply.send(result);
                }
                SessionCommand::SubmitChoice {
                    participant,
                    choice,
                    reply,
                } => {
                    let result = self.handle_choice(participant, choice);
                    let _ = reply.send(result);
                }
                SessionCommand::ResetChoices { reply } => {
                    let score = self.session.reset_choices();
                    tracing::debug!(%session_id, "choices reset");
                    let _ = reply.send(score);
                }
                SessionCommand::RivalOf { participant, reply } => {
                    let result =
                        self.session.rival_of(&participant).cloned();
                    let _ = reply.send(result);
                }
                SessionCommand::Leave { participant, reply } => {
                    let result = self.handle_leave(&participant);
                    let emptied = matches!(result, Ok(0));
                    let _ = reply.send(result);
                    if emptied {
                        break;
                    }
                }
                SessionCommand::HasParticipant { participant, reply } => {
                    let _ = reply.send(self.session.has_participant(&participant));
                }
                SessionCommand::GetInfo { reply } => {
                    let _ = reply.send(self.session.info());
                }
            }
        }

        tracing::debug!(%session_id, "session actor stopped");
    }

    fn handle_join(
        &mut self,
        participant: ParticipantId,
    ) -> Result<JoinOutcome, SessionError> {
        let session_id = self.session.id().clone();
        match self.session.join(participant.clone()) {
            Ok(outcome) => {
                tracing::info!(
                    %session_id,
                    %participant,
                    participants = outcome.participant_count(),
                    "participant joined"
                );
                Ok(outcome)
            }
            Err(e) => {
                tracing::debug!(%session_id, %participant, error = %e, "join rejected");
                Err(e)
            }
        }
    }

    fn handle_choice(
        &mut self,
        participant: ParticipantId,
        choice: Choice,
    ) -> Result<ChoiceOutcome, SessionError> {
        let session_id = self.session.id().clone();
        let result = self.session.submit_choice(participant.clone(), choice);
        match &result {
            Ok(ChoiceOutcome::RoundOver { result: round, .. }) => {
                match round.winner() {
                    Some(winner) => {
                        tracing::info!(%session_id, %winner, "round resolved")
                    }
                    None => tracing::info!(%session_id, "round tied"),
                }
            }
            Ok(ChoiceOutcome::WaitingOnOpponent { rival }) => {
                tracing::debug!(%session_id, %participant, %rival, "choice recorded");
            }
            Err(e) => {
                tracing::debug!(%session_id, %participant, error = %e, "choice rejected");
            }
        }
        result
    }

    fn handle_leave(
        &mut self,
        participant: &ParticipantId,
    ) -> Result<usize, SessionError> {
        let remaining = self.session.remove_participant(participant)?;
        tracing::info!(
            session_id = %self.session.id(),
            %participant,
            remaining,
            "participant left"
        );
        Ok(remaining)
    }
}

/// Spawns a new session actor task and returns a handle to it.
///
/// `config.channel_size` controls backpressure: once the channel is full,
/// senders wait.
pub(crate) fn spawn_session(
    session_id: SessionId,
    config: &RegistryConfig,
) -> SessionHandle {
    let (tx, rx) = mpsc::channel(config.channel_size.max(1));

    let actor = SessionActor {
        session: Session::new(session_id.clone(), config.single_submission),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    SessionHandle {
        session_id,
        sender: tx,
    }
}
