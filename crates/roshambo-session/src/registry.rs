//! Session registry: creates, tracks, and destroys sessions.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use rand::Rng;
use rand::distr::Alphanumeric;
use roshambo_protocol::{Choice, ParticipantId, Score, SessionId};
use tokio::sync::RwLock;

use crate::actor::spawn_session;
use crate::{
    ChoiceOutcome, JoinOutcome, RegistryConfig, SessionError, SessionHandle,
    SessionInfo,
};

/// Owns every live session.
///
/// This is the entry point for session operations from the layer above.
/// It is safe to share behind an `Arc`: the map of handles sits behind
/// its own lock, which is only held for structural changes (create,
/// destroy, look up a handle) and is always released before talking to a
/// session actor. Gameplay operations are serialized per session by the
/// actors, never registry-wide.
///
/// There is no participant index. Which session a participant is in is
/// always asked of the sessions themselves, so it can't drift. The only
/// per-participant state is the set of joins still in flight, which keeps
/// one participant from landing in two sessions at once.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
    /// Participants with a join in flight, and the session they target.
    joining: Mutex<HashMap<ParticipantId, SessionId>>,
    config: RegistryConfig,
}

/// Collisions tolerated at one id length before ids get a character longer.
const COLLISIONS_PER_LENGTH: usize = 8;

impl SessionRegistry {
    /// Creates an empty registry with default settings.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            joining: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Creates a new, empty session and returns its id.
    ///
    /// The id is checked against live sessions under the write lock, so
    /// it can never collide with one. Repeated collisions mean the id space
    /// at the configured length is (nearly) used up, so the length grows
    /// until a free id turns up.
    pub async fn create(&self) -> SessionId {
        let mut sessions = self.sessions.write().await;
        let mut len = self.config.id_length.max(1);
        let mut collisions = 0;
        let session_id = loop {
            let candidate = generate_id(len);
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
            collisions += 1;
            if collisions % COLLISIONS_PER_LENGTH == 0 {
                len += 1;
                tracing::debug!(len, "session id space crowded, lengthening ids");
            }
        };
        let handle = spawn_session(session_id.clone(), &self.config);
        sessions.insert(session_id.clone(), handle);
        tracing::info!(%session_id, "session created");
        session_id
    }

    /// Returns a snapshot of a session.
    pub async fn get(
        &self,
        session_id: &SessionId,
    ) -> Result<SessionInfo, SessionError> {
        self.handle(session_id).await?.get_info().await
    }

    /// Adds a participant to a session.
    ///
    /// A participant plays in at most one session at a time. While one
    /// join for a participant is in flight, any other join for them is
    /// refused as if the first had already landed.
    pub async fn join(
        &self,
        session_id: &SessionId,
        participant: ParticipantId,
    ) -> Result<JoinOutcome, SessionError> {
        let handle = self.handle(session_id).await?;
        let _claim = self.claim_join(&participant, session_id)?;

        if let Ok(current) = self.find_session_by_participant(&participant).await {
            return Err(if &current == session_id {
                SessionError::AlreadyJoined(participant, current)
            } else {
                SessionError::AlreadyInSession(participant, current)
            });
        }

        handle.join(participant).await
    }

    /// Records a participant's choice in a session.
    pub async fn submit_choice(
        &self,
        session_id: &SessionId,
        participant: ParticipantId,
        choice: Choice,
    ) -> Result<ChoiceOutcome, SessionError> {
        self.handle(session_id)
            .await?
            .submit_choice(participant, choice)
            .await
    }

    /// Clears a session's pending choices and returns its score.
    pub async fn reset_choices(
        &self,
        session_id: &SessionId,
    ) -> Result<Score, SessionError> {
        self.handle(session_id).await?.reset_choices().await
    }

    /// Returns the other participant in a session.
    pub async fn rival_of(
        &self,
        session_id: &SessionId,
        participant: ParticipantId,
    ) -> Result<ParticipantId, SessionError> {
        self.handle(session_id).await?.rival_of(participant).await
    }

    /// Finds the session a participant is in.
    ///
    /// Asks each live session in turn. Sessions that stop while being
    /// asked are skipped.
    pub async fn find_session_by_participant(
        &self,
        participant: &ParticipantId,
    ) -> Result<SessionId, SessionError> {
        for handle in self.handles().await {
            if let Ok(true) = handle.has_participant(participant.clone()).await {
                return Ok(handle.session_id().clone());
            }
        }
        Err(SessionError::ParticipantNotFound(participant.clone()))
    }

    /// Removes a participant from whichever session holds them.
    ///
    /// Returns that session's id and how many participants remain. When
    /// none remain the session is destroyed.
    pub async fn remove_participant(
        &self,
        participant: &ParticipantId,
    ) -> Result<(SessionId, usize), SessionError> {
        let session_id = self.find_session_by_participant(participant).await?;
        let handle = self.handle(&session_id).await?;

        let remaining = match handle.leave(participant.clone()).await {
            Ok(n) => n,
            // Lost a race with another leave; the participant is gone.
            Err(SessionError::UnknownParticipant(..) | SessionError::NotFound(_)) => {
                return Err(SessionError::ParticipantNotFound(participant.clone()));
            }
            Err(e) => return Err(e),
        };

        if remaining == 0 {
            self.destroy(&handle).await;
        }
        Ok((session_id, remaining))
    }

    /// Returns the number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Lists all live session ids.
    pub async fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.read().await.keys().cloned().collect()
    }

    /// Clones a session's handle out from under the read lock.
    async fn handle(
        &self,
        session_id: &SessionId,
    ) -> Result<SessionHandle, SessionError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(session_id.clone()))
    }

    /// Marks `participant` as joining `session_id` until the claim drops.
    fn claim_join(
        &self,
        participant: &ParticipantId,
        session_id: &SessionId,
    ) -> Result<JoinClaim<'_>, SessionError> {
        let mut joining = lock_joining(&self.joining);
        if let Some(target) = joining.get(participant) {
            return Err(if target == session_id {
                SessionError::AlreadyJoined(participant.clone(), target.clone())
            } else {
                SessionError::AlreadyInSession(participant.clone(), target.clone())
            });
        }
        joining.insert(participant.clone(), session_id.clone());
        Ok(JoinClaim {
            joining: &self.joining,
            participant: participant.clone(),
        })
    }

    /// Returns cloned handles to all live sessions.
    async fn handles(&self) -> Vec<SessionHandle> {
        self.sessions.read().await.values().cloned().collect()
    }

    /// Drops an emptied session from the map, unless the slot was already
    /// reused by a different actor.
    async fn destroy(&self, handle: &SessionHandle) {
        let session_id = handle.session_id();
        let mut sessions = self.sessions.write().await;
        if sessions
            .get(session_id)
            .is_some_and(|current| current.same_session(handle))
        {
            sessions.remove(session_id);
            tracing::info!(%session_id, "session destroyed");
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// An in-flight join. Dropping it releases the participant.
struct JoinClaim<'a> {
    joining: &'a Mutex<HashMap<ParticipantId, SessionId>>,
    participant: ParticipantId,
}

impl Drop for JoinClaim<'_> {
    fn drop(&mut self) {
        lock_joining(self.joining).remove(&self.participant);
    }
}

/// The map only ever sees single inserts and removes, so a poisoned lock
/// still holds consistent data.
fn lock_joining(
    joining: &Mutex<HashMap<ParticipantId, SessionId>>,
) -> MutexGuard<'_, HashMap<ParticipantId, SessionId>> {
    joining.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Generates a random alphanumeric session id of `len` characters.
fn generate_id(len: usize) -> SessionId {
    let id: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len.max(1))
        .map(char::from)
        .collect();
    SessionId::new(id)
}
