//! The per-match state machine.
//!
//! A [`Session`] is plain data with synchronous methods. It knows nothing
//! about tasks or channels; the actor in `actor.rs` owns one and feeds it
//! commands one at a time.

use std::fmt;

use roshambo_protocol::{Choice, ParticipantId, RoundResult, Score, SessionId};

use crate::{SessionError, Submission, resolve};

/// A session never holds more than this many participants.
pub const MAX_PARTICIPANTS: usize = 2;

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The lifecycle state of a session.
///
/// ```text
/// Empty → Waiting → Active(Open) ⇄ Active(Resolved)
///           ↑            │
///           └──(leave)───┘
/// ```
///
/// - **Empty**: created, nobody joined yet.
/// - **Waiting**: one participant, waiting for an opponent.
/// - **Active**: two participants, score initialized. The round is
///   `Open` while fewer than two choices are in, and `Resolved` once both
///   arrive. Only an explicit reset reopens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Waiting,
    Active(RoundState),
}

/// Progress of the current round within an active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    Open,
    Resolved,
}

impl SessionState {
    /// Returns `true` if another participant can join.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Empty | Self::Waiting)
    }

    /// Returns `true` if two participants are present.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::Waiting => write!(f, "Waiting"),
            Self::Active(RoundState::Open) => write!(f, "Active(Open)"),
            Self::Active(RoundState::Resolved) => write!(f, "Active(Resolved)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What a successful join produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// First participant in; waiting for an opponent.
    Waiting,
    /// Second participant in; the match is on.
    Started { score: Score },
}

impl JoinOutcome {
    /// Number of participants in the session after the join.
    pub fn participant_count(&self) -> usize {
        match self {
            Self::Waiting => 1,
            Self::Started { .. } => 2,
        }
    }
}

/// What a successful choice submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceOutcome {
    /// First choice of the round; `rival` still has to move.
    WaitingOnOpponent { rival: ParticipantId },
    /// Second choice of the round; the round has been resolved.
    RoundOver { result: RoundResult, score: Score },
}

/// A point-in-time snapshot of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub session_id: SessionId,
    pub state: SessionState,
    pub participants: Vec<ParticipantId>,
    pub pending_choices: usize,
    pub score: Score,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One two-player match: who is in it, the open round, and the score.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    /// Join order matters: it orders the score and defines the rival.
    participants: Vec<ParticipantId>,
    /// Choices for the current round, in submission order.
    pending: Vec<Submission>,
    score: Score,
    single_submission: bool,
}

impl Session {
    /// Creates an empty session.
    pub fn new(id: SessionId, single_submission: bool) -> Self {
        Self {
            id,
            participants: Vec::with_capacity(MAX_PARTICIPANTS),
            pending: Vec::with_capacity(MAX_PARTICIPANTS),
            score: Score::new(),
            single_submission,
        }
    }

    /// The session's id.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Current participants, in join order.
    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    /// Choices recorded for the current round, in submission order.
    pub fn pending_choices(&self) -> &[Submission] {
        &self.pending
    }

    /// The running score, ordered like [`participants`](Self::participants).
    pub fn score(&self) -> &Score {
        &self.score
    }

    /// Whether `participant` is currently in this session.
    pub fn has_participant(&self, participant: &ParticipantId) -> bool {
        self.participants.contains(participant)
    }

    /// The lifecycle state, derived from participants and pending choices.
    pub fn state(&self) -> SessionState {
        match self.participants.len() {
            0 => SessionState::Empty,
            1 => SessionState::Waiting,
            _ if self.pending.len() >= MAX_PARTICIPANTS => {
                SessionState::Active(RoundState::Resolved)
            }
            _ => SessionState::Active(RoundState::Open),
        }
    }

    /// A snapshot for callers outside the actor.
    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.id.clone(),
            state: self.state(),
            participants: self.participants.clone(),
            pending_choices: self.pending.len(),
            score: self.score.clone(),
        }
    }

    /// Adds a participant.
    ///
    /// The second join initializes the score. If a previous opponent left,
    /// the remaining participant keeps their wins, the newcomer starts at
    /// zero, and the score is reordered to match the participants.
    pub fn join(
        &mut self,
        participant: ParticipantId,
    ) -> Result<JoinOutcome, SessionError> {
        if self.participants.len() >= MAX_PARTICIPANTS {
            return Err(SessionError::SessionFull(self.id.clone()));
        }
        if self.has_participant(&participant) {
            return Err(SessionError::AlreadyJoined(participant, self.id.clone()));
        }

        self.participants.push(participant);
        if self.participants.len() < MAX_PARTICIPANTS {
            return Ok(JoinOutcome::Waiting);
        }

        let first = self.participants[0].clone();
        let second = self.participants[1].clone();
        self.score = if self.score.is_empty() {
            Score::for_pair(first, second)
        } else {
            self.score.carry_over(first, second)
        };

        Ok(JoinOutcome::Started {
            score: self.score.clone(),
        })
    }

    /// Records `participant`'s move for the current round.
    ///
    /// The second recorded choice resolves the round on the spot and the
    /// winner (if any) gains exactly one point. Resolved choices stay
    /// pending until [`reset_choices`](Self::reset_choices).
    pub fn submit_choice(
        &mut self,
        participant: ParticipantId,
        choice: Choice,
    ) -> Result<ChoiceOutcome, SessionError> {
        if !self.has_participant(&participant) {
            return Err(SessionError::UnknownParticipant(
                participant,
                self.id.clone(),
            ));
        }
        if self.participants.len() < MAX_PARTICIPANTS {
            return Err(SessionError::NotStarted(self.id.clone()));
        }
        if self.pending.len() >= MAX_PARTICIPANTS {
            return Err(SessionError::RoundFull(self.id.clone()));
        }
        if self.single_submission
            && self.pending.iter().any(|s| s.participant == participant)
        {
            return Err(SessionError::AlreadyChose(participant, self.id.clone()));
        }

        self.pending.push(Submission {
            participant: participant.clone(),
            choice,
        });

        if let [first, second] = self.pending.as_slice() {
            let result = resolve(first, second);
            if let RoundResult::Winner(winner) = &result {
                self.score.award(winner);
            }
            return Ok(ChoiceOutcome::RoundOver {
                result,
                score: self.score.clone(),
            });
        }

        let rival = self.rival_of(&participant)?.clone();
        Ok(ChoiceOutcome::WaitingOnOpponent { rival })
    }

    /// Clears the pending choices and returns the (unchanged) score.
    pub fn reset_choices(&mut self) -> Score {
        self.pending.clear();
        self.score.clone()
    }

    /// Returns the other participant.
    pub fn rival_of(
        &self,
        participant: &ParticipantId,
    ) -> Result<&ParticipantId, SessionError> {
        if !self.has_participant(participant) {
            return Err(SessionError::UnknownParticipant(
                participant.clone(),
                self.id.clone(),
            ));
        }
        self.participants
            .iter()
            .find(|p| *p != participant)
            .ok_or_else(|| SessionError::NotStarted(self.id.clone()))
    }

    /// Removes a participant and returns how many remain.
    ///
    /// Their pending choice for the current round goes with them. If the
    /// round was already resolved, both choices are cleared so the next
    /// pair starts on an open round. The score is left alone.
    pub fn remove_participant(
        &mut self,
        participant: &ParticipantId,
    ) -> Result<usize, SessionError> {
        let index = self
            .participants
            .iter()
            .position(|p| p == participant)
            .ok_or_else(|| {
                SessionError::UnknownParticipant(
                    participant.clone(),
                    self.id.clone(),
                )
            })?;

        self.participants.remove(index);
        if self.pending.len() >= MAX_PARTICIPANTS {
            self.pending.clear();
        } else {
            self.pending.retain(|s| &s.participant != participant);
        }
        Ok(self.participants.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: &str) -> ParticipantId {
        ParticipantId::new(id)
    }

    fn session() -> Session {
        Session::new(SessionId::new("s-1"), true)
    }

    /// A session with `a` and `b` joined, in that order.
    fn active() -> Session {
        let mut s = session();
        s.join(p("a")).unwrap();
        s.join(p("b")).unwrap();
        s
    }

    // =====================================================================
    // join()
    // =====================================================================

    #[test]
    fn test_join_first_participant_waits() {
        let mut s = session();
        assert_eq!(s.state(), SessionState::Empty);

        let outcome = s.join(p("a")).unwrap();

        assert_eq!(outcome, JoinOutcome::Waiting);
        assert_eq!(outcome.participant_count(), 1);
        assert_eq!(s.state(), SessionState::Waiting);
        assert!(s.score().is_empty());
    }

    #[test]
    fn test_join_second_participant_starts_with_zero_score() {
        let mut s = session();
        s.join(p("a")).unwrap();

        let outcome = s.join(p("b")).unwrap();

        let JoinOutcome::Started { score } = outcome else {
            panic!("expected Started");
        };
        assert_eq!(score.len(), 2);
        assert_eq!(score.wins(&p("a")), Some(0));
        assert_eq!(score.wins(&p("b")), Some(0));
        assert_eq!(s.state(), SessionState::Active(RoundState::Open));
    }

    #[test]
    fn test_join_third_participant_is_rejected_without_change() {
        let mut s = active();

        let result = s.join(p("c"));

        assert_eq!(result, Err(SessionError::SessionFull(SessionId::new("s-1"))));
        assert_eq!(s.participants(), &[p("a"), p("b")]);
        assert_eq!(s.score().len(), 2);
    }

    #[test]
    fn test_join_same_participant_twice_is_rejected() {
        let mut s = session();
        s.join(p("a")).unwrap();

        let result = s.join(p("a"));

        assert!(matches!(result, Err(SessionError::AlreadyJoined(..))));
        assert_eq!(s.participants().len(), 1);
    }

    #[test]
    fn test_join_replacement_inherits_departed_slot() {
        let mut s = active();
        s.submit_choice(p("a"), Choice::Rock).unwrap();
        s.submit_choice(p("b"), Choice::Scissors).unwrap();
        s.reset_choices();
        s.remove_participant(&p("b")).unwrap();

        let JoinOutcome::Started { score } = s.join(p("c")).unwrap() else {
            panic!("expected Started");
        };

        assert_eq!(score.wins(&p("a")), Some(1));
        assert_eq!(score.wins(&p("c")), Some(0));
        assert!(!score.contains(&p("b")));
        assert_eq!(score.len(), 2);
    }

    #[test]
    fn test_join_replacement_orders_score_like_participants() {
        let mut s = active();
        s.submit_choice(p("a"), Choice::Paper).unwrap();
        s.submit_choice(p("b"), Choice::Scissors).unwrap();
        s.reset_choices();
        s.remove_participant(&p("a")).unwrap();

        let JoinOutcome::Started { score } = s.join(p("c")).unwrap() else {
            panic!("expected Started");
        };

        assert_eq!(s.participants(), &[p("b"), p("c")]);
        let order: Vec<_> = score.iter().map(|e| e.participant.clone()).collect();
        assert_eq!(order, s.participants());
        assert_eq!(score.wins(&p("b")), Some(1));
        assert_eq!(score.wins(&p("c")), Some(0));
    }

    // =====================================================================
    // submit_choice()
    // =====================================================================

    #[test]
    fn test_submit_first_choice_names_rival() {
        let mut s = active();

        let outcome = s.submit_choice(p("a"), Choice::Rock).unwrap();

        assert_eq!(outcome, ChoiceOutcome::WaitingOnOpponent { rival: p("b") });
        assert_eq!(s.pending_choices().len(), 1);
    }

    #[test]
    fn test_submit_rock_beats_scissors_and_scores_once() {
        let mut s = active();
        s.submit_choice(p("a"), Choice::Rock).unwrap();

        let outcome = s.submit_choice(p("b"), Choice::Scissors).unwrap();

        let ChoiceOutcome::RoundOver { result, score } = outcome else {
            panic!("expected RoundOver");
        };
        assert_eq!(result, RoundResult::Winner(p("a")));
        assert_eq!(score.wins(&p("a")), Some(1));
        assert_eq!(score.wins(&p("b")), Some(0));
        assert_eq!(s.state(), SessionState::Active(RoundState::Resolved));
    }

    #[test]
    fn test_submit_equal_choices_tie_without_scoring() {
        let mut s = active();
        s.submit_choice(p("a"), Choice::Rock).unwrap();

        let outcome = s.submit_choice(p("b"), Choice::Rock).unwrap();

        let ChoiceOutcome::RoundOver { result, score } = outcome else {
            panic!("expected RoundOver");
        };
        assert_eq!(result, RoundResult::Tie);
        assert_eq!(score.wins(&p("a")), Some(0));
        assert_eq!(score.wins(&p("b")), Some(0));
    }

    #[test]
    fn test_submit_third_choice_is_round_full() {
        let mut s = active();
        s.submit_choice(p("a"), Choice::Paper).unwrap();
        s.submit_choice(p("b"), Choice::Rock).unwrap();

        let result = s.submit_choice(p("b"), Choice::Scissors);

        assert_eq!(result, Err(SessionError::RoundFull(SessionId::new("s-1"))));
        assert_eq!(s.pending_choices().len(), 2);
        assert_eq!(s.score().wins(&p("a")), Some(1));
        assert_eq!(s.score().wins(&p("b")), Some(0));
    }

    #[test]
    fn test_submit_from_stranger_is_unknown_participant() {
        let mut s = active();

        let result = s.submit_choice(p("z"), Choice::Rock);

        assert!(matches!(result, Err(SessionError::UnknownParticipant(..))));
        assert!(s.pending_choices().is_empty());
    }

    #[test]
    fn test_submit_before_opponent_joins_is_not_started() {
        let mut s = session();
        s.join(p("a")).unwrap();

        let result = s.submit_choice(p("a"), Choice::Rock);

        assert_eq!(result, Err(SessionError::NotStarted(SessionId::new("s-1"))));
    }

    #[test]
    fn test_submit_twice_same_round_is_rejected_when_guarded() {
        let mut s = active();
        s.submit_choice(p("a"), Choice::Rock).unwrap();

        let result = s.submit_choice(p("a"), Choice::Paper);

        assert!(matches!(result, Err(SessionError::AlreadyChose(..))));
        assert_eq!(s.pending_choices().len(), 1);
    }

    #[test]
    fn test_submit_twice_same_round_resolves_when_permissive() {
        let mut s = Session::new(SessionId::new("s-2"), false);
        s.join(p("a")).unwrap();
        s.join(p("b")).unwrap();
        s.submit_choice(p("a"), Choice::Rock).unwrap();

        let outcome = s.submit_choice(p("a"), Choice::Scissors).unwrap();

        assert!(matches!(outcome, ChoiceOutcome::RoundOver { .. }));
        assert_eq!(s.score().wins(&p("a")), Some(1));
        assert!(matches!(
            s.submit_choice(p("b"), Choice::Rock),
            Err(SessionError::RoundFull(_))
        ));
    }

    // =====================================================================
    // reset_choices()
    // =====================================================================

    #[test]
    fn test_reset_clears_pending_and_keeps_score() {
        let mut s = active();
        s.submit_choice(p("a"), Choice::Scissors).unwrap();
        s.submit_choice(p("b"), Choice::Paper).unwrap();
        let before = s.score().clone();

        let score = s.reset_choices();

        assert!(s.pending_choices().is_empty());
        assert_eq!(score, before);
        assert_eq!(s.score(), &before);
        assert_eq!(s.state(), SessionState::Active(RoundState::Open));
    }

    #[test]
    fn test_reset_on_empty_round_is_noop() {
        let mut s = active();
        let score = s.reset_choices();
        assert!(s.pending_choices().is_empty());
        assert_eq!(score.wins(&p("a")), Some(0));
    }

    // =====================================================================
    // rival_of() / remove_participant()
    // =====================================================================

    #[test]
    fn test_rival_of_is_symmetric() {
        let s = active();
        assert_eq!(s.rival_of(&p("a")).unwrap(), &p("b"));
        assert_eq!(s.rival_of(&p("b")).unwrap(), &p("a"));
    }

    #[test]
    fn test_rival_of_before_start_is_error() {
        let mut s = session();
        s.join(p("a")).unwrap();
        assert!(matches!(s.rival_of(&p("a")), Err(SessionError::NotStarted(_))));
        assert!(matches!(
            s.rival_of(&p("q")),
            Err(SessionError::UnknownParticipant(..))
        ));
    }

    #[test]
    fn test_remove_participant_keeps_score_and_drops_their_choice() {
        let mut s = active();
        s.submit_choice(p("b"), Choice::Rock).unwrap();

        let remaining = s.remove_participant(&p("b")).unwrap();

        assert_eq!(remaining, 1);
        assert_eq!(s.participants(), &[p("a")]);
        assert!(s.pending_choices().is_empty());
        assert_eq!(s.score().len(), 2);
        assert_eq!(s.state(), SessionState::Waiting);
    }

    #[test]
    fn test_remove_after_resolved_round_opens_next_round_for_newcomer() {
        let mut s = active();
        s.submit_choice(p("a"), Choice::Rock).unwrap();
        s.submit_choice(p("b"), Choice::Scissors).unwrap();

        s.remove_participant(&p("b")).unwrap();
        assert!(s.pending_choices().is_empty());

        s.join(p("c")).unwrap();
        assert_eq!(s.state(), SessionState::Active(RoundState::Open));

        let outcome = s.submit_choice(p("c"), Choice::Scissors).unwrap();
        assert_eq!(outcome, ChoiceOutcome::WaitingOnOpponent { rival: p("a") });
        assert_eq!(s.score().wins(&p("a")), Some(1));
        assert_eq!(s.score().wins(&p("c")), Some(0));
    }

    #[test]
    fn test_remove_unknown_participant_is_error() {
        let mut s = active();
        assert!(matches!(
            s.remove_participant(&p("z")),
            Err(SessionError::UnknownParticipant(..))
        ));
        assert_eq!(s.participants().len(), 2);
    }

    #[test]
    fn test_session_state_display() {
        assert_eq!(SessionState::Waiting.to_string(), "Waiting");
        assert_eq!(
            SessionState::Active(RoundState::Resolved).to_string(),
            "Active(Resolved)"
        );
        assert!(SessionState::Empty.is_joinable());
        assert!(!SessionState::Active(RoundState::Open).is_joinable());
        assert!(SessionState::Active(RoundState::Open).is_active());
    }
}
