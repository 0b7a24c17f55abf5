//! Core payload types shared by the session core and the transport.
//!
//! Nothing here knows about channels, actors, or sockets. These are the
//! plain values that get handed to the transport for delivery.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// An opaque token naming one live session.
///
/// Generated by the registry; clients only ever echo it back. Serializes
/// as a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps an already-generated token.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ProtocolError::EmptyIdentifier("session"));
        }
        Ok(Self(s.to_string()))
    }
}

/// An opaque token naming one remote player.
///
/// The transport decides what this is (a socket id, a user id). The core
/// only compares them for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ParticipantId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ProtocolError::EmptyIdentifier("participant"));
        }
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Choice
// ---------------------------------------------------------------------------

/// One move in a round.
///
/// On the wire these are the lowercase strings `"rock"`, `"paper"` and
/// `"scissors"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    /// Every choice, in wire order.
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Choice {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rock" => Ok(Self::Rock),
            "paper" => Ok(Self::Paper),
            "scissors" => Ok(Self::Scissors),
            other => Err(ProtocolError::InvalidChoice(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// RoundResult and Score
// ---------------------------------------------------------------------------

/// How a round ended.
///
/// Adjacently tagged so a tie is `{"outcome":"tie"}` and a win is
/// `{"outcome":"winner","winner":"<participant>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "winner", rename_all = "lowercase")]
pub enum RoundResult {
    Tie,
    Winner(ParticipantId),
}

impl RoundResult {
    /// Returns the winning participant, or `None` on a tie.
    pub fn winner(&self) -> Option<&ParticipantId> {
        match self {
            Self::Tie => None,
            Self::Winner(p) => Some(p),
        }
    }
}

/// One participant's running tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub participant: ParticipantId,
    pub wins: u32,
}

/// The running score of a session, in the order of its current participants.
///
/// Empty until the second participant joins; from then on it holds
/// exactly one entry per participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(Vec<ScoreEntry>);

impl Score {
    /// An empty score (session not yet started).
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// A fresh score with both participants at zero.
    pub fn for_pair(first: ParticipantId, second: ParticipantId) -> Self {
        Self(vec![
            ScoreEntry { participant: first, wins: 0 },
            ScoreEntry { participant: second, wins: 0 },
        ])
    }

    /// Returns `participant`'s win count, if they have an entry.
    pub fn wins(&self, participant: &ParticipantId) -> Option<u32> {
        self.entry(participant).map(|e| e.wins)
    }

    /// Adds one win to `participant`. Returns `false` if they have no entry.
    pub fn award(&mut self, participant: &ParticipantId) -> bool {
        match self.0.iter_mut().find(|e| &e.participant == participant) {
            Some(entry) => {
                entry.wins = entry.wins.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Rebuilds the score for a new pair, in the given order.
    ///
    /// Anyone already holding an entry keeps their tally; a newcomer
    /// starts at zero. Entries for anyone else are dropped.
    pub fn carry_over(&self, first: ParticipantId, second: ParticipantId) -> Self {
        let carry = |participant: ParticipantId| ScoreEntry {
            wins: self.wins(&participant).unwrap_or(0),
            participant,
        };
        Self(vec![carry(first), carry(second)])
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.entry(participant).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoreEntry> {
        self.0.iter()
    }

    fn entry(&self, participant: &ParticipantId) -> Option<&ScoreEntry> {
        self.0.iter().find(|e| &e.participant == participant)
    }
}

// ---------------------------------------------------------------------------
// Recipient and ServerEvent
// ---------------------------------------------------------------------------

/// Who should receive a server event.
///
/// The core never fans out messages itself. It names a target and the
/// transport resolves it to connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// One specific client.
    Participant(ParticipantId),

    /// Everyone subscribed to this session's room.
    Session(SessionId),
}

/// Events the server emits to clients.
///
/// `#[serde(tag = "type")]` gives internally tagged JSON, e.g.
/// `{ "type": "Started", "score": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// A new session exists; the requester should join it.
    Created { session_id: SessionId },

    /// The join was refused because two participants are already in.
    SessionFull { session_id: SessionId },

    /// One participant is present and waiting for an opponent.
    WaitingForPlayer,

    /// Both participants are present; a round is open.
    Started { score: Score },

    /// The opponent has chosen and is waiting on you.
    WaitingForMove,

    /// Both choices are in.
    RoundOver { result: RoundResult, score: Score },
}
