//! Shared vocabulary for Roshambo.
//!
//! This crate defines the payloads that cross the boundary between the
//! session core and whatever transport delivers them to clients:
//!
//! - **Identity** ([`SessionId`], [`ParticipantId`]): opaque tokens.
//! - **Moves** ([`Choice`], [`RoundResult`], [`Score`]): what players
//!   submit and what a round produces.
//! - **Events** ([`ServerEvent`], [`Recipient`]): what the server tells
//!   clients, and who should hear it.
//! - **Errors** ([`ProtocolError`]): input that doesn't parse.
//!
//! Framing is the transport's business. Everything here derives serde
//! traits so the transport can encode it however it likes.
//!
//! ```text
//! Transport (frames) → Protocol (payloads) → Session core (state)
//! ```

mod error;
mod types;

pub use error::ProtocolError;
pub use types::{
    Choice, ParticipantId, Recipient, RoundResult, Score, ScoreEntry,
    ServerEvent, SessionId,
};
