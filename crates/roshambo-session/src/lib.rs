//! Session lifecycle and round resolution for Roshambo.
//!
//! Each session runs as an isolated Tokio task (actor model) that owns
//! one [`Session`] state machine. Every operation on a session is a
//! message on its channel, so operations on the same session never
//! interleave while different sessions proceed independently.
//!
//! # Key types
//!
//! - [`resolve`]: the pure round resolver
//! - [`Session`]: the per-match state machine
//! - [`SessionHandle`]: send commands to a running session actor
//! - [`SessionRegistry`]: creates/destroys sessions, finds participants
//! - [`RegistryConfig`]: id length, channel size, submission rules
//!
//! # How it fits in the stack
//!
//! ```text
//! Gateway (above)  ← turns outcomes into events for the transport
//!     ↕
//! Session layer (this crate)  ← owns sessions and their rules
//!     ↕
//! Protocol layer (below)  ← provides ids, Choice, Score
//! ```

mod actor;
mod config;
mod error;
mod registry;
mod resolver;
mod session;

pub use actor::SessionHandle;
pub use config::RegistryConfig;
pub use error::SessionError;
pub use registry::SessionRegistry;
pub use resolver::{Submission, beats, resolve};
pub use session::{
    ChoiceOutcome, JoinOutcome, MAX_PARTICIPANTS, RoundState, Session,
    SessionInfo, SessionState,
};
