//! # Roshambo
//!
//! Two-player rock-paper-scissors sessions behind an event-style gateway.
//!
//! The transport (sockets, rooms, framing) lives outside this crate. It
//! calls into a [`Gateway`] for every client request and delivers the
//! `(Recipient, ServerEvent)` pairs it gets back.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roshambo::prelude::*;
//!
//! # async fn demo() -> Result<(), RoshamboError> {
//! roshambo::telemetry::init();
//! let gateway = Gateway::new(SessionRegistry::new());
//!
//! let created = gateway.create(ParticipantId::new("sock-a")).await;
//! # let session_id = SessionId::new("from-created");
//! // transport: deliver `created`, then on "join" from each client:
//! let dispatches = gateway.join(&session_id, ParticipantId::new("sock-a")).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod gateway;
pub mod telemetry;

pub use error::RoshamboError;
pub use gateway::{Dispatch, Gateway};

pub mod prelude {
    pub use crate::{Dispatch, Gateway, RoshamboError};
    pub use roshambo_protocol::{
        Choice, ParticipantId, Recipient, RoundResult, Score, ServerEvent,
        SessionId,
    };
    pub use roshambo_session::{RegistryConfig, SessionError, SessionRegistry};
}
