//! Registry configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`SessionRegistry`](crate::SessionRegistry).
///
/// Every session spawned by the registry shares these settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Length of generated session ids (alphanumeric characters).
    pub id_length: usize,

    /// Capacity of each session actor's command channel. Callers wait
    /// when it is full.
    pub channel_size: usize,

    /// When `true`, a participant may submit only one choice per round
    /// and a second attempt fails with `AlreadyChose`. When `false`, the
    /// only limit is two pending choices in total, so one participant
    /// can fill both slots.
    pub single_submission: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            id_length: 10,
            channel_size: 64,
            single_submission: true,
        }
    }
}
