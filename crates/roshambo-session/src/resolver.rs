//! Round resolution.
//!
//! The only algorithmic rule in the game: choices sit on the cycle
//! rock → scissors → paper → rock, and each choice beats the one that
//! follows it.

use roshambo_protocol::{Choice, ParticipantId, RoundResult};

/// One participant's move for the current round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub participant: ParticipantId,
    pub choice: Choice,
}

/// `(winner, loser)` pairs. Anything not listed here is a tie or a loss.
const DOMINANCE: [(Choice, Choice); 3] = [
    (Choice::Rock, Choice::Scissors),
    (Choice::Scissors, Choice::Paper),
    (Choice::Paper, Choice::Rock),
];

/// Returns `true` if `attacker` beats `defender`.
pub fn beats(attacker: Choice, defender: Choice) -> bool {
    DOMINANCE.contains(&(attacker, defender))
}

/// Resolves a round from two submissions, given in submission order.
///
/// The outcome does not depend on the order; it only decides which
/// participant is named when reporting. Equal choices tie.
pub fn resolve(first: &Submission, second: &Submission) -> RoundResult {
    if first.choice == second.choice {
        RoundResult::Tie
    } else if beats(first.choice, second.choice) {
        RoundResult::Winner(first.participant.clone())
    } else {
        RoundResult::Winner(second.participant.clone())
    }
}
