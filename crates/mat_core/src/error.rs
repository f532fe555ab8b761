use thiserror::Error;

use crate::engine::position::MatPosition;

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("{0} requires a controlling wrestler")]
    MissingControllingWrestler(MatPosition),

    #[error("{0} does not take a controlling wrestler")]
    UnexpectedControllingWrestler(MatPosition),

    #[error("Cannot undo: the event ledger is empty")]
    EmptyLedger,

    #[error("Match is already complete")]
    MatchAlreadyComplete,

    #[error("Match is not complete")]
    MatchNotComplete,

    #[error("Unknown scoring action: {0}")]
    UnknownAction(String),

    #[error("Score is tied: no outcome can be resolved")]
    TiedScore,

    #[error("Only valid during the ultimate tiebreaker")]
    NotInUltimateTiebreaker,
}

impl ScoringError {
    /// Whether the operator can retry after correcting input. Every variant
    /// here is local and recoverable; the match state is unchanged on error.
    pub fn is_recoverable(&self) -> bool {
        true
    }
}

pub type Result<T> = std::result::Result<T, ScoringError>;
