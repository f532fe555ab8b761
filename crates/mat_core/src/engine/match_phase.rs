//! Period and overtime progression for a folkstyle bout.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::events::ScoreSnapshot;
use crate::models::wrestler::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    Period1,
    Period2,
    Period3,
    SuddenVictory,
    Tiebreaker1,
    Tiebreaker2,
    UltimateTiebreaker,
    Finished,
}

impl MatchPhase {
    pub fn is_regulation(self) -> bool {
        matches!(self, MatchPhase::Period1 | MatchPhase::Period2 | MatchPhase::Period3)
    }

    pub fn is_overtime(self) -> bool {
        matches!(
            self,
            MatchPhase::SuddenVictory
                | MatchPhase::Tiebreaker1
                | MatchPhase::Tiebreaker2
                | MatchPhase::UltimateTiebreaker
        )
    }

    /// Sudden-death phases end on the first scoring action. The tiebreaker
    /// rideouts run their full length regardless of scoring.
    pub fn is_sudden_death(self) -> bool {
        matches!(self, MatchPhase::SuddenVictory | MatchPhase::UltimateTiebreaker)
    }

    /// Ordinal used to compare phases chronologically.
    pub(crate) fn index(self) -> u8 {
        match self {
            MatchPhase::Period1 => 0,
            MatchPhase::Period2 => 1,
            MatchPhase::Period3 => 2,
            MatchPhase::SuddenVictory => 3,
            MatchPhase::Tiebreaker1 => 4,
            MatchPhase::Tiebreaker2 => 5,
            MatchPhase::UltimateTiebreaker => 6,
            MatchPhase::Finished => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchPhase::Period1 => "P1",
            MatchPhase::Period2 => "P2",
            MatchPhase::Period3 => "P3",
            MatchPhase::SuddenVictory => "SV",
            MatchPhase::Tiebreaker1 => "TB1",
            MatchPhase::Tiebreaker2 => "TB2",
            MatchPhase::UltimateTiebreaker => "UTB",
            MatchPhase::Finished => "F",
        }
    }
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Advance to the next phase after the current one ends.
///
/// `is_tied` should reflect the score at the end of the phase. Regulation
/// always runs three periods; overtime phases are entered only while tied.
/// The ultimate tiebreaker cannot stay tied: its exit is forced by the
/// operator-supplied criteria decision, so it always advances to finished.
pub fn next_phase(current: MatchPhase, is_tied: bool) -> MatchPhase {
    match current {
        MatchPhase::Period1 => MatchPhase::Period2,
        MatchPhase::Period2 => MatchPhase::Period3,
        MatchPhase::Period3 => {
            if is_tied {
                MatchPhase::SuddenVictory
            } else {
                MatchPhase::Finished
            }
        }
        MatchPhase::SuddenVictory => {
            if is_tied {
                MatchPhase::Tiebreaker1
            } else {
                MatchPhase::Finished
            }
        }
        MatchPhase::Tiebreaker1 => {
            if is_tied {
                MatchPhase::Tiebreaker2
            } else {
                MatchPhase::Finished
            }
        }
        MatchPhase::Tiebreaker2 => {
            if is_tied {
                MatchPhase::UltimateTiebreaker
            } else {
                MatchPhase::Finished
            }
        }
        MatchPhase::UltimateTiebreaker => MatchPhase::Finished,
        MatchPhase::Finished => MatchPhase::Finished,
    }
}

/// Per-phase score line. Three regulation records exist from the first
/// whistle; overtime records are created lazily when the phase is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub phase: MatchPhase,
    pub home_points: u8,
    pub away_points: u8,
    pub completed: bool,
}

impl PeriodRecord {
    pub fn new(phase: MatchPhase) -> Self {
        Self { phase, home_points: 0, away_points: 0, completed: false }
    }

    pub fn points(&self, side: Side) -> u8 {
        match side {
            Side::Home => self.home_points,
            Side::Away => self.away_points,
        }
    }

    /// Close the record with the score deltas accumulated over the phase.
    pub fn complete(&mut self, start: ScoreSnapshot, end: ScoreSnapshot) {
        self.home_points = end.home.saturating_sub(start.home);
        self.away_points = end.away.saturating_sub(start.away);
        self.completed = true;
    }
}
