//! Finalized match record handed to the persistence collaborator.
//!
//! This is the sink of the scoring pipeline: the event ledger, per-wrestler
//! stat totals, and the resolved outcome serialized into one payload. The
//! engine only produces this shape; storing it is the backend's concern.

use serde::{Deserialize, Serialize};

use crate::engine::match_phase::{MatchPhase, PeriodRecord};
use crate::engine::outcome::WinType;
use crate::models::events::{ScoreSnapshot, ScoringEvent};
use crate::models::wrestler::{Side, WrestlerRef};

/// Per-wrestler aggregate totals for one match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrestlerStatLine {
    pub takedowns: u8,
    pub escapes: u8,
    pub reversals: u8,
    pub near_falls_2: u8,
    pub near_falls_3: u8,
    pub near_falls_4: u8,
    /// Infractions committed (the points went to the opponent).
    pub penalties: u8,
    pub stalls: u8,
    pub cautions: u8,
    pub warnings: u8,
    pub riding_time_seconds: u32,
}

/// Complete record of a finished bout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub schema_version: u8,
    pub home: WrestlerRef,
    pub away: WrestlerRef,
    pub final_score: ScoreSnapshot,
    pub winner: Side,
    pub win_type: WinType,
    /// Phase in which the match ended.
    pub period_ended: MatchPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_time_seconds: Option<u32>,
    pub home_stats: WrestlerStatLine,
    pub away_stats: WrestlerStatLine,
    pub periods: Vec<PeriodRecord>,
    /// Ordered scoring events, insertion order preserved.
    pub events: Vec<ScoringEvent>,
}

impl MatchRecord {
    pub fn winner_ref(&self) -> &WrestlerRef {
        match self.winner {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn loser_ref(&self) -> &WrestlerRef {
        match self.winner {
            Side::Home => &self.away,
            Side::Away => &self.home,
        }
    }

    pub fn stats(&self, side: Side) -> &WrestlerStatLine {
        match side {
            Side::Home => &self.home_stats,
            Side::Away => &self.away_stats,
        }
    }

    /// Human-readable one-line result, team-sheet style, e.g.
    /// `Smith (Central) over Jones (North), Fall 2:41` or
    /// `Jones (North) over Smith (Central), Decision 7-3`.
    pub fn result_description(&self) -> String {
        let winner = self.winner_ref();
        let loser = self.loser_ref();
        let lead = format!(
            "{} ({}) over {} ({})",
            winner.name, winner.team, loser.name, loser.team
        );
        match self.win_type {
            WinType::Pin => match self.pin_time_seconds {
                Some(secs) => format!("{lead}, Fall {}", format_clock(secs)),
                None => format!("{lead}, Fall"),
            },
            WinType::TechFall | WinType::MajorDecision | WinType::Decision => {
                let (hi, lo) = winner_loser_points(self);
                format!("{lead}, {} {hi}-{lo}", self.win_type)
            }
            WinType::Forfeit
            | WinType::MedicalForfeit
            | WinType::Disqualification
            | WinType::InjuryDefault => format!("{lead}, {}", self.win_type),
        }
    }
}

fn winner_loser_points(record: &MatchRecord) -> (u8, u8) {
    let winner_points = record.final_score.points(record.winner);
    let loser_points = record.final_score.points(record.winner.opponent());
    (winner_points, loser_points)
}

/// `M:SS` match-clock formatting.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
