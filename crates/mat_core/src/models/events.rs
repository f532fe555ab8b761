use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::engine::match_phase::MatchPhase;
use crate::engine::position::MatPosition;
use crate::error::ScoringError;
use crate::models::wrestler::Side;

/// Discrete scoring action as called by the referee.
///
/// Point values follow the folkstyle table. Penalty and stalling points are
/// credited to the opponent of the acting wrestler, never to the wrestler who
/// committed the infraction. Terminal actions end the match and carry no
/// incremental points; the fall's time is kept on the event's clock seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum ScoringAction {
    Takedown,
    Escape,
    Reversal,
    #[serde(rename = "near_fall_2")]
    NearFall2,
    #[serde(rename = "near_fall_3")]
    NearFall3,
    #[serde(rename = "near_fall_4")]
    NearFall4,
    Penalty,
    Stalling,
    Caution,
    Warning,
    /// Appended by the engine, exactly once per match, when net riding-time
    /// advantage first reaches 60 seconds.
    RidingTime,
    Fall,
    Forfeit,
    MedicalForfeit,
    Disqualification,
    InjuryDefault,
}

impl ScoringAction {
    /// Fixed point value of the action.
    pub fn points(self) -> u8 {
        match self {
            ScoringAction::Takedown => 2,
            ScoringAction::Escape => 1,
            ScoringAction::Reversal => 2,
            ScoringAction::NearFall2 => 2,
            ScoringAction::NearFall3 => 3,
            ScoringAction::NearFall4 => 4,
            ScoringAction::Penalty => 1,
            ScoringAction::Stalling => 1,
            ScoringAction::RidingTime => 1,
            ScoringAction::Caution
            | ScoringAction::Warning
            | ScoringAction::Fall
            | ScoringAction::Forfeit
            | ScoringAction::MedicalForfeit
            | ScoringAction::Disqualification
            | ScoringAction::InjuryDefault => 0,
        }
    }

    /// Infractions score for the opponent of the acting wrestler.
    pub fn credits_opponent(self) -> bool {
        matches!(self, ScoringAction::Penalty | ScoringAction::Stalling)
    }

    /// Terminal actions end the match immediately, at any score.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ScoringAction::Fall
                | ScoringAction::Forfeit
                | ScoringAction::MedicalForfeit
                | ScoringAction::Disqualification
                | ScoringAction::InjuryDefault
        )
    }

    /// Wire name, matching the serde representation.
    pub fn name(self) -> &'static str {
        match self {
            ScoringAction::Takedown => "takedown",
            ScoringAction::Escape => "escape",
            ScoringAction::Reversal => "reversal",
            ScoringAction::NearFall2 => "near_fall_2",
            ScoringAction::NearFall3 => "near_fall_3",
            ScoringAction::NearFall4 => "near_fall_4",
            ScoringAction::Penalty => "penalty",
            ScoringAction::Stalling => "stalling",
            ScoringAction::Caution => "caution",
            ScoringAction::Warning => "warning",
            ScoringAction::RidingTime => "riding_time",
            ScoringAction::Fall => "fall",
            ScoringAction::Forfeit => "forfeit",
            ScoringAction::MedicalForfeit => "medical_forfeit",
            ScoringAction::Disqualification => "disqualification",
            ScoringAction::InjuryDefault => "injury_default",
        }
    }
}

impl fmt::Display for ScoringAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScoringAction {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "takedown" => Ok(ScoringAction::Takedown),
            "escape" => Ok(ScoringAction::Escape),
            "reversal" => Ok(ScoringAction::Reversal),
            "near_fall_2" => Ok(ScoringAction::NearFall2),
            "near_fall_3" => Ok(ScoringAction::NearFall3),
            "near_fall_4" => Ok(ScoringAction::NearFall4),
            "penalty" => Ok(ScoringAction::Penalty),
            "stalling" => Ok(ScoringAction::Stalling),
            "caution" => Ok(ScoringAction::Caution),
            "warning" => Ok(ScoringAction::Warning),
            "riding_time" => Ok(ScoringAction::RidingTime),
            "fall" => Ok(ScoringAction::Fall),
            "forfeit" => Ok(ScoringAction::Forfeit),
            "medical_forfeit" => Ok(ScoringAction::MedicalForfeit),
            "disqualification" => Ok(ScoringAction::Disqualification),
            "injury_default" => Ok(ScoringAction::InjuryDefault),
            other => Err(ScoringError::UnknownAction(other.to_string())),
        }
    }
}

/// Cumulative team score at a point in the match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub home: u8,
    pub away: u8,
}

impl ScoreSnapshot {
    pub fn points(&self, side: Side) -> u8 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    pub fn with_points(mut self, side: Side, points: u8) -> Self {
        match side {
            Side::Home => self.home = self.home.saturating_add(points),
            Side::Away => self.away = self.away.saturating_add(points),
        }
        self
    }

    pub fn is_tied(&self) -> bool {
        self.home == self.away
    }

    /// Absolute score differential.
    pub fn differential(&self) -> u8 {
        self.home.abs_diff(self.away)
    }

    /// Side currently ahead, `None` when tied.
    pub fn leader(&self) -> Option<Side> {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl fmt::Display for ScoreSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// One entry of the append-only scoring ledger. Immutable once created;
/// removal happens only through an explicit undo of the most recent event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringEvent {
    pub id: Uuid,
    /// Wall-clock time the action was recorded.
    pub timestamp: DateTime<Utc>,
    /// Period or overtime phase the action was scored in.
    pub phase: MatchPhase,
    /// The acting wrestler. For infractions this is the offender.
    pub wrestler: Side,
    pub action: ScoringAction,
    pub points: u8,
    /// Side whose score the points joined (differs from `wrestler` for
    /// penalty and stalling).
    pub credited_to: Side,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<MatPosition>,
    /// Match-clock elapsed seconds when the action was recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_seconds: Option<u32>,
    /// Seconds since recording start, for the video timeline collaborator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_seconds: Option<f64>,
    /// Cumulative score after this event was applied.
    pub score: ScoreSnapshot,
}
