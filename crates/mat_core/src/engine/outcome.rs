//! Win-type classification and terminal outcome resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::match_phase::MatchPhase;
use crate::error::{Result, ScoringError};
use crate::models::events::{ScoreSnapshot, ScoringAction};
use crate::models::wrestler::Side;

/// Score differential that ends the match as a technical fall.
pub const TECH_FALL_DIFFERENTIAL: u8 = 15;
/// Lower bound of the major-decision band (upper bound is one below tech).
pub const MAJOR_DECISION_DIFFERENTIAL: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinType {
    Pin,
    TechFall,
    MajorDecision,
    Decision,
    Forfeit,
    MedicalForfeit,
    Disqualification,
    InjuryDefault,
}

impl WinType {
    /// Classify a non-terminal win purely by final score differential.
    /// The differential must be positive; tied scores have no win type.
    pub fn from_differential(differential: u8) -> Result<WinType> {
        match differential {
            0 => Err(ScoringError::TiedScore),
            d if d >= TECH_FALL_DIFFERENTIAL => Ok(WinType::TechFall),
            d if d >= MAJOR_DECISION_DIFFERENTIAL => Ok(WinType::MajorDecision),
            _ => Ok(WinType::Decision),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            WinType::Pin => "Fall",
            WinType::TechFall => "Tech Fall",
            WinType::MajorDecision => "Major Decision",
            WinType::Decision => "Decision",
            WinType::Forfeit => "Forfeit",
            WinType::MedicalForfeit => "Medical Forfeit",
            WinType::Disqualification => "Disqualification",
            WinType::InjuryDefault => "Injury Default",
        }
    }
}

impl fmt::Display for WinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Terminal state of a bout, created once when the match completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub winner: Side,
    pub win_type: WinType,
    /// Match-clock seconds of the fall, set for pins only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_time_seconds: Option<u32>,
    /// Phase in which the match ended.
    pub phase_ended: MatchPhase,
}

/// Resolve the outcome from the final score and the terminal event, if any.
///
/// A terminal event determines the win type unconditionally: the pinning
/// wrestler wins a fall, and the opponent of a forfeiting / defaulting /
/// disqualified wrestler wins those. Without a terminal event the win type is
/// derived from the score differential alone, so the score must not be tied.
pub fn resolve_outcome(
    final_score: ScoreSnapshot,
    terminal: Option<(Side, ScoringAction)>,
    pin_time_seconds: Option<u32>,
    phase_ended: MatchPhase,
) -> Result<MatchOutcome> {
    if let Some((acting, action)) = terminal {
        let (winner, win_type) = match action {
            ScoringAction::Fall => (acting, WinType::Pin),
            ScoringAction::Forfeit => (acting.opponent(), WinType::Forfeit),
            ScoringAction::MedicalForfeit => (acting.opponent(), WinType::MedicalForfeit),
            ScoringAction::Disqualification => (acting.opponent(), WinType::Disqualification),
            ScoringAction::InjuryDefault => (acting.opponent(), WinType::InjuryDefault),
            // non-terminal actions never resolve a match on their own
            _ => {
                let winner = final_score.leader().ok_or(ScoringError::TiedScore)?;
                let win_type = WinType::from_differential(final_score.differential())?;
                return Ok(MatchOutcome { winner, win_type, pin_time_seconds: None, phase_ended });
            }
        };
        let pin_time = if win_type == WinType::Pin { pin_time_seconds } else { None };
        return Ok(MatchOutcome { winner, win_type, pin_time_seconds: pin_time, phase_ended });
    }

    let winner = final_score.leader().ok_or(ScoringError::TiedScore)?;
    let win_type = WinType::from_differential(final_score.differential())?;
    Ok(MatchOutcome { winner, win_type, pin_time_seconds: None, phase_ended })
}
