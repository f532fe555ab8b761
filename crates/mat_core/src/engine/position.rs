use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, ScoringError};
use crate::models::wrestler::Side;

/// Referee's position call: who controls the mat, if anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatPosition {
    Neutral,
    Top,
    Bottom,
    OutOfBounds,
    RefereePosition,
}

impl MatPosition {
    /// Top and bottom are two views of the same control relation.
    pub fn is_controlled(self) -> bool {
        matches!(self, MatPosition::Top | MatPosition::Bottom)
    }
}

impl fmt::Display for MatPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatPosition::Neutral => "neutral",
            MatPosition::Top => "top",
            MatPosition::Bottom => "bottom",
            MatPosition::OutOfBounds => "out_of_bounds",
            MatPosition::RefereePosition => "referee_position",
        };
        f.write_str(name)
    }
}

/// Current mat position as a single `(position, controlling side)` pair.
///
/// `controlling` is always the wrestler on top. Storing one pair (rather than
/// independent top/bottom flags per wrestler) makes disagreement between the
/// two views unrepresentable: top for one wrestler is bottom for the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionState {
    position: MatPosition,
    #[serde(skip_serializing_if = "Option::is_none")]
    controlling: Option<Side>,
}

impl Default for PositionState {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionState {
    /// Matches start neutral.
    pub fn new() -> Self {
        Self { position: MatPosition::Neutral, controlling: None }
    }

    pub fn position(&self) -> MatPosition {
        self.position
    }

    /// Wrestler on top, set exactly when the position is top or bottom.
    pub fn controlling(&self) -> Option<Side> {
        self.controlling
    }

    pub fn is_controlled(&self) -> bool {
        self.position.is_controlled()
    }

    /// Apply a referee position call. Top/bottom require the controlling
    /// wrestler; the other positions must not carry one. On error the state
    /// is unchanged.
    pub fn set(&mut self, position: MatPosition, controlling: Option<Side>) -> Result<()> {
        if position.is_controlled() && controlling.is_none() {
            return Err(ScoringError::MissingControllingWrestler(position));
        }
        if !position.is_controlled() && controlling.is_some() {
            return Err(ScoringError::UnexpectedControllingWrestler(position));
        }
        self.position = position;
        self.controlling = controlling;
        Ok(())
    }
}
