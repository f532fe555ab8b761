use serde::{Deserialize, Serialize};
use std::fmt;

/// Which corner of the mat a wrestler starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    /// Stable index for per-side arrays.
    pub(crate) fn index(self) -> usize {
        match self {
            Side::Home => 0,
            Side::Away => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Home => write!(f, "home"),
            Side::Away => write!(f, "away"),
        }
    }
}

/// Identity of one wrestler, immutable for the duration of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrestlerRef {
    pub id: String,
    pub name: String,
    pub team: String,
}

impl WrestlerRef {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        team: impl Into<String>,
    ) -> Self {
        Self { id: id.into(), name: name.into(), team: team.into() }
    }
}

/// Both wrestlers of a bout, keyed by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchParticipants {
    pub home: WrestlerRef,
    pub away: WrestlerRef,
}

impl MatchParticipants {
    pub fn new(home: WrestlerRef, away: WrestlerRef) -> Self {
        Self { home, away }
    }

    pub fn wrestler(&self, side: Side) -> &WrestlerRef {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }
}
