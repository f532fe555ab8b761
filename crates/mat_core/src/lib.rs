//! # mat_core - Wrestling Match Scoring Engine
//!
//! This library implements folkstyle wrestling match scoring as a pure state
//! machine, independent of any rendering framework. The scoring UI issues
//! operation calls (record action, set position, advance period, undo) and
//! reads current score/state for rendering; persistence and video layers
//! consume the serialized match record.
//!
//! ## Features
//! - Append-only scoring event ledger with running score snapshots
//! - Analytic riding-time accumulation (no polling drift)
//! - Period/overtime progression through sudden victory and tiebreakers
//! - Active stopping rules: fall, tech fall, sudden-death scoring
//! - JSON scoring-script API for out-of-process consumers

pub mod api;
pub mod engine;
pub mod error;
pub mod models;

// Re-export the main API surface
pub use api::{score_match, score_match_json, ScoreMatchRequest, ScriptCommand};
pub use error::{Result, ScoringError};

pub use engine::{
    next_phase, ActionOutcome, EventLedger, MatPosition, MatchOutcome, MatchPhase, MatchScorer,
    PeriodRecord, PositionState, RidingClock, StatsCalculator, WinType,
    RIDING_TIME_BONUS_THRESHOLD, TECH_FALL_DIFFERENTIAL,
};
pub use models::{
    format_clock, MatchParticipants, MatchRecord, ScoreSnapshot, ScoringAction, ScoringEvent,
    Side, WrestlerRef, WrestlerStatLine,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
