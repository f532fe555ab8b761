//! Append-only scoring event ledger.
//!
//! Insertion order is the sole source of truth for score history: the score
//! at any point in time is the snapshot carried by the most recent event at
//! or before that point.

use chrono::Utc;
use uuid::Uuid;

use crate::engine::match_phase::MatchPhase;
use crate::engine::position::MatPosition;
use crate::error::{Result, ScoringError};
use crate::models::events::{ScoreSnapshot, ScoringAction, ScoringEvent};
use crate::models::wrestler::Side;

#[derive(Debug, Clone, Default)]
pub struct EventLedger {
    events: Vec<ScoringEvent>,
}

impl EventLedger {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append a scoring action. Points and credit side come from the fixed
    /// action table; penalty and stalling credit the opponent. Returns the
    /// created event.
    pub fn record(
        &mut self,
        wrestler: Side,
        action: ScoringAction,
        phase: MatchPhase,
        position: Option<MatPosition>,
        clock_seconds: Option<u32>,
        video_seconds: Option<f64>,
    ) -> &ScoringEvent {
        let points = action.points();
        let credited_to = if action.credits_opponent() { wrestler.opponent() } else { wrestler };
        let score = self.current_score().with_points(credited_to, points);
        let event = ScoringEvent {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            phase,
            wrestler,
            action,
            points,
            credited_to,
            position,
            clock_seconds,
            video_seconds,
            score,
        };
        log::debug!("{} {} by {} -> {}", phase, action, wrestler, score);
        self.events.push(event);
        self.events.last().expect("event was just pushed")
    }

    /// Remove and return the most recent event. The current score reverts to
    /// the previous event's snapshot (or zero when the ledger empties).
    pub fn undo_last(&mut self) -> Result<ScoringEvent> {
        self.events.pop().ok_or(ScoringError::EmptyLedger)
    }

    /// Score after the most recent event, zero before any scoring.
    pub fn current_score(&self) -> ScoreSnapshot {
        self.events.last().map(|e| e.score).unwrap_or_default()
    }

    pub fn events(&self) -> &[ScoringEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&ScoringEvent> {
        self.events.last()
    }

    pub fn events_for_phase(&self, phase: MatchPhase) -> Vec<&ScoringEvent> {
        self.events.iter().filter(|e| e.phase == phase).collect()
    }

    pub fn total_event_count(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Score at the start of `phase`: the snapshot of the last event that
    /// belongs to an earlier phase. Used to rebuild period deltas after undo.
    pub fn score_at_phase_start(&self, phase: MatchPhase) -> ScoreSnapshot {
        self.events
            .iter()
            .rev()
            .find(|e| e.phase.index() < phase.index())
            .map(|e| e.score)
            .unwrap_or_default()
    }
}
