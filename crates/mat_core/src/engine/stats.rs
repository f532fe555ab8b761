//! Aggregation of the event ledger into per-wrestler stat totals and the
//! finalized match record.

use std::time::Instant;

use crate::engine::match_phase::PeriodRecord;
use crate::engine::outcome::MatchOutcome;
use crate::engine::riding_time::RidingClock;
use crate::models::events::{ScoreSnapshot, ScoringAction, ScoringEvent};
use crate::models::match_record::{MatchRecord, WrestlerStatLine};
use crate::models::wrestler::{MatchParticipants, Side};

pub struct StatsCalculator;

impl StatsCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Fold the ledger into per-side stat lines. Riding-time seconds are not
    /// derivable from events; the caller supplies them from the riding clock.
    pub fn stat_lines(&self, events: &[ScoringEvent]) -> (WrestlerStatLine, WrestlerStatLine) {
        let mut home = WrestlerStatLine::default();
        let mut away = WrestlerStatLine::default();
        for event in events {
            let line = match event.wrestler {
                Side::Home => &mut home,
                Side::Away => &mut away,
            };
            match event.action {
                ScoringAction::Takedown => line.takedowns += 1,
                ScoringAction::Escape => line.escapes += 1,
                ScoringAction::Reversal => line.reversals += 1,
                ScoringAction::NearFall2 => line.near_falls_2 += 1,
                ScoringAction::NearFall3 => line.near_falls_3 += 1,
                ScoringAction::NearFall4 => line.near_falls_4 += 1,
                // infractions count against the committing wrestler
                ScoringAction::Penalty => line.penalties += 1,
                ScoringAction::Stalling => line.stalls += 1,
                ScoringAction::Caution => line.cautions += 1,
                ScoringAction::Warning => line.warnings += 1,
                ScoringAction::RidingTime
                | ScoringAction::Fall
                | ScoringAction::Forfeit
                | ScoringAction::MedicalForfeit
                | ScoringAction::Disqualification
                | ScoringAction::InjuryDefault => {}
            }
        }
        (home, away)
    }

    /// Assemble the persistence payload for a finished match.
    #[allow(clippy::too_many_arguments)]
    pub fn build_record(
        &self,
        participants: &MatchParticipants,
        final_score: ScoreSnapshot,
        outcome: &MatchOutcome,
        periods: &[PeriodRecord],
        events: &[ScoringEvent],
        riding: &RidingClock,
        now: Instant,
    ) -> MatchRecord {
        let (mut home_stats, mut away_stats) = self.stat_lines(events);
        home_stats.riding_time_seconds = riding.seconds(Side::Home, now);
        away_stats.riding_time_seconds = riding.seconds(Side::Away, now);
        MatchRecord {
            schema_version: crate::SCHEMA_VERSION,
            home: participants.home.clone(),
            away: participants.away.clone(),
            final_score,
            winner: outcome.winner,
            win_type: outcome.win_type,
            period_ended: outcome.phase_ended,
            pin_time_seconds: outcome.pin_time_seconds,
            home_stats,
            away_stats,
            periods: periods.to_vec(),
            events: events.to_vec(),
        }
    }
}

impl Default for StatsCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ledger::EventLedger;
    use crate::engine::match_phase::MatchPhase;

    #[test]
    fn test_stat_lines_count_by_acting_wrestler() {
        let mut ledger = EventLedger::new();
        for action in [
            ScoringAction::Takedown,
            ScoringAction::Takedown,
            ScoringAction::NearFall3,
            ScoringAction::Stalling,
        ] {
            ledger.record(Side::Home, action, MatchPhase::Period1, None, None, None);
        }
        ledger.record(Side::Away, ScoringAction::Escape, MatchPhase::Period2, None, None, None);
        ledger.record(Side::Away, ScoringAction::Penalty, MatchPhase::Period2, None, None, None);

        let (home, away) = StatsCalculator::new().stat_lines(ledger.events());
        assert_eq!(home.takedowns, 2);
        assert_eq!(home.near_falls_3, 1);
        // the stall is charged to home even though the point went to away
        assert_eq!(home.stalls, 1);
        assert_eq!(away.escapes, 1);
        assert_eq!(away.penalties, 1);
        assert_eq!(away.takedowns, 0);
    }

    #[test]
    fn test_terminal_and_bonus_events_do_not_inflate_counts() {
        let mut ledger = EventLedger::new();
        ledger.record(Side::Home, ScoringAction::RidingTime, MatchPhase::Period3, None, None, None);
        ledger.record(Side::Home, ScoringAction::Fall, MatchPhase::Period3, None, None, None);
        let (home, _) = StatsCalculator::new().stat_lines(ledger.events());
        assert_eq!(home, WrestlerStatLine::default());
    }
}
