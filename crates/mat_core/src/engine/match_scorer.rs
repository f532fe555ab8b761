//! Live match scoring session.
//!
//! `MatchScorer` is the single entry point the scoring UI drives: it owns the
//! event ledger, mat position, match clock, riding clock, and phase
//! progression, and enforces the stopping rules (fall, tech fall,
//! sudden-death scoring) as events are recorded rather than classifying them
//! after the final whistle.

use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::engine::ledger::EventLedger;
use crate::engine::match_phase::{next_phase, MatchPhase, PeriodRecord};
use crate::engine::outcome::{resolve_outcome, MatchOutcome, WinType, TECH_FALL_DIFFERENTIAL};
use crate::engine::position::{MatPosition, PositionState};
use crate::engine::riding_time::RidingClock;
use crate::engine::stats::StatsCalculator;
use crate::error::{Result, ScoringError};
use crate::models::events::{ScoreSnapshot, ScoringAction, ScoringEvent};
use crate::models::match_record::MatchRecord;
use crate::models::wrestler::{MatchParticipants, Side};

/// Match clock, committed analytically on pause rather than ticked.
#[derive(Debug, Clone, Copy)]
enum ClockState {
    Stopped { elapsed: Duration },
    Running { start: Instant, elapsed_at_start: Duration },
}

impl ClockState {
    fn is_running(&self) -> bool {
        matches!(self, ClockState::Running { .. })
    }

    fn elapsed(&self, now: Instant) -> Duration {
        match self {
            ClockState::Stopped { elapsed } => *elapsed,
            ClockState::Running { start, elapsed_at_start } => {
                *elapsed_at_start + now.saturating_duration_since(*start)
            }
        }
    }
}

/// Result of recording a scoring action.
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    /// Event appended, match continues.
    Recorded { event: ScoringEvent },
    /// Event appended and it (or the riding-time bonus it triggered) ended
    /// the match.
    MatchEnded { event: ScoringEvent, outcome: MatchOutcome },
}

#[derive(Debug, Clone)]
pub struct MatchScorer {
    participants: MatchParticipants,
    ledger: EventLedger,
    position: PositionState,
    riding: RidingClock,
    clock: ClockState,
    phase: MatchPhase,
    periods: Vec<PeriodRecord>,
    period_start_score: ScoreSnapshot,
    outcome: Option<MatchOutcome>,
    /// Event whose recording ended the match, when it ended on an event.
    ended_by_event: Option<Uuid>,
}

impl MatchScorer {
    pub fn new(participants: MatchParticipants) -> Self {
        Self {
            participants,
            ledger: EventLedger::new(),
            position: PositionState::new(),
            riding: RidingClock::new(),
            clock: ClockState::Stopped { elapsed: Duration::ZERO },
            phase: MatchPhase::Period1,
            // three regulation periods exist up front; overtime is lazy
            periods: vec![
                PeriodRecord::new(MatchPhase::Period1),
                PeriodRecord::new(MatchPhase::Period2),
                PeriodRecord::new(MatchPhase::Period3),
            ],
            period_start_score: ScoreSnapshot::default(),
            outcome: None,
            ended_by_event: None,
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.phase == MatchPhase::Finished {
            return Err(ScoringError::MatchAlreadyComplete);
        }
        Ok(())
    }

    /// Start (or resume) the match clock. Riding accumulation resumes with it
    /// when a wrestler currently controls the mat.
    pub fn start_clock(&mut self, now: Instant) -> Result<()> {
        self.ensure_open()?;
        if !self.clock.is_running() {
            self.clock =
                ClockState::Running { start: now, elapsed_at_start: self.clock.elapsed(now) };
            if let Some(controlling) = self.position.controlling() {
                self.riding.start(controlling, now);
            }
        }
        Ok(())
    }

    /// Pause the match clock, freezing riding accumulation for both sides.
    pub fn stop_clock(&mut self, now: Instant) -> Result<()> {
        self.ensure_open()?;
        self.clock = ClockState::Stopped { elapsed: self.clock.elapsed(now) };
        self.riding.stop(now);
        self.fire_riding_bonus(now);
        Ok(())
    }

    /// Apply a referee position call. Moving into top/bottom starts riding
    /// accumulation for the controlling wrestler (clock permitting); moving
    /// out freezes it for both.
    pub fn set_position(
        &mut self,
        position: MatPosition,
        controlling: Option<Side>,
        now: Instant,
    ) -> Result<()> {
        self.ensure_open()?;
        self.position.set(position, controlling)?;
        match self.position.controlling() {
            Some(side) if self.clock.is_running() => self.riding.start(side, now),
            _ => self.riding.stop(now),
        }
        self.fire_riding_bonus(now);
        Ok(())
    }

    /// Record a scoring action for `wrestler` and run the stopping rules.
    ///
    /// Terminal actions (fall, forfeit, disqualification, defaults) end the
    /// match immediately at any score. Otherwise the tech-fall threshold is
    /// checked after the event lands, and sudden-death phases end on any
    /// scored point.
    pub fn record_action(
        &mut self,
        wrestler: Side,
        action: ScoringAction,
        now: Instant,
        position: Option<MatPosition>,
        video_seconds: Option<f64>,
    ) -> Result<ActionOutcome> {
        self.ensure_open()?;
        let clock_seconds = self.clock.elapsed(now).as_secs() as u32;
        let position = position.or(Some(self.position.position()));

        let event = self
            .ledger
            .record(wrestler, action, self.phase, position, Some(clock_seconds), video_seconds)
            .clone();

        if action.is_terminal() {
            let pin_time = (action == ScoringAction::Fall).then_some(clock_seconds);
            let outcome =
                self.finish(Some((wrestler, action)), pin_time, Some(event.id), now)?;
            return Ok(ActionOutcome::MatchEnded { event, outcome });
        }

        if self.ends_on_score(&event) {
            let outcome = self.finish(None, None, Some(event.id), now)?;
            return Ok(ActionOutcome::MatchEnded { event, outcome });
        }

        self.fire_riding_bonus(now);
        if let Some(outcome) = self.outcome {
            // the riding-time bonus point crossed a stopping threshold
            return Ok(ActionOutcome::MatchEnded { event, outcome });
        }
        Ok(ActionOutcome::Recorded { event })
    }

    /// End the current period and move to the next phase. Entering overtime
    /// requires a tied score; a decided score after period 3 (or any
    /// overtime phase) completes the match. Advancing out of the ultimate
    /// tiebreaker without a judge decision is rejected.
    pub fn advance_period(&mut self, now: Instant) -> Result<MatchPhase> {
        self.ensure_open()?;
        self.halt_clocks(now);
        self.fire_riding_bonus(now);
        if self.phase == MatchPhase::Finished {
            // the end-of-period riding bonus crossed a stopping threshold
            return Ok(self.phase);
        }

        let score = self.ledger.current_score();
        let next = next_phase(self.phase, score.is_tied());
        if next == MatchPhase::Finished {
            self.finish(None, None, None, now)?;
        } else {
            self.complete_current_period();
            log::info!("period advance: {} -> {} at {}", self.phase, next, score);
            self.phase = next;
            if !self.periods.iter().any(|p| p.phase == next) {
                self.periods.push(PeriodRecord::new(next));
            }
            self.period_start_score = score;
        }
        Ok(self.phase)
    }

    /// Forced decision out of the ultimate tiebreaker: the winner comes from
    /// the referee's criteria judgment, not from this engine.
    pub fn decide_ultimate_tiebreaker(
        &mut self,
        winner: Side,
        now: Instant,
    ) -> Result<MatchOutcome> {
        self.ensure_open()?;
        if self.phase != MatchPhase::UltimateTiebreaker {
            return Err(ScoringError::NotInUltimateTiebreaker);
        }
        self.halt_clocks(now);
        self.fire_riding_bonus(now);
        if let Some(outcome) = self.outcome {
            return Ok(outcome);
        }

        self.complete_current_period();
        let outcome = MatchOutcome {
            winner,
            win_type: WinType::Decision,
            pin_time_seconds: None,
            phase_ended: MatchPhase::UltimateTiebreaker,
        };
        log::info!("ultimate tiebreaker decided for {winner}");
        self.outcome = Some(outcome);
        self.ended_by_event = None;
        self.phase = MatchPhase::Finished;
        Ok(outcome)
    }

    /// Remove the most recent event and roll the score back to the previous
    /// snapshot. Undoing the event that ended the match reopens it in the
    /// phase that event was scored in; undoing the riding-time bonus re-arms
    /// its latch. Position and riding accumulation are not reconstructed.
    pub fn undo_last(&mut self) -> Result<ScoringEvent> {
        if self.phase == MatchPhase::Finished {
            let last_id = self.ledger.last().map(|e| e.id);
            if self.ended_by_event.is_none() || self.ended_by_event != last_id {
                return Err(ScoringError::MatchAlreadyComplete);
            }
        }

        let event = self.ledger.undo_last()?;
        if event.action == ScoringAction::RidingTime {
            self.riding.rearm_bonus();
        }
        if self.ended_by_event == Some(event.id) {
            log::info!("undo reopens the match in {}", event.phase);
            self.phase = event.phase;
            self.outcome = None;
            self.ended_by_event = None;
            self.period_start_score = self.ledger.score_at_phase_start(event.phase);
            if let Some(record) = self.periods.iter_mut().find(|p| p.phase == event.phase) {
                record.completed = false;
            }
        }
        self.rebuild_period_points();
        Ok(event)
    }

    /// UI read hook: fold in elapsed riding time and append the bonus event
    /// if the threshold has been reached since the last observation.
    pub fn poll_riding_bonus(&mut self, now: Instant) -> Option<ScoringEvent> {
        self.fire_riding_bonus(now)
    }

    /// Serialize the finished match for the persistence collaborator.
    pub fn finalize(&self, now: Instant) -> Result<MatchRecord> {
        let outcome = self.outcome.as_ref().ok_or(ScoringError::MatchNotComplete)?;
        Ok(StatsCalculator::new().build_record(
            &self.participants,
            self.ledger.current_score(),
            outcome,
            &self.periods,
            self.ledger.events(),
            &self.riding,
            now,
        ))
    }

    // ---- accessors ----------------------------------------------------

    pub fn participants(&self) -> &MatchParticipants {
        &self.participants
    }

    pub fn current_score(&self) -> ScoreSnapshot {
        self.ledger.current_score()
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn position(&self) -> &PositionState {
        &self.position
    }

    pub fn outcome(&self) -> Option<&MatchOutcome> {
        self.outcome.as_ref()
    }

    pub fn events(&self) -> &[ScoringEvent] {
        self.ledger.events()
    }

    pub fn events_for_phase(&self, phase: MatchPhase) -> Vec<&ScoringEvent> {
        self.ledger.events_for_phase(phase)
    }

    pub fn total_event_count(&self) -> usize {
        self.ledger.total_event_count()
    }

    pub fn periods(&self) -> &[PeriodRecord] {
        &self.periods
    }

    pub fn clock_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn clock_seconds(&self, now: Instant) -> u32 {
        self.clock.elapsed(now).as_secs() as u32
    }

    pub fn riding_seconds(&self, side: Side, now: Instant) -> u32 {
        self.riding.seconds(side, now)
    }

    pub fn riding_advantage(&self, now: Instant) -> Option<(Side, u32)> {
        let side = self.riding.advantage_side(now)?;
        Some((side, self.riding.net_advantage(now).as_secs() as u32))
    }

    // ---- internals ----------------------------------------------------

    fn halt_clocks(&mut self, now: Instant) {
        self.clock = ClockState::Stopped { elapsed: self.clock.elapsed(now) };
        self.riding.stop(now);
    }

    /// Stopping rules evaluated after a non-terminal event lands.
    fn ends_on_score(&self, event: &ScoringEvent) -> bool {
        let score = self.ledger.current_score();
        score.differential() >= TECH_FALL_DIFFERENTIAL
            || (self.phase.is_sudden_death() && event.points > 0)
    }

    fn finish(
        &mut self,
        terminal: Option<(Side, ScoringAction)>,
        pin_time_seconds: Option<u32>,
        ended_by: Option<Uuid>,
        now: Instant,
    ) -> Result<MatchOutcome> {
        let outcome = resolve_outcome(
            self.ledger.current_score(),
            terminal,
            pin_time_seconds,
            self.phase,
        )?;
        self.halt_clocks(now);
        self.complete_current_period();
        log::info!(
            "match complete in {}: {} by {}",
            outcome.phase_ended,
            outcome.win_type,
            outcome.winner
        );
        self.outcome = Some(outcome);
        self.ended_by_event = ended_by;
        self.phase = MatchPhase::Finished;
        Ok(outcome)
    }

    fn complete_current_period(&mut self) {
        let score = self.ledger.current_score();
        let start = self.period_start_score;
        if let Some(record) = self.periods.iter_mut().find(|p| p.phase == self.phase) {
            record.complete(start, score);
        }
    }

    /// Recompute every period's score deltas from the ledger. Keeps the
    /// period lines consistent when an undo reaches back past a period
    /// boundary.
    fn rebuild_period_points(&mut self) {
        let ledger = &self.ledger;
        for record in &mut self.periods {
            let start = ledger.score_at_phase_start(record.phase);
            let end = ledger
                .events_for_phase(record.phase)
                .last()
                .map(|e| e.score)
                .unwrap_or(start);
            record.home_points = end.home.saturating_sub(start.home);
            record.away_points = end.away.saturating_sub(start.away);
        }
    }

    fn fire_riding_bonus(&mut self, now: Instant) -> Option<ScoringEvent> {
        if self.phase == MatchPhase::Finished {
            return None;
        }
        let side = self.riding.check_bonus(now)?;
        let clock_seconds = self.clock.elapsed(now).as_secs() as u32;
        let event = self
            .ledger
            .record(side, ScoringAction::RidingTime, self.phase, None, Some(clock_seconds), None)
            .clone();
        if self.ends_on_score(&event) {
            // the bonus point itself can cross a stopping threshold
            if let Err(err) = self.finish(None, None, Some(event.id), now) {
                log::warn!("riding bonus could not finish the match: {err}");
            }
        }
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::wrestler::WrestlerRef;

    fn scorer() -> MatchScorer {
        MatchScorer::new(MatchParticipants::new(
            WrestlerRef::new("w1", "Smith", "Central"),
            WrestlerRef::new("w2", "Jones", "North"),
        ))
    }

    fn t(base: Instant, secs: u64) -> Instant {
        base + Duration::from_secs(secs)
    }

    fn record(
        scorer: &mut MatchScorer,
        side: Side,
        action: ScoringAction,
        now: Instant,
    ) -> ActionOutcome {
        scorer.record_action(side, action, now, None, None).unwrap()
    }

    #[test]
    fn test_period_one_scoring_and_advance() {
        let base = Instant::now();
        let mut scorer = scorer();
        record(&mut scorer, Side::Home, ScoringAction::Takedown, base);
        record(&mut scorer, Side::Home, ScoringAction::NearFall3, t(base, 30));
        assert_eq!(scorer.current_score(), ScoreSnapshot { home: 5, away: 0 });
        record(&mut scorer, Side::Away, ScoringAction::Escape, t(base, 60));
        assert_eq!(scorer.current_score(), ScoreSnapshot { home: 5, away: 1 });

        assert_eq!(scorer.advance_period(t(base, 120)).unwrap(), MatchPhase::Period2);
        let p1 = scorer.periods()[0];
        assert_eq!(p1.phase, MatchPhase::Period1);
        assert_eq!((p1.home_points, p1.away_points), (5, 1));
        assert!(p1.completed);
        assert!(!scorer.periods()[1].completed);
    }

    #[test]
    fn test_tied_regulation_then_sudden_victory_takedown() {
        let base = Instant::now();
        let mut scorer = scorer();
        // 3-3 through regulation
        record(&mut scorer, Side::Home, ScoringAction::Takedown, base);
        record(&mut scorer, Side::Away, ScoringAction::Takedown, t(base, 10));
        scorer.advance_period(t(base, 120)).unwrap();
        record(&mut scorer, Side::Home, ScoringAction::Escape, t(base, 130));
        scorer.advance_period(t(base, 240)).unwrap();
        record(&mut scorer, Side::Away, ScoringAction::Escape, t(base, 250));
        assert_eq!(scorer.current_score(), ScoreSnapshot { home: 3, away: 3 });

        assert_eq!(scorer.advance_period(t(base, 360)).unwrap(), MatchPhase::SuddenVictory);
        assert!(scorer.periods().iter().any(|p| p.phase == MatchPhase::SuddenVictory));

        let outcome = record(&mut scorer, Side::Home, ScoringAction::Takedown, t(base, 380));
        match outcome {
            ActionOutcome::MatchEnded { outcome, .. } => {
                assert_eq!(outcome.winner, Side::Home);
                assert_eq!(outcome.win_type, WinType::Decision);
                assert_eq!(outcome.phase_ended, MatchPhase::SuddenVictory);
            }
            other => panic!("expected sudden-death ending, got {other:?}"),
        }
        assert_eq!(scorer.phase(), MatchPhase::Finished);
    }

    #[test]
    fn test_pin_wins_at_any_score() {
        let base = Instant::now();
        let mut scorer = scorer();
        scorer.start_clock(base).unwrap();
        // away builds a big lead, then gets pinned
        for i in 0..7 {
            record(&mut scorer, Side::Away, ScoringAction::Takedown, t(base, i * 10));
        }
        assert_eq!(scorer.current_score(), ScoreSnapshot { home: 0, away: 14 });

        let outcome = record(&mut scorer, Side::Home, ScoringAction::Fall, t(base, 161));
        match outcome {
            ActionOutcome::MatchEnded { outcome, event } => {
                assert_eq!(outcome.winner, Side::Home);
                assert_eq!(outcome.win_type, WinType::Pin);
                assert_eq!(outcome.pin_time_seconds, Some(161));
                assert_eq!(event.action, ScoringAction::Fall);
            }
            other => panic!("expected pin ending, got {other:?}"),
        }
    }

    #[test]
    fn test_tech_fall_stops_the_match_actively() {
        let base = Instant::now();
        let mut scorer = scorer();
        for i in 0..3 {
            record(&mut scorer, Side::Home, ScoringAction::NearFall4, t(base, i * 10));
        }
        assert_eq!(scorer.current_score(), ScoreSnapshot { home: 12, away: 0 });

        let outcome = record(&mut scorer, Side::Home, ScoringAction::NearFall4, t(base, 40));
        match outcome {
            ActionOutcome::MatchEnded { outcome, .. } => {
                assert_eq!(outcome.win_type, WinType::TechFall);
                assert_eq!(outcome.winner, Side::Home);
            }
            other => panic!("expected tech fall, got {other:?}"),
        }

        // further presses are rejected, the ledger is frozen
        let err = scorer
            .record_action(Side::Away, ScoringAction::Escape, t(base, 50), None, None)
            .unwrap_err();
        assert!(matches!(err, ScoringError::MatchAlreadyComplete));
        assert!(matches!(
            scorer.advance_period(t(base, 50)).unwrap_err(),
            ScoringError::MatchAlreadyComplete
        ));
        assert!(matches!(
            scorer.set_position(MatPosition::Neutral, None, t(base, 50)).unwrap_err(),
            ScoringError::MatchAlreadyComplete
        ));
    }

    #[test]
    fn test_decided_regulation_completes_after_period_three() {
        let base = Instant::now();
        let mut scorer = scorer();
        record(&mut scorer, Side::Home, ScoringAction::Takedown, base);
        scorer.advance_period(t(base, 120)).unwrap();
        scorer.advance_period(t(base, 240)).unwrap();
        assert_eq!(scorer.advance_period(t(base, 360)).unwrap(), MatchPhase::Finished);
        let outcome = scorer.outcome().unwrap();
        assert_eq!(outcome.win_type, WinType::Decision);
        assert_eq!(outcome.winner, Side::Home);
        assert_eq!(outcome.phase_ended, MatchPhase::Period3);
    }

    #[test]
    fn test_riding_accumulates_only_with_clock_and_control() {
        let base = Instant::now();
        let mut scorer = scorer();
        // control without a running clock accumulates nothing
        scorer.set_position(MatPosition::Top, Some(Side::Home), base).unwrap();
        assert_eq!(scorer.riding_seconds(Side::Home, t(base, 20)), 0);

        scorer.start_clock(t(base, 20)).unwrap();
        assert_eq!(scorer.riding_seconds(Side::Home, t(base, 50)), 30);

        scorer.stop_clock(t(base, 50)).unwrap();
        assert_eq!(scorer.riding_seconds(Side::Home, t(base, 500)), 30);

        // leaving top/bottom freezes accumulation even with the clock running
        scorer.start_clock(t(base, 500)).unwrap();
        scorer.set_position(MatPosition::Neutral, None, t(base, 510)).unwrap();
        assert_eq!(scorer.riding_seconds(Side::Home, t(base, 600)), 40);
    }

    #[test]
    fn test_riding_bonus_appended_exactly_once() {
        let base = Instant::now();
        let mut scorer = scorer();
        scorer.start_clock(base).unwrap();
        scorer.set_position(MatPosition::Top, Some(Side::Home), base).unwrap();

        assert!(scorer.poll_riding_bonus(t(base, 59)).is_none());
        let event = scorer.poll_riding_bonus(t(base, 65)).expect("bonus fires at threshold");
        assert_eq!(event.action, ScoringAction::RidingTime);
        assert_eq!(event.credited_to, Side::Home);
        assert_eq!(scorer.current_score(), ScoreSnapshot { home: 1, away: 0 });

        // no refire, even after the advantage changes hands and rebuilds
        scorer.set_position(MatPosition::Top, Some(Side::Away), t(base, 65)).unwrap();
        assert!(scorer.poll_riding_bonus(t(base, 400)).is_none());
        assert_eq!(scorer.current_score(), ScoreSnapshot { home: 1, away: 0 });
    }

    #[test]
    fn test_undo_rearms_the_riding_bonus() {
        let base = Instant::now();
        let mut scorer = scorer();
        scorer.start_clock(base).unwrap();
        scorer.set_position(MatPosition::Top, Some(Side::Away), base).unwrap();
        scorer.poll_riding_bonus(t(base, 70)).expect("bonus fires");

        let undone = scorer.undo_last().unwrap();
        assert_eq!(undone.action, ScoringAction::RidingTime);
        assert_eq!(scorer.current_score(), ScoreSnapshot::default());

        // latch is re-armed, the next observation fires again
        assert!(scorer.poll_riding_bonus(t(base, 71)).is_some());
    }

    #[test]
    fn test_undo_reopens_a_match_ended_by_its_event() {
        let base = Instant::now();
        let mut scorer = scorer();
        for i in 0..4 {
            record(&mut scorer, Side::Home, ScoringAction::NearFall4, t(base, i * 10));
        }
        assert_eq!(scorer.phase(), MatchPhase::Finished);

        let undone = scorer.undo_last().unwrap();
        assert_eq!(undone.action, ScoringAction::NearFall4);
        assert_eq!(scorer.phase(), MatchPhase::Period1);
        assert!(scorer.outcome().is_none());
        assert_eq!(scorer.current_score(), ScoreSnapshot { home: 12, away: 0 });

        // the match is live again
        let outcome = record(&mut scorer, Side::Away, ScoringAction::Escape, t(base, 60));
        assert!(matches!(outcome, ActionOutcome::Recorded { .. }));
    }

    #[test]
    fn test_undo_rejected_when_match_ended_by_period_advance() {
        let base = Instant::now();
        let mut scorer = scorer();
        record(&mut scorer, Side::Home, ScoringAction::Takedown, base);
        scorer.advance_period(t(base, 120)).unwrap();
        scorer.advance_period(t(base, 240)).unwrap();
        scorer.advance_period(t(base, 360)).unwrap();
        assert_eq!(scorer.phase(), MatchPhase::Finished);

        let err = scorer.undo_last().unwrap_err();
        assert!(matches!(err, ScoringError::MatchAlreadyComplete));
    }

    #[test]
    fn test_undo_then_rerecord_reproduces_the_snapshot() {
        let base = Instant::now();
        let mut scorer = scorer();
        record(&mut scorer, Side::Home, ScoringAction::Takedown, base);
        record(&mut scorer, Side::Away, ScoringAction::Reversal, t(base, 10));
        let before = scorer.current_score();
        scorer.undo_last().unwrap();
        record(&mut scorer, Side::Away, ScoringAction::Reversal, t(base, 20));
        assert_eq!(scorer.current_score(), before);
    }

    #[test]
    fn test_scoreless_overtime_reaches_the_ultimate_tiebreaker() {
        let base = Instant::now();
        let mut scorer = scorer();
        scorer.advance_period(t(base, 120)).unwrap();
        scorer.advance_period(t(base, 240)).unwrap();
        assert_eq!(scorer.advance_period(t(base, 360)).unwrap(), MatchPhase::SuddenVictory);
        assert_eq!(scorer.advance_period(t(base, 420)).unwrap(), MatchPhase::Tiebreaker1);
        assert_eq!(scorer.advance_period(t(base, 450)).unwrap(), MatchPhase::Tiebreaker2);
        assert_eq!(scorer.advance_period(t(base, 480)).unwrap(), MatchPhase::UltimateTiebreaker);

        // leaving the ultimate tiebreaker requires the judge decision
        assert!(matches!(
            scorer.advance_period(t(base, 510)).unwrap_err(),
            ScoringError::TiedScore
        ));
        let outcome = scorer.decide_ultimate_tiebreaker(Side::Away, t(base, 510)).unwrap();
        assert_eq!(outcome.winner, Side::Away);
        assert_eq!(outcome.win_type, WinType::Decision);
        assert_eq!(outcome.phase_ended, MatchPhase::UltimateTiebreaker);
        assert_eq!(scorer.phase(), MatchPhase::Finished);
    }

    #[test]
    fn test_decide_ultimate_tiebreaker_requires_the_phase() {
        let base = Instant::now();
        let mut scorer = scorer();
        let err = scorer.decide_ultimate_tiebreaker(Side::Home, base).unwrap_err();
        assert!(matches!(err, ScoringError::NotInUltimateTiebreaker));
    }

    #[test]
    fn test_finalize_builds_the_persistence_record() {
        let base = Instant::now();
        let mut scorer = scorer();
        scorer.start_clock(base).unwrap();
        record(&mut scorer, Side::Home, ScoringAction::Takedown, t(base, 15));
        scorer.set_position(MatPosition::Top, Some(Side::Home), t(base, 15)).unwrap();
        record(&mut scorer, Side::Away, ScoringAction::Stalling, t(base, 40));
        scorer.set_position(MatPosition::Neutral, None, t(base, 45)).unwrap();
        scorer.advance_period(t(base, 120)).unwrap();
        scorer.advance_period(t(base, 240)).unwrap();
        scorer.advance_period(t(base, 360)).unwrap();

        let record = scorer.finalize(t(base, 360)).unwrap();
        assert_eq!(record.final_score, ScoreSnapshot { home: 3, away: 0 });
        assert_eq!(record.winner, Side::Home);
        assert_eq!(record.win_type, WinType::Decision);
        assert_eq!(record.home_stats.takedowns, 1);
        assert_eq!(record.away_stats.stalls, 1);
        assert_eq!(record.home_stats.riding_time_seconds, 30);
        assert_eq!(record.periods.len(), 3);
        assert_eq!(record.events.len(), 2);
        assert_eq!(
            record.result_description(),
            "Smith (Central) over Jones (North), Decision 3-0"
        );
    }

    #[test]
    fn test_finalize_requires_completion() {
        let scorer = scorer();
        assert!(matches!(
            scorer.finalize(Instant::now()).unwrap_err(),
            ScoringError::MatchNotComplete
        ));
    }
}
