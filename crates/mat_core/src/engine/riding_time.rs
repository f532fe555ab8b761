//! Riding-time accumulation.
//!
//! Top-control time is accumulated analytically from interval start/stop
//! timestamps rather than a periodic tick: entering top control opens an
//! interval, leaving it (or pausing the clock) commits `now - start` to the
//! controlling wrestler. Reads fold the open interval in on the fly, so
//! there is no polling drift and nothing to clean up on suspension.

use std::time::{Duration, Instant};

use crate::models::wrestler::Side;

/// Net advantage that earns the one riding-time bonus point.
pub const RIDING_TIME_BONUS_THRESHOLD: Duration = Duration::from_secs(60);

/// Accumulates top-control time per wrestler and latches the bonus point.
///
/// Only one side accumulates at any instant: starting an interval for one
/// wrestler commits and closes the other's. The bonus fires exactly once per
/// match, the first time net advantage reaches the threshold, and stays
/// latched even if the lead later changes hands.
#[derive(Debug, Clone)]
pub struct RidingClock {
    committed: [Duration; 2],
    active: Option<(Side, Instant)>,
    bonus_awarded: bool,
}

impl Default for RidingClock {
    fn default() -> Self {
        Self::new()
    }
}

impl RidingClock {
    pub fn new() -> Self {
        Self { committed: [Duration::ZERO; 2], active: None, bonus_awarded: false }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Side currently accumulating, if any.
    pub fn running_side(&self) -> Option<Side> {
        self.active.map(|(side, _)| side)
    }

    /// Open an interval for `side`. An interval already open for the same
    /// side is left untouched; one open for the opponent is committed first.
    pub fn start(&mut self, side: Side, now: Instant) {
        match self.active {
            Some((active_side, _)) if active_side == side => {}
            _ => {
                self.commit(now);
                self.active = Some((side, now));
            }
        }
    }

    /// Commit and close the open interval, if any.
    pub fn stop(&mut self, now: Instant) {
        self.commit(now);
    }

    fn commit(&mut self, now: Instant) {
        if let Some((side, start)) = self.active.take() {
            let elapsed = now.saturating_duration_since(start);
            self.committed[side.index()] += elapsed;
        }
    }

    /// Total accumulated control time for `side`, including the open interval.
    pub fn accumulated(&self, side: Side, now: Instant) -> Duration {
        let mut total = self.committed[side.index()];
        if let Some((active_side, start)) = self.active {
            if active_side == side {
                total += now.saturating_duration_since(start);
            }
        }
        total
    }

    pub fn seconds(&self, side: Side, now: Instant) -> u32 {
        self.accumulated(side, now).as_secs() as u32
    }

    /// Absolute difference between the two accumulators.
    pub fn net_advantage(&self, now: Instant) -> Duration {
        let home = self.accumulated(Side::Home, now);
        let away = self.accumulated(Side::Away, now);
        if home >= away {
            home - away
        } else {
            away - home
        }
    }

    /// Side with the larger accumulator, `None` when equal.
    pub fn advantage_side(&self, now: Instant) -> Option<Side> {
        let home = self.accumulated(Side::Home, now);
        let away = self.accumulated(Side::Away, now);
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Single-fire bonus check: returns the advantage wrestler the first time
    /// net advantage reaches the threshold, `None` on every later call.
    pub fn check_bonus(&mut self, now: Instant) -> Option<Side> {
        if self.bonus_awarded {
            return None;
        }
        if self.net_advantage(now) < RIDING_TIME_BONUS_THRESHOLD {
            return None;
        }
        let side = self.advantage_side(now)?;
        self.bonus_awarded = true;
        log::info!("riding-time bonus reached for {side}");
        Some(side)
    }

    pub fn bonus_awarded(&self) -> bool {
        self.bonus_awarded
    }

    /// Re-arm the latch after the bonus event was undone by the operator.
    pub fn rearm_bonus(&mut self) {
        self.bonus_awarded = false;
    }
}
