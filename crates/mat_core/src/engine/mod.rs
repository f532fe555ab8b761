pub mod ledger;
pub mod match_phase;
pub mod match_scorer;
pub mod outcome;
pub mod position;
pub mod riding_time;
pub mod stats;

pub use ledger::EventLedger;
pub use match_phase::{next_phase, MatchPhase, PeriodRecord};
pub use match_scorer::{ActionOutcome, MatchScorer};
pub use outcome::{
    resolve_outcome, MatchOutcome, WinType, MAJOR_DECISION_DIFFERENTIAL, TECH_FALL_DIFFERENTIAL,
};
pub use position::{MatPosition, PositionState};
pub use riding_time::{RidingClock, RIDING_TIME_BONUS_THRESHOLD};
pub use stats::StatsCalculator;
