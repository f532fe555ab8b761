pub mod events;
pub mod match_record;
pub mod wrestler;

pub use events::{ScoreSnapshot, ScoringAction, ScoringEvent};
pub use match_record::{format_clock, MatchRecord, WrestlerStatLine};
pub use wrestler::{MatchParticipants, Side, WrestlerRef};
