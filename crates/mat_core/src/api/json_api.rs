//! JSON scoring-script API.
//!
//! Out-of-process consumers (the scoring UI, import tooling) drive a match by
//! submitting the full time-ordered command script in one request and receive
//! the finalized match record back. All in-process state stays inside
//! `MatchScorer`; this layer only translates the wire shape.

use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::engine::match_scorer::MatchScorer;
use crate::engine::position::MatPosition;
use crate::models::events::ScoringAction;
use crate::models::match_record::MatchRecord;
use crate::models::wrestler::{MatchParticipants, Side, WrestlerRef};

pub mod error_codes {
    pub const INVALID_REQUEST: &str = "E_INVALID_REQUEST";
    pub const UNSUPPORTED_SCHEMA: &str = "E_UNSUPPORTED_SCHEMA";
    pub const OUT_OF_ORDER: &str = "E_OUT_OF_ORDER";
    pub const BAD_TIMESTAMP: &str = "E_BAD_TIMESTAMP";
    pub const COMMAND_FAILED: &str = "E_COMMAND_FAILED";
    pub const MATCH_NOT_COMPLETE: &str = "E_MATCH_NOT_COMPLETE";
    pub const SERIALIZATION: &str = "E_SERIALIZATION";
}

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

#[derive(Debug, Deserialize)]
pub struct ScoreMatchRequest {
    pub schema_version: u8,
    pub home: WrestlerRef,
    pub away: WrestlerRef,
    pub commands: Vec<ScriptCommand>,
}

/// One operator action, stamped with match-session elapsed seconds.
/// Commands must be ordered by `at_seconds`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptCommand {
    StartClock {
        at_seconds: f64,
    },
    StopClock {
        at_seconds: f64,
    },
    Action {
        at_seconds: f64,
        wrestler: Side,
        action: String,
        #[serde(default)]
        position: Option<MatPosition>,
        #[serde(default)]
        video_seconds: Option<f64>,
    },
    SetPosition {
        at_seconds: f64,
        position: MatPosition,
        #[serde(default)]
        wrestler: Option<Side>,
    },
    AdvancePeriod {
        at_seconds: f64,
    },
    DecideUltimateTiebreaker {
        at_seconds: f64,
        wrestler: Side,
    },
    UndoLast {
        at_seconds: f64,
    },
}

impl ScriptCommand {
    fn at_seconds(&self) -> f64 {
        match self {
            ScriptCommand::StartClock { at_seconds }
            | ScriptCommand::StopClock { at_seconds }
            | ScriptCommand::Action { at_seconds, .. }
            | ScriptCommand::SetPosition { at_seconds, .. }
            | ScriptCommand::AdvancePeriod { at_seconds }
            | ScriptCommand::DecideUltimateTiebreaker { at_seconds, .. }
            | ScriptCommand::UndoLast { at_seconds } => *at_seconds,
        }
    }
}

/// Replay a scoring script and return the finalized match record as JSON.
///
/// Errors are returned as `CODE: message` strings; the match state is
/// discarded on failure.
pub fn score_match_json(request_json: &str) -> Result<String, String> {
    let request: ScoreMatchRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::INVALID_REQUEST, format!("Invalid JSON request: {e}")))?;

    if request.schema_version != crate::SCHEMA_VERSION {
        return Err(err_code(
            error_codes::UNSUPPORTED_SCHEMA,
            format!("Unsupported schema version: {}", request.schema_version),
        ));
    }

    let record = score_match(request)?;
    serde_json::to_string(&record).map_err(|e| err_code(error_codes::SERIALIZATION, e))
}

/// Typed variant of [`score_match_json`].
pub fn score_match(request: ScoreMatchRequest) -> Result<MatchRecord, String> {
    info!(
        home = %request.home.name,
        away = %request.away.name,
        commands = request.commands.len(),
        "scoring match from script"
    );
    let mut scorer =
        MatchScorer::new(MatchParticipants::new(request.home.clone(), request.away.clone()));

    // anchor session time: command offsets are applied to a single base Instant
    let base = Instant::now();
    let mut previous = 0.0_f64;
    for (index, command) in request.commands.iter().enumerate() {
        let at = command.at_seconds();
        if !at.is_finite() || at < 0.0 {
            return Err(err_code(
                error_codes::BAD_TIMESTAMP,
                format!("command {index}: at_seconds must be finite and non-negative, got {at}"),
            ));
        }
        if at < previous {
            return Err(err_code(
                error_codes::OUT_OF_ORDER,
                format!("command {index}: at_seconds {at} precedes {previous}"),
            ));
        }
        previous = at;
        let now = base + Duration::from_secs_f64(at);

        debug!(index, at_seconds = at, "applying script command");
        apply_command(&mut scorer, command, now).map_err(|e| {
            warn!(index, error = %e, "script command rejected");
            err_code(error_codes::COMMAND_FAILED, format!("command {index}: {e}"))
        })?;
    }

    let final_now = base + Duration::from_secs_f64(previous);
    scorer
        .finalize(final_now)
        .map_err(|e| err_code(error_codes::MATCH_NOT_COMPLETE, e))
}

fn apply_command(
    scorer: &mut MatchScorer,
    command: &ScriptCommand,
    now: Instant,
) -> Result<(), String> {
    match command {
        ScriptCommand::StartClock { .. } => scorer.start_clock(now).map_err(|e| e.to_string()),
        ScriptCommand::StopClock { .. } => scorer.stop_clock(now).map_err(|e| e.to_string()),
        ScriptCommand::Action { wrestler, action, position, video_seconds, .. } => {
            let action: ScoringAction = action.parse().map_err(|e| format!("{e}"))?;
            scorer
                .record_action(*wrestler, action, now, *position, *video_seconds)
                .map(|_| ())
                .map_err(|e| e.to_string())
        }
        ScriptCommand::SetPosition { position, wrestler, .. } => {
            scorer.set_position(*position, *wrestler, now).map_err(|e| e.to_string())
        }
        ScriptCommand::AdvancePeriod { .. } => {
            scorer.advance_period(now).map(|_| ()).map_err(|e| e.to_string())
        }
        ScriptCommand::DecideUltimateTiebreaker { wrestler, .. } => {
            scorer.decide_ultimate_tiebreaker(*wrestler, now).map(|_| ()).map_err(|e| e.to_string())
        }
        ScriptCommand::UndoLast { .. } => {
            scorer.undo_last().map(|_| ()).map_err(|e| e.to_string())
        }
    }
}
