pub mod json_api;

pub use json_api::{score_match, score_match_json, ScoreMatchRequest, ScriptCommand};
