//! End-of-session reporting to the host platform.
//!
//! When a game finishes, a single summary report goes out through the
//! host's [`SessionNotifier`]. Delivery is fire-and-forget: a failed or
//! missing notifier never disturbs the results screen. The orchestrator
//! guarantees at most one report per session.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::core::{Team, TeamId, TeamMap};
use crate::progress::MatchOutcome;

/// Final scores keyed the way the platform expects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScores {
    #[serde(rename = "teamA")]
    pub team_a: u32,
    #[serde(rename = "teamB")]
    pub team_b: u32,
}

/// The game-end summary payload.
///
/// Field names match the platform's callback contract; `event_type` is
/// always `"game_end"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEndReport {
    pub event_type: String,
    pub game_code: Option<String>,
    pub team_scores: TeamScores,
    pub winner: MatchOutcome,
    pub question_count: u32,
    /// Whole-session wall time, in seconds.
    pub total_time: u64,
}

impl GameEndReport {
    /// Assemble a report from the finished session's state.
    #[must_use]
    pub fn new(
        game_code: Option<String>,
        teams: &TeamMap<Team>,
        winner: MatchOutcome,
        question_count: u32,
        total_time: u64,
    ) -> Self {
        Self {
            event_type: "game_end".to_string(),
            game_code,
            team_scores: TeamScores {
                team_a: teams[TeamId::A].score,
                team_b: teams[TeamId::B].score,
            },
            winner,
            question_count,
            total_time,
        }
    }
}

/// Delivery failure detail.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("session report delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Host-side delivery of session reports.
pub trait SessionNotifier {
    /// Deliver a game-end report.
    fn deliver(&mut self, report: &GameEndReport) -> Result<(), NotifyError>;
}

/// Notifier that drops every report. Default for hosts without one.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNotifier;

impl SessionNotifier for NullNotifier {
    fn deliver(&mut self, _report: &GameEndReport) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Deliver a report, swallowing failure.
pub fn notify_game_end(notifier: &mut dyn SessionNotifier, report: &GameEndReport) {
    if let Err(error) = notifier.deliver(report) {
        warn!(error = %error, "game end report dropped");
    }
}
