//! Host inputs to a session.
//!
//! Each variant is one thing the host can report: a button press, a
//! picked answer, or a second elapsing. The orchestrator consumes them
//! in [`handle`](super::SessionOrchestrator::handle) and ignores any
//! that are invalid for the current screen, so a laggy host replaying
//! an old tap cannot corrupt a session.

use serde::{Deserialize, Serialize};

use crate::bonus::BonusChoiceKind;
use crate::core::{Character, GameSettings};
use crate::question::AnswerKey;

/// One team's choices on the team selection screen.
///
/// Unset fields fall back to defaults: "Team A"/"Team B" for the name,
/// the first two roster characters for the mascots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSetup {
    pub name: Option<String>,
    pub character: Option<Character>,
}

impl TeamSetup {
    /// Setup with a name and the default mascot.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            character: None,
        }
    }
}

/// Everything the host can tell a running session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionInput {
    /// The current advertisement slide finished.
    AdFinished,
    /// Start button on the main menu.
    StartPressed,
    /// Both teams named and mascots picked.
    TeamsConfirmed { team_a: TeamSetup, team_b: TeamSetup },
    /// Match settings confirmed. Questions load after this.
    SettingsConfirmed(GameSettings),
    /// Acting team is ready; show the question and start the clock.
    RevealQuestion,
    /// One second elapsed on the question clock.
    TimerTick { question_index: u32 },
    /// The acting team picked an answer.
    AnswerSelected(AnswerKey),
    /// Self-judged verdict for a classic (open-ended) question.
    SelfReport { correct: bool },
    /// Leave the resolved question for the ladder view.
    ContinueToLadder,
    /// Leave the ladder view for whatever comes next.
    ContinueFromLadder,
    /// The team opened the surprise box and picked an effect.
    BonusChoiceSelected(BonusChoiceKind),
    /// Play-again button on the results screen.
    PlayAgainPressed,
}
