//! Session state: everything a renderer needs to draw one frame.
//!
//! ## Screen
//!
//! The coarse position in the session flow. Hosts switch views on it.
//!
//! ## GameState
//!
//! Complete snapshot of a running session:
//! - Screen and question phase
//! - Teams, scores, ladder positions
//! - The prepared question list and the in-flight question
//! - Surprise tracking and any pending bonus round
//! - Round history and branding
//!
//! The orchestrator never mutates a snapshot in place. It clones, edits
//! the clone, and swaps it in, so a host holding the previous snapshot
//! keeps a coherent frame. `im::Vector` keeps those clones cheap.

use std::time::Instant;

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::bonus::{BonusRound, SurpriseTracker};
use crate::core::{GameSettings, Team, TeamId, TeamMap};
use crate::external::{AdSlide, QuestionOrigin};
use crate::progress::MatchOutcome;
use crate::question::{AnswerKey, NormalizedQuestion, QuestionId};

/// Which view the host should be rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Pre-game advertisement slides.
    Advertisement,
    /// Title and start button.
    MainMenu,
    /// Team naming and character picking.
    TeamSelection,
    /// Question count, mode, and surprise toggle.
    GameSettings,
    /// Question is loaded but hidden; the acting team gets ready.
    QuestionReady,
    /// Question is visible; the timer may be running.
    QuestionActive,
    /// Ladder view between questions.
    LadderProgress,
    /// Surprise box is open and waiting for a choice.
    BonusRound,
    /// Final standings and the play-again button.
    GameResults,
}

/// Lifecycle of the current question within the question screens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionPhase {
    /// Loaded, not yet revealed.
    #[default]
    Ready,
    /// Revealed; answers accepted.
    Active,
    /// Answered and judged; waiting to continue.
    Resolved,
}

/// Outcome of one answered question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Wrong,
}

/// One line of the per-question history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based question position in the session.
    pub question_index: u32,
    pub question_id: QuestionId,
    /// Team that answered.
    pub team: TeamId,
    pub verdict: Verdict,
    /// Ladder steps awarded (0 on a wrong answer).
    pub steps: u32,
}

/// Advertisement queue and publisher logo state.
#[derive(Clone, Debug, Default)]
pub struct BrandingState {
    /// Logo to show beside the current question, if any.
    pub publisher_logo: Option<String>,
    /// Lookup results per publisher. Misses are cached as `None`.
    pub logo_cache: FxHashMap<u32, Option<String>>,
    /// Slides still to show before the main menu.
    pub pending_ads: Vector<AdSlide>,
    /// Seconds left on the slide currently showing.
    pub ad_time_left: u32,
}

/// Complete session snapshot.
#[derive(Clone, Debug)]
pub struct GameState {
    // === Flow ===
    /// Current view.
    pub screen: Screen,

    /// Phase of the current question.
    pub phase: QuestionPhase,

    // === Teams ===
    /// Both teams, including scores and ladder positions.
    pub teams: TeamMap<Team>,

    /// Team answering the current question.
    pub current_turn: TeamId,

    // === Setup ===
    /// Confirmed match settings.
    pub settings: GameSettings,

    /// Ladder step count a team must reach to end the match early.
    pub ladder_target: u32,

    // === Questions ===
    /// Prepared question list for this session.
    pub questions: Vector<NormalizedQuestion>,

    /// Whether the list came from the platform or the bundled pool.
    pub question_origin: QuestionOrigin,

    /// 1-based index of the question in play. 0 before the first question.
    pub current_question: u32,

    /// Questions this session will ask.
    pub total_questions: u32,

    // === Current question ===
    /// Seconds remaining on the question timer.
    pub time_left: u32,

    /// Answer picked by the acting team, once picked.
    pub selected_answer: Option<AnswerKey>,

    /// Judgement of the picked answer.
    pub verdict: Option<Verdict>,

    /// Ladder steps awarded by the last judged answer.
    pub last_steps: u32,

    // === Surprise ===
    /// Cooldown and fairness bookkeeping for the surprise box.
    pub surprise_tracker: SurpriseTracker,

    /// Rolled bonus round awaiting the team's choice.
    pub pending_bonus: Option<BonusRound>,

    // === History ===
    /// One record per judged question.
    pub rounds: Vector<RoundRecord>,

    /// When gameplay started. Set when the first question loads.
    pub started_at: Option<Instant>,

    /// Final result. `Some` exactly while on the results screen.
    pub outcome: Option<MatchOutcome>,

    // === Branding ===
    pub branding: BrandingState,
}

impl GameState {
    /// Fresh pre-game state on the main menu.
    #[must_use]
    pub fn new() -> Self {
        Self {
            screen: Screen::MainMenu,
            phase: QuestionPhase::Ready,
            teams: TeamMap::fresh(),
            current_turn: TeamId::A,
            settings: GameSettings::default(),
            ladder_target: GameSettings::default().ladder_target(),
            questions: Vector::new(),
            question_origin: QuestionOrigin::Fallback,
            current_question: 0,
            total_questions: 0,
            time_left: 0,
            selected_answer: None,
            verdict: None,
            last_steps: 0,
            surprise_tracker: SurpriseTracker::new(),
            pending_bonus: None,
            rounds: Vector::new(),
            started_at: None,
            outcome: None,
            branding: BrandingState::default(),
        }
    }

    /// The question in play, if one is loaded.
    #[must_use]
    pub fn active_question(&self) -> Option<&NormalizedQuestion> {
        if self.current_question == 0 {
            return None;
        }
        self.questions.get(self.current_question as usize - 1)
    }

    /// Whether either team has reached the ladder target.
    #[must_use]
    pub fn target_reached(&self) -> bool {
        TeamId::ALL
            .iter()
            .any(|&id| self.teams[id].ladder_position >= self.ladder_target)
    }

    /// Append a judged question to the history.
    pub fn record_round(&mut self, record: RoundRecord) {
        self.rounds.push_back(record);
    }

    /// Fresh state for a rematch on the same device.
    ///
    /// Teams, scores, settings, and questions reset; play restarts from
    /// the main menu. The publisher logo cache survives and ads do not
    /// replay.
    #[must_use]
    pub fn reset_for_rematch(&self) -> Self {
        let mut next = Self::new();
        next.branding.logo_cache = self.branding.logo_cache.clone();
        next
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{OptionSet, QuestionKind};

    fn question(id: u32) -> NormalizedQuestion {
        NormalizedQuestion::new(
            QuestionId(id),
            QuestionKind::TrueFalse,
            format!("Statement {id}"),
            OptionSet::empty(),
            AnswerKey::True,
        )
    }

    #[test]
    fn test_new_state_is_pregame() {
        let state = GameState::new();

        assert_eq!(state.screen, Screen::MainMenu);
        assert_eq!(state.phase, QuestionPhase::Ready);
        assert_eq!(state.current_question, 0);
        assert!(state.active_question().is_none());
        assert!(state.rounds.is_empty());
        assert_eq!(state.teams[TeamId::A].ladder_position, 0);
        assert_eq!(state.teams[TeamId::B].ladder_position, 0);
    }

    #[test]
    fn test_active_question_follows_index() {
        let mut state = GameState::new();
        state.questions = Vector::from(vec![question(1), question(2), question(3)]);

        state.current_question = 1;
        assert_eq!(state.active_question().map(|q| q.id()), Some(QuestionId(1)));

        state.current_question = 3;
        assert_eq!(state.active_question().map(|q| q.id()), Some(QuestionId(3)));

        state.current_question = 4;
        assert!(state.active_question().is_none());
    }

    #[test]
    fn test_target_reached() {
        let mut state = GameState::new();
        state.ladder_target = 50;
        assert!(!state.target_reached());

        state.teams[TeamId::B].ladder_position = 50;
        assert!(state.target_reached());

        state.teams[TeamId::B].ladder_position = 49;
        state.teams[TeamId::A].ladder_position = 61;
        assert!(state.target_reached());
    }

    #[test]
    fn test_record_round() {
        let mut state = GameState::new();
        state.record_round(RoundRecord {
            question_index: 1,
            question_id: QuestionId(7),
            team: TeamId::A,
            verdict: Verdict::Correct,
            steps: 3,
        });
        state.record_round(RoundRecord {
            question_index: 2,
            question_id: QuestionId(8),
            team: TeamId::B,
            verdict: Verdict::Wrong,
            steps: 0,
        });

        assert_eq!(state.rounds.len(), 2);
        assert_eq!(state.rounds[0].steps, 3);
        assert_eq!(state.rounds[1].verdict, Verdict::Wrong);
    }

    #[test]
    fn test_rematch_keeps_logo_cache() {
        let mut state = GameState::new();
        state.teams[TeamId::A].advance(12);
        state.current_question = 9;
        state
            .branding
            .logo_cache
            .insert(4, Some("https://cdn.example/logo.png".to_string()));
        state.branding.logo_cache.insert(9, None);

        let next = state.reset_for_rematch();

        assert_eq!(next.screen, Screen::MainMenu);
        assert_eq!(next.teams[TeamId::A].ladder_position, 0);
        assert_eq!(next.current_question, 0);
        assert_eq!(next.branding.logo_cache.len(), 2);
        assert_eq!(
            next.branding.logo_cache.get(&4),
            Some(&Some("https://cdn.example/logo.png".to_string()))
        );
    }
}
