//! Session orchestration: the screen machine driving a whole match.
//!
//! ## Flow
//!
//! Advertisement (if any slides are pending) to MainMenu, TeamSelection,
//! GameSettings, then per question: QuestionReady, QuestionActive,
//! LadderProgress, with an optional BonusRound in between, ending on
//! GameResults. Play-again loops back to the main menu.
//!
//! ## Snapshots
//!
//! [`SessionOrchestrator::handle`] applies each input to a clone of the
//! current state and swaps the clone in only when the input was valid
//! for the current screen. Invalid inputs are logged and dropped, so a
//! laggy host replaying an old tap can never corrupt a session, and a
//! renderer holding the previous snapshot always has a coherent frame.
//!
//! ## Collaborators
//!
//! The question source, game-end notifier, and branding source are
//! injected through [`SessionBuilder`]. A session runs identically
//! against the live platform or canned test doubles; only the RNG seed
//! and the collaborators differ.

use std::time::Instant;

use tracing::{debug, info, warn};

use super::input::{SessionInput, TeamSetup};
use super::state::{GameState, QuestionPhase, RoundRecord, Screen, Verdict};
use super::timer::{QuestionTimer, TickOutcome};
use crate::bonus::{BonusArbiter, BonusConfig, BonusRound};
use crate::core::{Character, GameMode, GameRng, Team, TeamId, TeamMap};
use crate::external::{
    displayable_ads, fetch_with_fallback, notify_game_end, BrandingSource, FetchedQuestions,
    GameEndReport, NoBranding, NullNotifier, QuestionOrigin, QuestionSource, RetryPolicy,
    SessionNotifier, StaticSource,
};
use crate::progress::{
    apply_answer, determine_final_winner, determine_round_winner, steps_for_answer, MatchOutcome,
};
use crate::question::{AnswerKey, QuestionId, QuestionKind, QuestionSupply, SupplyError};

/// Builder wiring collaborators into a session.
pub struct SessionBuilder {
    source: Box<dyn QuestionSource>,
    notifier: Box<dyn SessionNotifier>,
    branding: Box<dyn BrandingSource>,
    supply: QuestionSupply,
    bonus_config: BonusConfig,
    retry: RetryPolicy,
    seed: Option<u64>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            source: Box::new(StaticSource::default()),
            notifier: Box::new(NullNotifier),
            branding: Box::new(NoBranding),
            supply: QuestionSupply::new(),
            bonus_config: BonusConfig::default(),
            retry: RetryPolicy::default(),
            seed: None,
        }
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw question source consulted when a game code is set.
    pub fn source(mut self, source: impl QuestionSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Set the game-end report receiver.
    pub fn notifier(mut self, notifier: impl SessionNotifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Set the advertisement and publisher-logo supplier.
    pub fn branding(mut self, branding: impl BrandingSource + 'static) -> Self {
        self.branding = Box::new(branding);
        self
    }

    /// Set the fallback question supply.
    pub fn supply(mut self, supply: QuestionSupply) -> Self {
        self.supply = supply;
        self
    }

    /// Set the surprise arbitration tuning.
    pub fn bonus_config(mut self, config: BonusConfig) -> Self {
        self.bonus_config = config;
        self
    }

    /// Set the fetch retry policy.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Seed the session RNG for a replayable match.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the orchestrator in its pre-game state.
    ///
    /// Loads advertisement slides up front; if any are displayable the
    /// session opens on the advertisement screen instead of the menu.
    #[must_use]
    pub fn build(self) -> SessionOrchestrator {
        let rng = match self.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };

        let mut branding = self.branding;
        let ads = displayable_ads(branding.as_mut());

        let mut state = GameState::new();
        if let Some(first) = ads.first() {
            state.screen = Screen::Advertisement;
            state.branding.ad_time_left = first.duration_seconds;
        }
        state.branding.pending_ads = ads.into();

        SessionOrchestrator {
            state,
            timer: QuestionTimer::new(),
            rng,
            arbiter: BonusArbiter::new(self.bonus_config),
            supply: self.supply,
            retry: self.retry,
            source: self.source,
            notifier: self.notifier,
            branding,
            end_notified: false,
        }
    }
}

/// Owns the session state and drives it from host inputs.
pub struct SessionOrchestrator {
    state: GameState,
    timer: QuestionTimer,
    rng: GameRng,
    arbiter: BonusArbiter,
    supply: QuestionSupply,
    retry: RetryPolicy,
    source: Box<dyn QuestionSource>,
    notifier: Box<dyn SessionNotifier>,
    branding: Box<dyn BrandingSource>,
    end_notified: bool,
}

impl SessionOrchestrator {
    /// The current snapshot.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Apply one host input.
    ///
    /// Valid inputs replace the snapshot atomically; invalid ones leave
    /// it untouched.
    pub fn handle(&mut self, input: SessionInput) {
        let mut next = self.state.clone();
        if self.apply(&mut next, input.clone()) {
            self.state = next;
        } else {
            debug!(?input, screen = ?self.state.screen, "ignored input");
        }
    }

    fn apply(&mut self, state: &mut GameState, input: SessionInput) -> bool {
        match input {
            SessionInput::AdFinished => {
                if state.screen != Screen::Advertisement {
                    return false;
                }
                let _ = state.branding.pending_ads.pop_front();
                match state.branding.pending_ads.front() {
                    Some(slide) => state.branding.ad_time_left = slide.duration_seconds,
                    None => {
                        state.branding.ad_time_left = 0;
                        state.screen = Screen::MainMenu;
                    }
                }
                true
            }

            SessionInput::StartPressed => {
                if state.screen != Screen::MainMenu {
                    return false;
                }
                state.screen = Screen::TeamSelection;
                true
            }

            SessionInput::TeamsConfirmed { team_a, team_b } => {
                if state.screen != Screen::TeamSelection {
                    return false;
                }
                Self::confirm_teams(state, &team_a, &team_b);
                true
            }

            SessionInput::SettingsConfirmed(settings) => {
                if state.screen != Screen::GameSettings {
                    return false;
                }
                state.settings = settings.sanitized();
                state.ladder_target = state.settings.ladder_target();
                self.begin_session(state);
                true
            }

            SessionInput::RevealQuestion => {
                if state.screen != Screen::QuestionReady {
                    return false;
                }
                state.screen = Screen::QuestionActive;
                state.phase = QuestionPhase::Active;
                if state.settings.mode == GameMode::Timed {
                    state.time_left = state.settings.timer_seconds;
                    self.timer.arm(state.current_question, state.settings.timer_seconds);
                }
                true
            }

            SessionInput::TimerTick { question_index } => {
                if state.screen != Screen::QuestionActive || state.phase != QuestionPhase::Active {
                    return false;
                }
                match self.timer.tick(question_index) {
                    TickOutcome::Counted { remaining } => {
                        state.time_left = remaining;
                        true
                    }
                    // The clock runs dry but the question stays open; a
                    // late answer lands in the slowest band.
                    TickOutcome::Expired => {
                        state.time_left = 0;
                        true
                    }
                    TickOutcome::Ignored => false,
                }
            }

            SessionInput::AnswerSelected(key) => {
                if state.screen != Screen::QuestionActive || state.phase != QuestionPhase::Active {
                    return false;
                }
                let Some(question) = state.active_question() else {
                    return false;
                };
                let acceptable = match question.kind() {
                    QuestionKind::MultipleChoice => {
                        matches!(key, AnswerKey::Choice(k) if question.options().contains(k))
                    }
                    QuestionKind::TrueFalse => {
                        matches!(key, AnswerKey::True | AnswerKey::False)
                    }
                    // Classic questions are judged by the players.
                    QuestionKind::Classic => false,
                };
                if !acceptable {
                    return false;
                }
                let question_id = question.id();
                let correct = question.is_correct(key);
                self.resolve_answer(state, question_id, Some(key), correct);
                true
            }

            SessionInput::SelfReport { correct } => {
                if state.screen != Screen::QuestionActive || state.phase != QuestionPhase::Active {
                    return false;
                }
                let Some(question) = state.active_question() else {
                    return false;
                };
                if question.kind() != QuestionKind::Classic {
                    return false;
                }
                let question_id = question.id();
                self.resolve_answer(state, question_id, None, correct);
                true
            }

            SessionInput::ContinueToLadder => {
                if state.screen != Screen::QuestionActive || state.phase != QuestionPhase::Resolved
                {
                    return false;
                }
                state.screen = Screen::LadderProgress;
                true
            }

            SessionInput::ContinueFromLadder => {
                if state.screen != Screen::LadderProgress {
                    return false;
                }
                self.continue_after_ladder(state);
                true
            }

            SessionInput::BonusChoiceSelected(kind) => {
                if state.screen != Screen::BonusRound {
                    return false;
                }
                let Some(bonus) = state.pending_bonus.take() else {
                    return false;
                };
                state.teams = bonus.apply(&state.teams, state.current_turn, kind);
                info!(
                    team = %state.current_turn,
                    choice = ?kind,
                    amount = bonus.lucky_number(),
                    "bonus choice applied"
                );
                // A bonus gain can cross the target; check before moving on.
                if state.target_reached() {
                    let outcome = determine_round_winner(&state.teams, state.ladder_target);
                    self.finish_session(state, outcome);
                } else {
                    let next_question = state.current_question + 1;
                    self.advance_to_question(state, next_question);
                }
                true
            }

            SessionInput::PlayAgainPressed => {
                if state.screen != Screen::GameResults {
                    return false;
                }
                *state = state.reset_for_rematch();
                self.timer = QuestionTimer::new();
                self.end_notified = false;
                info!("session reset for a rematch");
                true
            }
        }
    }

    // === Setup ===

    fn confirm_teams(state: &mut GameState, team_a: &TeamSetup, team_b: &TeamSetup) {
        let roster = Character::roster();
        state.teams = TeamMap::from_fn(|id| {
            let (setup, default_slot) = match id {
                TeamId::A => (team_a, 0),
                TeamId::B => (team_b, 1),
            };
            let mut team = Team::new(id);
            if let Some(name) = setup.name.as_deref() {
                let name = name.trim();
                if !name.is_empty() {
                    team.name = name.to_string();
                }
            }
            team.character = setup
                .character
                .clone()
                .or_else(|| roster.get(default_slot).cloned());
            team
        });
        state.screen = Screen::GameSettings;
    }

    /// Assemble the working question list and put the first question up.
    ///
    /// With a game code the platform is fetched (with retries and pool
    /// fallback); without one the bundled pool plays directly. A pool too
    /// small for the requested count shortens the session instead of
    /// failing it.
    fn begin_session(&mut self, state: &mut GameState) {
        let required = state.settings.question_count.count() as usize;
        // Shuffles draw from their own stream; whether padding happened
        // never shifts the bonus rolls of a seeded session.
        let mut shuffle_rng = self.rng.for_context("question-shuffle");

        let fetched = match state.settings.game_code.as_deref() {
            Some(code) => {
                fetch_with_fallback(self.source.as_mut(), &self.retry, code, &self.supply)
            }
            None => {
                let mut pool = self.supply.pool().to_vec();
                shuffle_rng.shuffle(&mut pool);
                FetchedQuestions {
                    questions: pool,
                    origin: QuestionOrigin::Fallback,
                }
            }
        };
        let origin = fetched.origin;

        let questions =
            match self.supply.ensure(fetched.questions.clone(), required, &mut shuffle_rng) {
                Ok(list) => list,
                Err(SupplyError::PoolExhausted { required, missing }) => {
                    let coverable = required.saturating_sub(missing);
                    warn!(required, missing, "question pool exhausted, shortening the session");
                    match self.supply.ensure(fetched.questions, coverable, &mut shuffle_rng) {
                        Ok(list) => list,
                        // Unreachable: coverable is exactly what the pool can supply.
                        Err(_) => Vec::new(),
                    }
                }
            };

        state.question_origin = origin;
        state.total_questions = required.min(questions.len()) as u32;
        state.questions = questions.into();

        if state.total_questions == 0 {
            warn!("no questions available, session ends before it starts");
            self.finish_session(state, MatchOutcome::Tie);
            return;
        }

        state.started_at = Some(Instant::now());
        info!(
            total = state.total_questions,
            origin = ?origin,
            target = state.ladder_target,
            "session started"
        );
        self.advance_to_question(state, 1);
    }

    // === Question flow ===

    fn advance_to_question(&mut self, state: &mut GameState, index: u32) {
        debug_assert!(index >= 1, "question indices are 1-based");
        state.current_question = index;

        let Some(question) = state.questions.get(index as usize - 1).cloned() else {
            warn!(index, "working question list ran out, ending session");
            let outcome = determine_final_winner(&state.teams);
            self.finish_session(state, outcome);
            return;
        };

        state.current_turn = TeamId::acting_for_question(index);
        state.screen = Screen::QuestionReady;
        state.phase = QuestionPhase::Ready;
        state.selected_answer = None;
        state.verdict = None;
        state.last_steps = 0;
        state.time_left = match state.settings.mode {
            GameMode::Timed => state.settings.timer_seconds,
            GameMode::Untimed => 0,
        };

        let logo = self.resolve_publisher_logo(state, question.publisher_logo_url(), question.publisher_id());
        state.branding.publisher_logo = logo;
    }

    /// The question's own logo wins; otherwise the per-publisher cache,
    /// then the branding collaborator. Misses and failures cache as
    /// `None` so a dead platform is asked once per publisher.
    fn resolve_publisher_logo(
        &mut self,
        state: &mut GameState,
        question_logo: Option<&str>,
        publisher_id: u32,
    ) -> Option<String> {
        if let Some(url) = question_logo {
            return Some(url.to_string());
        }
        if publisher_id == 0 {
            return None;
        }
        if let Some(cached) = state.branding.logo_cache.get(&publisher_id) {
            return cached.clone();
        }

        let resolved = match self.branding.publisher_logo(publisher_id) {
            Ok(url) => url,
            Err(error) => {
                warn!(publisher_id, error = %error, "publisher logo lookup failed");
                None
            }
        };
        state.branding.logo_cache.insert(publisher_id, resolved.clone());
        resolved
    }

    fn resolve_answer(
        &mut self,
        state: &mut GameState,
        question_id: QuestionId,
        selected: Option<AnswerKey>,
        correct: bool,
    ) {
        let total_time = match state.settings.mode {
            GameMode::Timed => state.settings.timer_seconds,
            GameMode::Untimed => 0,
        };
        let steps = if correct {
            steps_for_answer(state.time_left, total_time, state.settings.mode)
        } else {
            0
        };
        let verdict = if correct { Verdict::Correct } else { Verdict::Wrong };

        self.timer.cancel();
        state.teams = apply_answer(&state.teams, state.current_turn, correct, steps);
        state.selected_answer = selected;
        state.verdict = Some(verdict);
        state.last_steps = steps;
        state.phase = QuestionPhase::Resolved;
        state.record_round(RoundRecord {
            question_index: state.current_question,
            question_id,
            team: state.current_turn,
            verdict,
            steps,
        });
        info!(
            question = state.current_question,
            team = %state.current_turn,
            correct,
            steps,
            "answer resolved"
        );
    }

    /// Leave the ladder view. Checked in order: decisive winner, question
    /// exhaustion, surprise arbitration, then the next question.
    fn continue_after_ladder(&mut self, state: &mut GameState) {
        if state.target_reached() {
            let outcome = determine_round_winner(&state.teams, state.ladder_target);
            self.finish_session(state, outcome);
            return;
        }

        if state.current_question >= state.total_questions {
            let outcome = determine_final_winner(&state.teams);
            self.finish_session(state, outcome);
            return;
        }

        if state.settings.surprise_enabled {
            let draw = self.rng.draw();
            let decision = self.arbiter.evaluate(
                &state.surprise_tracker,
                state.current_question,
                state.current_turn,
                draw,
            );
            state.surprise_tracker = decision.tracker;
            if decision.fires {
                let bonus = BonusRound::roll(&mut self.rng);
                info!(
                    question = state.current_question,
                    team = %state.current_turn,
                    lucky = bonus.lucky_number(),
                    probability = decision.probability_used,
                    "surprise box fires"
                );
                state.pending_bonus = Some(bonus);
                state.screen = Screen::BonusRound;
                return;
            }
        }

        let next_question = state.current_question + 1;
        self.advance_to_question(state, next_question);
    }

    // === Game end ===

    fn finish_session(&mut self, state: &mut GameState, outcome: MatchOutcome) {
        self.timer.cancel();
        state.pending_bonus = None;
        state.outcome = Some(outcome);
        state.screen = Screen::GameResults;

        // One report per session, even if the end state is re-entered.
        if self.end_notified {
            return;
        }
        self.end_notified = true;

        let total_time = state.started_at.map_or(0, |start| start.elapsed().as_secs());
        let report = GameEndReport::new(
            state.settings.game_code.clone(),
            &state.teams,
            outcome,
            state.total_questions,
            total_time,
        );
        notify_game_end(self.notifier.as_mut(), &report);
        info!(
            winner = %outcome,
            questions = state.total_questions,
            total_time,
            "session finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::core::{GameSettings, QuestionCount};
    use crate::external::{AdSlide, NotifyError, SourceError};
    use crate::question::{NormalizedQuestion, OptionKey, OptionSet};

    fn tf_pool(size: u32) -> Vec<NormalizedQuestion> {
        (1..=size)
            .map(|i| {
                NormalizedQuestion::new(
                    QuestionId::new(i),
                    QuestionKind::TrueFalse,
                    format!("Statement {i}"),
                    OptionSet::empty(),
                    AnswerKey::True,
                )
            })
            .collect()
    }

    fn classic_pool(size: u32) -> Vec<NormalizedQuestion> {
        (1..=size)
            .map(|i| {
                NormalizedQuestion::new(
                    QuestionId::new(i),
                    QuestionKind::Classic,
                    format!("Explain {i}"),
                    OptionSet::empty(),
                    AnswerKey::Choice(OptionKey::A),
                )
            })
            .collect()
    }

    fn settings(mode: GameMode, surprise: bool) -> GameSettings {
        GameSettings::new()
            .with_question_count(QuestionCount::Ten)
            .with_mode(mode)
            .with_surprise(surprise)
    }

    /// Drive a fresh session up to the first QuestionReady screen.
    fn started_session(mode: GameMode, surprise: bool) -> SessionOrchestrator {
        let mut orc = SessionBuilder::new()
            .supply(QuestionSupply::with_pool(tf_pool(10)))
            .seed(7)
            .build();
        orc.handle(SessionInput::StartPressed);
        orc.handle(SessionInput::TeamsConfirmed {
            team_a: TeamSetup::named("Reds"),
            team_b: TeamSetup::named("Blues"),
        });
        orc.handle(SessionInput::SettingsConfirmed(settings(mode, surprise)));
        orc
    }

    fn answer_current(orc: &mut SessionOrchestrator, key: AnswerKey) {
        orc.handle(SessionInput::RevealQuestion);
        orc.handle(SessionInput::AnswerSelected(key));
        orc.handle(SessionInput::ContinueToLadder);
        orc.handle(SessionInput::ContinueFromLadder);
    }

    #[test]
    fn test_builder_defaults_open_on_main_menu() {
        let orc = SessionBuilder::new().build();
        assert_eq!(orc.state().screen, Screen::MainMenu);
        assert!(orc.state().branding.pending_ads.is_empty());
    }

    #[test]
    fn test_setup_flow_reaches_first_question() {
        let orc = started_session(GameMode::Timed, false);
        let state = orc.state();

        assert_eq!(state.screen, Screen::QuestionReady);
        assert_eq!(state.phase, QuestionPhase::Ready);
        assert_eq!(state.current_question, 1);
        assert_eq!(state.current_turn, TeamId::A);
        assert_eq!(state.total_questions, 10);
        assert_eq!(state.ladder_target, 25);
        assert_eq!(state.question_origin, QuestionOrigin::Fallback);
        assert_eq!(state.teams[TeamId::A].name, "Reds");
        assert_eq!(state.teams[TeamId::B].name, "Blues");
        assert!(state.teams[TeamId::A].character.is_some());
        assert!(state.started_at.is_some());
    }

    #[test]
    fn test_full_untimed_game_ends_in_tie() {
        let mut orc = started_session(GameMode::Untimed, false);

        for i in 1..=10 {
            assert_eq!(orc.state().current_question, i);
            answer_current(&mut orc, AnswerKey::True);
        }

        let state = orc.state();
        assert_eq!(state.screen, Screen::GameResults);
        assert_eq!(state.outcome, Some(MatchOutcome::Tie));
        assert_eq!(state.teams[TeamId::A].ladder_position, 5);
        assert_eq!(state.teams[TeamId::B].ladder_position, 5);
        assert_eq!(state.teams[TeamId::A].score, 5);
        assert_eq!(state.rounds.len(), 10);
    }

    #[test]
    fn test_turns_alternate_between_teams() {
        let mut orc = started_session(GameMode::Untimed, false);

        assert_eq!(orc.state().current_turn, TeamId::A);
        answer_current(&mut orc, AnswerKey::True);
        assert_eq!(orc.state().current_turn, TeamId::B);
        answer_current(&mut orc, AnswerKey::True);
        assert_eq!(orc.state().current_turn, TeamId::A);
    }

    #[test]
    fn test_instant_answer_earns_top_band() {
        let mut orc = started_session(GameMode::Timed, false);

        orc.handle(SessionInput::RevealQuestion);
        orc.handle(SessionInput::AnswerSelected(AnswerKey::True));

        assert_eq!(orc.state().verdict, Some(Verdict::Correct));
        assert_eq!(orc.state().last_steps, 3);
        assert_eq!(orc.state().teams[TeamId::A].ladder_position, 3);
    }

    #[test]
    fn test_elapsed_time_drops_band() {
        let mut orc = started_session(GameMode::Timed, false);

        orc.handle(SessionInput::RevealQuestion);
        // 11 of 30 seconds used puts the answer in the middle band.
        for _ in 0..11 {
            orc.handle(SessionInput::TimerTick { question_index: 1 });
        }
        assert_eq!(orc.state().time_left, 19);

        orc.handle(SessionInput::AnswerSelected(AnswerKey::True));
        assert_eq!(orc.state().last_steps, 2);
    }

    #[test]
    fn test_wrong_answer_earns_nothing() {
        let mut orc = started_session(GameMode::Timed, false);

        orc.handle(SessionInput::RevealQuestion);
        orc.handle(SessionInput::AnswerSelected(AnswerKey::False));

        let state = orc.state();
        assert_eq!(state.verdict, Some(Verdict::Wrong));
        assert_eq!(state.last_steps, 0);
        assert_eq!(state.teams[TeamId::A].ladder_position, 0);
        assert_eq!(state.teams[TeamId::A].score, 0);
        assert_eq!(state.rounds[0].steps, 0);
    }

    #[test]
    fn test_expired_clock_leaves_question_answerable() {
        let mut orc = started_session(GameMode::Timed, false);

        orc.handle(SessionInput::RevealQuestion);
        for _ in 0..35 {
            orc.handle(SessionInput::TimerTick { question_index: 1 });
        }

        let state = orc.state();
        assert_eq!(state.time_left, 0);
        assert_eq!(state.screen, Screen::QuestionActive);
        assert_eq!(state.phase, QuestionPhase::Active);

        orc.handle(SessionInput::AnswerSelected(AnswerKey::True));
        assert_eq!(orc.state().verdict, Some(Verdict::Correct));
        assert_eq!(orc.state().last_steps, 1);
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let mut orc = started_session(GameMode::Timed, false);

        orc.handle(SessionInput::RevealQuestion);
        orc.handle(SessionInput::TimerTick { question_index: 9 });

        assert_eq!(orc.state().time_left, 30);
    }

    #[test]
    fn test_untimed_mode_always_single_step() {
        let mut orc = started_session(GameMode::Untimed, false);

        orc.handle(SessionInput::RevealQuestion);
        orc.handle(SessionInput::AnswerSelected(AnswerKey::True));

        assert_eq!(orc.state().last_steps, 1);
    }

    #[test]
    fn test_reaching_target_ends_with_round_winner() {
        let mut orc = started_session(GameMode::Timed, false);
        orc.state.ladder_target = 3;

        answer_current(&mut orc, AnswerKey::True);

        let state = orc.state();
        assert_eq!(state.screen, Screen::GameResults);
        assert_eq!(state.outcome, Some(MatchOutcome::Winner(TeamId::A)));
    }

    #[test]
    fn test_classic_question_needs_self_report() {
        let mut orc = SessionBuilder::new()
            .supply(QuestionSupply::with_pool(classic_pool(10)))
            .seed(3)
            .build();
        orc.handle(SessionInput::StartPressed);
        orc.handle(SessionInput::TeamsConfirmed {
            team_a: TeamSetup::default(),
            team_b: TeamSetup::default(),
        });
        orc.handle(SessionInput::SettingsConfirmed(settings(GameMode::Untimed, false)));

        orc.handle(SessionInput::RevealQuestion);
        orc.handle(SessionInput::AnswerSelected(AnswerKey::True));
        assert_eq!(orc.state().phase, QuestionPhase::Active); // ignored

        orc.handle(SessionInput::SelfReport { correct: true });
        assert_eq!(orc.state().phase, QuestionPhase::Resolved);
        assert_eq!(orc.state().last_steps, 1);
    }

    #[test]
    fn test_self_report_rejected_for_choice_questions() {
        let mut orc = started_session(GameMode::Timed, false);

        orc.handle(SessionInput::RevealQuestion);
        orc.handle(SessionInput::SelfReport { correct: true });

        assert_eq!(orc.state().phase, QuestionPhase::Active);
        assert!(orc.state().rounds.is_empty());
    }

    #[test]
    fn test_forced_bonus_awards_choice_to_acting_team() {
        let mut orc = started_session(GameMode::Timed, true);
        // Team A two triggers behind forces the surprise on its turn.
        orc.state.surprise_tracker.trigger_counts[TeamId::B] = 2;

        orc.handle(SessionInput::RevealQuestion);
        orc.handle(SessionInput::AnswerSelected(AnswerKey::True));
        orc.handle(SessionInput::ContinueToLadder);
        orc.handle(SessionInput::ContinueFromLadder);

        let state = orc.state();
        assert_eq!(state.screen, Screen::BonusRound);
        let bonus = state.pending_bonus.unwrap();
        let lucky = bonus.lucky_number();
        assert!((1..=6).contains(&lucky));

        orc.handle(SessionInput::BonusChoiceSelected(crate::bonus::BonusChoiceKind::GainSelf));

        let state = orc.state();
        assert_eq!(state.teams[TeamId::A].ladder_position, 3 + lucky);
        assert_eq!(state.surprise_tracker.trigger_counts[TeamId::A], 1);
        assert!(state.pending_bonus.is_none());
        assert_eq!(state.screen, Screen::QuestionReady);
        assert_eq!(state.current_question, 2);
    }

    #[test]
    fn test_dock_choice_clamps_opponent_at_zero() {
        let mut orc = started_session(GameMode::Timed, true);
        orc.state.surprise_tracker.trigger_counts[TeamId::B] = 2;

        orc.handle(SessionInput::RevealQuestion);
        orc.handle(SessionInput::AnswerSelected(AnswerKey::True));
        orc.handle(SessionInput::ContinueToLadder);
        orc.handle(SessionInput::ContinueFromLadder);
        orc.handle(SessionInput::BonusChoiceSelected(
            crate::bonus::BonusChoiceKind::DockOpponent,
        ));

        assert_eq!(orc.state().teams[TeamId::B].ladder_position, 0);
        assert_eq!(orc.state().current_question, 2);
    }

    #[test]
    fn test_bonus_gain_can_end_the_game() {
        let mut orc = started_session(GameMode::Timed, true);
        orc.state.surprise_tracker.trigger_counts[TeamId::B] = 2;
        orc.state.ladder_target = 4;

        orc.handle(SessionInput::RevealQuestion);
        orc.handle(SessionInput::AnswerSelected(AnswerKey::True));
        orc.handle(SessionInput::ContinueToLadder);
        orc.handle(SessionInput::ContinueFromLadder);
        assert_eq!(orc.state().screen, Screen::BonusRound);

        // 3 steps plus any lucky number crosses the target of 4.
        orc.handle(SessionInput::BonusChoiceSelected(crate::bonus::BonusChoiceKind::GainSelf));

        let state = orc.state();
        assert_eq!(state.screen, Screen::GameResults);
        assert_eq!(state.outcome, Some(MatchOutcome::Winner(TeamId::A)));
    }

    #[test]
    fn test_surprise_disabled_never_interrupts() {
        let mut orc = started_session(GameMode::Untimed, false);
        // A heavy trigger deficit would force a bonus if arbitration ran.
        orc.state.surprise_tracker.trigger_counts[TeamId::B] = 5;

        answer_current(&mut orc, AnswerKey::True);

        assert_eq!(orc.state().screen, Screen::QuestionReady);
        assert_eq!(orc.state().current_question, 2);
    }

    #[test]
    fn test_invalid_inputs_leave_state_untouched() {
        let mut orc = SessionBuilder::new().build();

        orc.handle(SessionInput::AnswerSelected(AnswerKey::True));
        orc.handle(SessionInput::ContinueFromLadder);
        orc.handle(SessionInput::SelfReport { correct: true });
        orc.handle(SessionInput::PlayAgainPressed);

        assert_eq!(orc.state().screen, Screen::MainMenu);
        assert!(orc.state().rounds.is_empty());
    }

    #[test]
    fn test_short_pool_degrades_to_shorter_session() {
        let mut orc = SessionBuilder::new()
            .supply(QuestionSupply::with_pool(tf_pool(4)))
            .seed(5)
            .build();
        orc.handle(SessionInput::StartPressed);
        orc.handle(SessionInput::TeamsConfirmed {
            team_a: TeamSetup::default(),
            team_b: TeamSetup::default(),
        });
        orc.handle(SessionInput::SettingsConfirmed(settings(GameMode::Untimed, false)));

        assert_eq!(orc.state().total_questions, 4);

        for _ in 0..4 {
            answer_current(&mut orc, AnswerKey::True);
        }

        assert_eq!(orc.state().screen, Screen::GameResults);
        assert_eq!(orc.state().outcome, Some(MatchOutcome::Tie));
    }

    #[test]
    fn test_empty_pool_ends_before_starting() {
        let mut orc = SessionBuilder::new()
            .supply(QuestionSupply::with_pool(Vec::new()))
            .build();
        orc.handle(SessionInput::StartPressed);
        orc.handle(SessionInput::TeamsConfirmed {
            team_a: TeamSetup::default(),
            team_b: TeamSetup::default(),
        });
        orc.handle(SessionInput::SettingsConfirmed(settings(GameMode::Timed, false)));

        let state = orc.state();
        assert_eq!(state.screen, Screen::GameResults);
        assert_eq!(state.outcome, Some(MatchOutcome::Tie));
        assert_eq!(state.total_questions, 0);
    }

    #[test]
    fn test_remote_source_supplies_session() {
        let records: Vec<serde_json::Value> = (0..10)
            .map(|i| {
                serde_json::json!({
                    "question": format!("Remote question {i}?"),
                    "options": ["Red", "Green", "Blue", "Yellow"],
                    "correct_answer_index": 0,
                })
            })
            .collect();

        let mut orc = SessionBuilder::new()
            .source(StaticSource::with_records(records))
            .retry_policy(RetryPolicy::no_delay(1))
            .seed(11)
            .build();
        orc.handle(SessionInput::StartPressed);
        orc.handle(SessionInput::TeamsConfirmed {
            team_a: TeamSetup::default(),
            team_b: TeamSetup::default(),
        });
        orc.handle(SessionInput::SettingsConfirmed(
            settings(GameMode::Timed, false).with_game_code("ABC123"),
        ));

        let state = orc.state();
        assert_eq!(state.question_origin, QuestionOrigin::Remote);
        assert_eq!(state.total_questions, 10);
        assert_eq!(
            state.active_question().map(|q| q.prompt_text()),
            Some("Remote question 0?")
        );

        orc.handle(SessionInput::RevealQuestion);
        orc.handle(SessionInput::AnswerSelected(AnswerKey::Choice(OptionKey::A)));
        assert_eq!(orc.state().verdict, Some(Verdict::Correct));
    }

    #[test]
    fn test_ads_gate_the_main_menu() {
        struct TwoAds;
        impl BrandingSource for TwoAds {
            fn advertisements(&mut self) -> Result<Vec<AdSlide>, SourceError> {
                Ok(vec![
                    AdSlide {
                        id: 1,
                        name: "first".to_string(),
                        file_url: "https://cdn.example/1.png".to_string(),
                        link_url: None,
                        duration_seconds: 5,
                    },
                    AdSlide {
                        id: 2,
                        name: "second".to_string(),
                        file_url: "https://cdn.example/2.png".to_string(),
                        link_url: None,
                        duration_seconds: 8,
                    },
                ])
            }
            fn publisher_logo(&mut self, _: u32) -> Result<Option<String>, SourceError> {
                Ok(None)
            }
        }

        let mut orc = SessionBuilder::new().branding(TwoAds).build();
        assert_eq!(orc.state().screen, Screen::Advertisement);
        assert_eq!(orc.state().branding.ad_time_left, 5);

        // Start is gated until the slides finish.
        orc.handle(SessionInput::StartPressed);
        assert_eq!(orc.state().screen, Screen::Advertisement);

        orc.handle(SessionInput::AdFinished);
        assert_eq!(orc.state().screen, Screen::Advertisement);
        assert_eq!(orc.state().branding.ad_time_left, 8);

        orc.handle(SessionInput::AdFinished);
        assert_eq!(orc.state().screen, Screen::MainMenu);
    }

    #[test]
    fn test_publisher_logo_cached_across_questions() {
        struct CountingBranding {
            lookups: Rc<RefCell<u32>>,
        }
        impl BrandingSource for CountingBranding {
            fn advertisements(&mut self) -> Result<Vec<AdSlide>, SourceError> {
                Ok(Vec::new())
            }
            fn publisher_logo(&mut self, _: u32) -> Result<Option<String>, SourceError> {
                *self.lookups.borrow_mut() += 1;
                Ok(Some("https://cdn.example/logo.png".to_string()))
            }
        }

        let pool: Vec<NormalizedQuestion> = tf_pool(10)
            .into_iter()
            .map(|q| q.with_publisher_id(7))
            .collect();
        let lookups = Rc::new(RefCell::new(0));

        let mut orc = SessionBuilder::new()
            .supply(QuestionSupply::with_pool(pool))
            .branding(CountingBranding { lookups: Rc::clone(&lookups) })
            .seed(2)
            .build();
        orc.handle(SessionInput::StartPressed);
        orc.handle(SessionInput::TeamsConfirmed {
            team_a: TeamSetup::default(),
            team_b: TeamSetup::default(),
        });
        orc.handle(SessionInput::SettingsConfirmed(settings(GameMode::Untimed, false)));

        assert_eq!(
            orc.state().branding.publisher_logo.as_deref(),
            Some("https://cdn.example/logo.png")
        );
        assert_eq!(*lookups.borrow(), 1);

        answer_current(&mut orc, AnswerKey::True);
        answer_current(&mut orc, AnswerKey::True);

        // Same publisher on every question; the cache absorbs the rest.
        assert_eq!(*lookups.borrow(), 1);
    }

    #[test]
    fn test_game_end_notifies_exactly_once() {
        struct CountingNotifier {
            delivered: Rc<RefCell<u32>>,
        }
        impl SessionNotifier for CountingNotifier {
            fn deliver(&mut self, _report: &GameEndReport) -> Result<(), NotifyError> {
                *self.delivered.borrow_mut() += 1;
                Ok(())
            }
        }

        let delivered = Rc::new(RefCell::new(0));
        let mut orc = SessionBuilder::new()
            .supply(QuestionSupply::with_pool(tf_pool(10)))
            .notifier(CountingNotifier { delivered: Rc::clone(&delivered) })
            .seed(9)
            .build();
        orc.handle(SessionInput::StartPressed);
        orc.handle(SessionInput::TeamsConfirmed {
            team_a: TeamSetup::default(),
            team_b: TeamSetup::default(),
        });
        orc.handle(SessionInput::SettingsConfirmed(settings(GameMode::Untimed, false)));

        for _ in 0..10 {
            answer_current(&mut orc, AnswerKey::True);
        }
        assert_eq!(orc.state().screen, Screen::GameResults);
        assert_eq!(*delivered.borrow(), 1);

        // Late inputs on the results screen never re-deliver.
        orc.handle(SessionInput::ContinueFromLadder);
        orc.handle(SessionInput::AnswerSelected(AnswerKey::True));
        assert_eq!(*delivered.borrow(), 1);
    }

    #[test]
    fn test_play_again_resets_to_main_menu() {
        let mut orc = started_session(GameMode::Untimed, false);
        for _ in 0..10 {
            answer_current(&mut orc, AnswerKey::True);
        }
        assert_eq!(orc.state().screen, Screen::GameResults);

        orc.handle(SessionInput::PlayAgainPressed);

        let state = orc.state();
        assert_eq!(state.screen, Screen::MainMenu);
        assert_eq!(state.teams[TeamId::A].ladder_position, 0);
        assert_eq!(state.teams[TeamId::A].score, 0);
        assert!(state.rounds.is_empty());
        assert!(state.outcome.is_none());
        assert_eq!(state.current_question, 0);
    }

    #[test]
    fn test_rematch_plays_a_full_second_game() {
        let mut orc = started_session(GameMode::Untimed, false);
        for _ in 0..10 {
            answer_current(&mut orc, AnswerKey::True);
        }
        orc.handle(SessionInput::PlayAgainPressed);

        orc.handle(SessionInput::StartPressed);
        orc.handle(SessionInput::TeamsConfirmed {
            team_a: TeamSetup::default(),
            team_b: TeamSetup::default(),
        });
        orc.handle(SessionInput::SettingsConfirmed(settings(GameMode::Untimed, false)));

        assert_eq!(orc.state().screen, Screen::QuestionReady);
        assert_eq!(orc.state().current_question, 1);

        for _ in 0..10 {
            answer_current(&mut orc, AnswerKey::True);
        }
        assert_eq!(orc.state().screen, Screen::GameResults);
        assert_eq!(orc.state().outcome, Some(MatchOutcome::Tie));
    }
}
