//! Session configuration types.
//!
//! A session is configured before the first question by providing:
//! - `QuestionCount`: how many questions to play (fixed menu of 10/20/30/40)
//! - `GameMode`: timed or untimed answering
//! - surprise toggle and optional remote game code
//!
//! The ladder target is derived from the question count, never set directly.

use serde::{Deserialize, Serialize};

/// Default countdown length per question, in seconds.
pub const DEFAULT_TIMER_SECONDS: u32 = 30;

/// Number of questions in a session.
///
/// The selectable menu is fixed; arbitrary counts round to the nearest
/// entry via [`QuestionCount::nearest`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionCount {
    Ten,
    #[default]
    Twenty,
    Thirty,
    Forty,
}

impl QuestionCount {
    /// All selectable counts, in menu order.
    pub const ALL: [QuestionCount; 4] = [
        QuestionCount::Ten,
        QuestionCount::Twenty,
        QuestionCount::Thirty,
        QuestionCount::Forty,
    ];

    /// The number of questions this entry plays.
    #[must_use]
    pub const fn count(self) -> u32 {
        match self {
            QuestionCount::Ten => 10,
            QuestionCount::Twenty => 20,
            QuestionCount::Thirty => 30,
            QuestionCount::Forty => 40,
        }
    }

    /// Ladder rungs a team must reach to win before questions run out.
    ///
    /// Always 2.5x the question count: 10 -> 25, 20 -> 50, 30 -> 75,
    /// 40 -> 100. Integer math is exact because counts are multiples of 10.
    #[must_use]
    pub const fn ladder_target(self) -> u32 {
        self.count() * 5 / 2
    }

    /// Clamp an arbitrary raw count to the nearest selectable entry.
    ///
    /// ```
    /// use quiz_ladder::core::QuestionCount;
    ///
    /// assert_eq!(QuestionCount::nearest(0), QuestionCount::Ten);
    /// assert_eq!(QuestionCount::nearest(24), QuestionCount::Twenty);
    /// assert_eq!(QuestionCount::nearest(26), QuestionCount::Thirty);
    /// assert_eq!(QuestionCount::nearest(999), QuestionCount::Forty);
    /// ```
    #[must_use]
    pub fn nearest(raw: u32) -> Self {
        let mut best = QuestionCount::Ten;
        let mut best_distance = u32::MAX;
        for entry in Self::ALL {
            let distance = entry.count().abs_diff(raw);
            if distance < best_distance {
                best = entry;
                best_distance = distance;
            }
        }
        best
    }
}

/// Whether questions run against a countdown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Countdown per question; faster answers earn more steps.
    #[default]
    Timed,
    /// No countdown; every correct answer earns one step.
    Untimed,
}

/// Complete session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub question_count: QuestionCount,
    pub mode: GameMode,
    /// Whether surprise bonus rounds can fire between questions.
    pub surprise_enabled: bool,
    /// Remote content code. `None` plays from the bundled pool.
    pub game_code: Option<String>,
    /// Countdown length per question in timed mode.
    pub timer_seconds: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            question_count: QuestionCount::default(),
            mode: GameMode::default(),
            surprise_enabled: true,
            game_code: None,
            timer_seconds: DEFAULT_TIMER_SECONDS,
        }
    }
}

impl GameSettings {
    /// Create settings with defaults (20 questions, timed, surprise on).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the question count.
    #[must_use]
    pub fn with_question_count(mut self, count: QuestionCount) -> Self {
        self.question_count = count;
        self
    }

    /// Set the game mode.
    #[must_use]
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable or disable surprise bonus rounds.
    #[must_use]
    pub fn with_surprise(mut self, enabled: bool) -> Self {
        self.surprise_enabled = enabled;
        self
    }

    /// Set the remote content code.
    #[must_use]
    pub fn with_game_code(mut self, code: impl Into<String>) -> Self {
        self.game_code = Some(code.into());
        self
    }

    /// Set the per-question countdown length.
    #[must_use]
    pub fn with_timer_seconds(mut self, seconds: u32) -> Self {
        self.timer_seconds = seconds;
        self
    }

    /// Ladder rungs needed to win this session early.
    #[must_use]
    pub const fn ladder_target(&self) -> u32 {
        self.question_count.ladder_target()
    }

    /// Normalize out-of-range values (a zero timer would make every
    /// answer instantly minimum-band).
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if self.timer_seconds == 0 {
            self.timer_seconds = DEFAULT_TIMER_SECONDS;
        }
        self
    }
}
