//! Surprise-trigger arbitration: pity timer plus fairness correction.
//!
//! Whether a bonus round fires between questions is never a bare coin
//! flip. The probability starts at a floor, grows with every question
//! that passes without a trigger (the pity timer), and is corrected by
//! how the two teams' trigger counts compare, so one team cannot keep
//! soaking up all the surprises. A cooldown keeps rounds from firing
//! back to back, and a wide enough trigger-count gap overrides the roll
//! entirely in either direction.
//!
//! The caller supplies the drawn probability sample, which keeps every
//! decision replayable and directly testable.

use serde::{Deserialize, Serialize};

use crate::core::{TeamId, TeamMap};

/// Tuning knobs for [`BonusArbiter`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BonusConfig {
    /// Trigger probability floor at the start of a dry spell.
    pub base_probability: f64,
    /// Added per question elapsed without a trigger.
    pub pity_increment: f64,
    /// Lower clamp for the rolled probability.
    pub min_probability: f64,
    /// Upper clamp for the rolled probability.
    pub max_probability: f64,
    /// Questions after a trigger during which nothing fires.
    pub cooldown_questions: u32,
    /// Trigger-count gap that overrides the roll entirely.
    pub fairness_gap: u32,
    /// Probability shift per point of trigger-count gap.
    pub fairness_step: f64,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            base_probability: 0.30,
            pity_increment: 0.12,
            min_probability: 0.10,
            max_probability: 0.85,
            cooldown_questions: 1,
            fairness_gap: 2,
            fairness_step: 0.15,
        }
    }
}

impl BonusConfig {
    /// Create the default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the probability floor.
    #[must_use]
    pub fn with_base_probability(mut self, p: f64) -> Self {
        assert!((0.0..=1.0).contains(&p), "probability must be in [0, 1]");
        self.base_probability = p;
        self
    }

    /// Set the per-question pity increment.
    #[must_use]
    pub fn with_pity_increment(mut self, p: f64) -> Self {
        assert!((0.0..=1.0).contains(&p), "increment must be in [0, 1]");
        self.pity_increment = p;
        self
    }

    /// Set the probability clamp range.
    #[must_use]
    pub fn with_probability_range(mut self, min: f64, max: f64) -> Self {
        assert!(
            0.0 <= min && min <= max && max <= 1.0,
            "clamp range must satisfy 0 <= min <= max <= 1"
        );
        self.min_probability = min;
        self.max_probability = max;
        self
    }

    /// Set the post-trigger cooldown window.
    #[must_use]
    pub fn with_cooldown(mut self, questions: u32) -> Self {
        self.cooldown_questions = questions;
        self
    }

    /// Set the trigger-count gap that forces the outcome.
    #[must_use]
    pub fn with_fairness_gap(mut self, gap: u32) -> Self {
        assert!(gap > 0, "fairness gap must be at least 1");
        self.fairness_gap = gap;
        self
    }

    /// Set the probability shift per point of gap.
    #[must_use]
    pub fn with_fairness_step(mut self, step: f64) -> Self {
        assert!((0.0..=1.0).contains(&step), "step must be in [0, 1]");
        self.fairness_step = step;
        self
    }
}

/// Rolling record of surprise triggers across a session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurpriseTracker {
    /// Question index of the most recent trigger.
    pub last_triggered: Option<u32>,
    /// Triggers awarded to each team so far.
    pub trigger_counts: TeamMap<u32>,
}

impl SurpriseTracker {
    /// Fresh tracker with no triggers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total triggers this session.
    #[must_use]
    pub fn total_triggers(&self) -> u32 {
        self.trigger_counts[TeamId::A] + self.trigger_counts[TeamId::B]
    }

    /// Record a trigger for `team` after `question_index`.
    pub fn record_trigger(&mut self, question_index: u32, team: TeamId) {
        self.last_triggered = Some(question_index);
        self.trigger_counts[team] += 1;
    }

    /// Questions fully elapsed without a trigger, as seen right after
    /// `question_index` resolved.
    #[must_use]
    fn dry_spell(&self, question_index: u32) -> u32 {
        match self.last_triggered {
            Some(last) => question_index.saturating_sub(last).saturating_sub(1),
            None => question_index.saturating_sub(1),
        }
    }
}

/// One arbitration result.
#[derive(Clone, Debug, PartialEq)]
pub struct BonusDecision {
    /// Whether a bonus round fires now.
    pub fires: bool,
    /// The probability the draw was compared against: 0 for a forced or
    /// cooled-down suppression, 1 for a forced trigger.
    pub probability_used: f64,
    /// Tracker state after this decision.
    pub tracker: SurpriseTracker,
}

/// Decides whether a surprise bonus round fires after a question.
#[derive(Clone, Debug, Default)]
pub struct BonusArbiter {
    config: BonusConfig,
}

impl BonusArbiter {
    /// Arbiter with the given tuning.
    #[must_use]
    pub fn new(config: BonusConfig) -> Self {
        Self { config }
    }

    /// The active tuning.
    #[must_use]
    pub fn config(&self) -> &BonusConfig {
        &self.config
    }

    /// Arbitrate right after `question_index` resolved.
    ///
    /// `acting_team` is the team that answered that question; a trigger
    /// awards the bonus choice to it. `draw` is a probability sample in
    /// [0, 1) taken from the session RNG.
    ///
    /// Order of precedence: cooldown suppression, trigger-count gap
    /// override, then the pity-and-fairness adjusted roll.
    #[must_use]
    pub fn evaluate(
        &self,
        tracker: &SurpriseTracker,
        question_index: u32,
        acting_team: TeamId,
        draw: f64,
    ) -> BonusDecision {
        let cfg = &self.config;

        if let Some(last) = tracker.last_triggered {
            if question_index.saturating_sub(last) <= cfg.cooldown_questions {
                return BonusDecision {
                    fires: false,
                    probability_used: 0.0,
                    tracker: tracker.clone(),
                };
            }
        }

        // Positive gap: the acting team is behind on triggers.
        let acting_count = tracker.trigger_counts[acting_team];
        let other_count = tracker.trigger_counts[acting_team.opponent()];
        let gap = i64::from(other_count) - i64::from(acting_count);

        if gap >= i64::from(cfg.fairness_gap) {
            return self.decide(tracker, question_index, acting_team, true, 1.0);
        }
        if -gap >= i64::from(cfg.fairness_gap) {
            return BonusDecision {
                fires: false,
                probability_used: 0.0,
                tracker: tracker.clone(),
            };
        }

        let pity = cfg.base_probability
            + cfg.pity_increment * f64::from(tracker.dry_spell(question_index));
        let corrected = pity + cfg.fairness_step * gap as f64;
        let probability = corrected.clamp(cfg.min_probability, cfg.max_probability);

        self.decide(tracker, question_index, acting_team, draw < probability, probability)
    }

    fn decide(
        &self,
        tracker: &SurpriseTracker,
        question_index: u32,
        acting_team: TeamId,
        fires: bool,
        probability_used: f64,
    ) -> BonusDecision {
        let mut next = tracker.clone();
        if fires {
            next.record_trigger(question_index, acting_team);
        }
        BonusDecision { fires, probability_used, tracker: next }
    }
}
