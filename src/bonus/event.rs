//! The surprise bonus round: one lucky number, two choices.
//!
//! When the arbiter fires, the engine rolls a lucky number once and
//! freezes it. The acting team then picks between climbing that many
//! rungs itself or docking the opponent the same amount. Applying the
//! choice is fully deterministic; no randomness happens after the roll.

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, Team, TeamId, TeamMap};

/// Sides of the lucky-number die.
pub const LUCKY_NUMBER_SIDES: u32 = 6;

/// What a bonus choice does with the lucky number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusChoiceKind {
    /// Acting team climbs the lucky number of rungs.
    GainSelf,
    /// Opposing team drops the lucky number of rungs (clamped at 0).
    DockOpponent,
}

/// One selectable bonus choice, amount already fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusChoice {
    pub kind: BonusChoiceKind,
    pub amount: u32,
}

/// A fired bonus round with its frozen lucky number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusRound {
    lucky_number: u32,
}

impl BonusRound {
    /// Roll a fresh bonus round. This is the only random step.
    #[must_use]
    pub fn roll(rng: &mut GameRng) -> Self {
        Self { lucky_number: rng.roll_die(LUCKY_NUMBER_SIDES) }
    }

    /// Build a round with a fixed lucky number.
    ///
    /// # Panics
    ///
    /// Panics when the number is outside 1..=6.
    #[must_use]
    pub fn with_lucky_number(lucky_number: u32) -> Self {
        assert!(
            (1..=LUCKY_NUMBER_SIDES).contains(&lucky_number),
            "lucky number must be in 1..={LUCKY_NUMBER_SIDES}"
        );
        Self { lucky_number }
    }

    /// The frozen lucky number.
    #[must_use]
    pub const fn lucky_number(self) -> u32 {
        self.lucky_number
    }

    /// The two choices offered to the acting team.
    #[must_use]
    pub const fn choices(self) -> [BonusChoice; 2] {
        [
            BonusChoice { kind: BonusChoiceKind::GainSelf, amount: self.lucky_number },
            BonusChoice { kind: BonusChoiceKind::DockOpponent, amount: self.lucky_number },
        ]
    }

    /// Apply the selected choice, returning the updated team set.
    ///
    /// Docking clamps the opponent at rung 0; the input set is left
    /// untouched so the caller can swap whole snapshots.
    #[must_use]
    pub fn apply(
        self,
        teams: &TeamMap<Team>,
        acting_team: TeamId,
        choice: BonusChoiceKind,
    ) -> TeamMap<Team> {
        let mut next = teams.clone();
        match choice {
            BonusChoiceKind::GainSelf => next[acting_team].advance(self.lucky_number),
            BonusChoiceKind::DockOpponent => {
                next[acting_team.opponent()].dock(self.lucky_number);
            }
        }
        next
    }
}
