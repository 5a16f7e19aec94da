//! Pure progression rules: step bands, answer application, winners.
//!
//! Everything here is a pure function over team state. No randomness, no
//! I/O, no screen knowledge; the orchestrator sequences these, and the
//! bonus arbiter handles everything probabilistic.
//!
//! ## Step bands
//!
//! Timed answers earn steps by how much of the countdown was used,
//! in thirds of the configured total: the first third earns 3 steps,
//! the second 2, the rest 1. Untimed answers always earn 1.
//!
//! ## Two winner checks, two tie meanings
//!
//! [`determine_round_winner`] runs between questions against the ladder
//! target; its `Tie` means "nobody is decisive yet" unless both teams
//! have reached the target at the same rung. [`determine_final_winner`]
//! runs when questions are exhausted and compares bare positions; its
//! `Tie` is a genuine draw. The two stay separate operations on purpose.

use serde::{Deserialize, Serialize};

use crate::core::{GameMode, Team, TeamId, TeamMap};

/// Result of a winner check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Single winning team.
    Winner(TeamId),
    /// No winner; meaning depends on the call site (see module docs).
    Tie,
}

impl MatchOutcome {
    /// Check if a team won.
    #[must_use]
    pub fn is_winner(&self, team: TeamId) -> bool {
        matches!(self, MatchOutcome::Winner(t) if *t == team)
    }

    /// Wire form: the winning team key or `"tie"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            MatchOutcome::Winner(team) => team.key(),
            MatchOutcome::Tie => "tie",
        }
    }
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MatchOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MatchOutcome {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match String::deserialize(deserializer)?.as_str() {
            "A" => Ok(MatchOutcome::Winner(TeamId::A)),
            "B" => Ok(MatchOutcome::Winner(TeamId::B)),
            "tie" => Ok(MatchOutcome::Tie),
            other => Err(serde::de::Error::custom(format!(
                "not a match outcome: {other:?}"
            ))),
        }
    }
}

/// Steps earned by a correct answer.
///
/// `time_left` is the countdown value at answer time; using up to a
/// third of `total_time` earns 3 steps, up to two thirds 2, the rest 1.
/// Untimed mode always earns 1. Integer arithmetic throughout, so band
/// edges are exact for any total.
#[must_use]
pub fn steps_for_answer(time_left: u32, total_time: u32, mode: GameMode) -> u32 {
    if mode == GameMode::Untimed || total_time == 0 {
        return 1;
    }
    let used = total_time.saturating_sub(time_left);
    if used * 3 <= total_time {
        3
    } else if used * 3 <= total_time * 2 {
        2
    } else {
        1
    }
}

/// Apply a resolved answer, returning the updated team set.
///
/// A correct answer adds one score point and `steps` rungs to the
/// acting team; a wrong answer changes nothing. The input set is left
/// untouched so the caller can swap whole snapshots.
#[must_use]
pub fn apply_answer(
    teams: &TeamMap<Team>,
    team: TeamId,
    correct: bool,
    steps: u32,
) -> TeamMap<Team> {
    let mut next = teams.clone();
    if correct {
        next[team].record_correct(steps);
    }
    next
}

/// Whether a ladder position has reached the winning target.
#[must_use]
pub const fn reached_target(position: u32, target: u32) -> bool {
    position >= target
}

/// Winner check between questions, against the ladder target.
///
/// Both teams at or past the target: the higher position wins, equal
/// positions are a tie (and the game is over, since the target fell).
/// One team past the target wins outright. Neither past: `Tie`, meaning
/// the game continues.
#[must_use]
pub fn determine_round_winner(teams: &TeamMap<Team>, target: u32) -> MatchOutcome {
    let a = &teams[TeamId::A];
    let b = &teams[TeamId::B];

    match (
        reached_target(a.ladder_position, target),
        reached_target(b.ladder_position, target),
    ) {
        (true, true) => compare_positions(a, b),
        (true, false) => MatchOutcome::Winner(TeamId::A),
        (false, true) => MatchOutcome::Winner(TeamId::B),
        (false, false) => MatchOutcome::Tie,
    }
}

/// Winner check once questions are exhausted: bare position compare.
///
/// Equal positions are a genuine draw.
#[must_use]
pub fn determine_final_winner(teams: &TeamMap<Team>) -> MatchOutcome {
    compare_positions(&teams[TeamId::A], &teams[TeamId::B])
}

fn compare_positions(a: &Team, b: &Team) -> MatchOutcome {
    match a.ladder_position.cmp(&b.ladder_position) {
        std::cmp::Ordering::Greater => MatchOutcome::Winner(TeamId::A),
        std::cmp::Ordering::Less => MatchOutcome::Winner(TeamId::B),
        std::cmp::Ordering::Equal => MatchOutcome::Tie,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teams_at(a: u32, b: u32) -> TeamMap<Team> {
        let mut teams = TeamMap::fresh();
        teams[TeamId::A].advance(a);
        teams[TeamId::B].advance(b);
        teams
    }

    #[test]
    fn test_step_bands_for_default_timer() {
        // 30-second countdown: bands split at 10 and 20 seconds used.
        assert_eq!(steps_for_answer(25, 30, GameMode::Timed), 3);
        assert_eq!(steps_for_answer(20, 30, GameMode::Timed), 3);
        assert_eq!(steps_for_answer(19, 30, GameMode::Timed), 2);
        assert_eq!(steps_for_answer(15, 30, GameMode::Timed), 2);
        assert_eq!(steps_for_answer(10, 30, GameMode::Timed), 2);
        assert_eq!(steps_for_answer(9, 30, GameMode::Timed), 1);
        assert_eq!(steps_for_answer(5, 30, GameMode::Timed), 1);
        assert_eq!(steps_for_answer(0, 30, GameMode::Timed), 1);
    }

    #[test]
    fn test_step_bands_scale_with_total() {
        // The thirds are relative to the configured total, not fixed.
        assert_eq!(steps_for_answer(45, 60, GameMode::Timed), 3);
        assert_eq!(steps_for_answer(40, 60, GameMode::Timed), 3);
        assert_eq!(steps_for_answer(39, 60, GameMode::Timed), 2);
        assert_eq!(steps_for_answer(20, 60, GameMode::Timed), 2);
        assert_eq!(steps_for_answer(19, 60, GameMode::Timed), 1);
    }

    #[test]
    fn test_untimed_always_one_step() {
        assert_eq!(steps_for_answer(30, 30, GameMode::Untimed), 1);
        assert_eq!(steps_for_answer(0, 30, GameMode::Untimed), 1);
        assert_eq!(steps_for_answer(0, 0, GameMode::Untimed), 1);
    }

    #[test]
    fn test_zero_total_degrades_to_one_step() {
        assert_eq!(steps_for_answer(0, 0, GameMode::Timed), 1);
    }

    #[test]
    fn test_overshoot_time_left_earns_top_band() {
        // A tick race can report more time left than the total.
        assert_eq!(steps_for_answer(35, 30, GameMode::Timed), 3);
    }

    #[test]
    fn test_apply_answer_correct() {
        let teams = teams_at(0, 0);
        let next = apply_answer(&teams, TeamId::B, true, 3);

        assert_eq!(next[TeamId::B].ladder_position, 3);
        assert_eq!(next[TeamId::B].score, 1);
        assert_eq!(next[TeamId::A].ladder_position, 0);
        // Input snapshot untouched.
        assert_eq!(teams[TeamId::B].ladder_position, 0);
    }

    #[test]
    fn test_apply_answer_wrong_changes_nothing() {
        let teams = teams_at(5, 5);
        let next = apply_answer(&teams, TeamId::A, false, 3);

        assert_eq!(next, teams);
    }

    #[test]
    fn test_round_winner_one_team_reaches() {
        let outcome = determine_round_winner(&teams_at(52, 40), 50);
        assert_eq!(outcome, MatchOutcome::Winner(TeamId::A));
        assert!(outcome.is_winner(TeamId::A));
        assert!(!outcome.is_winner(TeamId::B));
    }

    #[test]
    fn test_round_winner_both_reach_higher_wins() {
        assert_eq!(
            determine_round_winner(&teams_at(60, 55), 50),
            MatchOutcome::Winner(TeamId::A)
        );
        assert_eq!(
            determine_round_winner(&teams_at(55, 60), 50),
            MatchOutcome::Winner(TeamId::B)
        );
    }

    #[test]
    fn test_round_winner_both_reach_equal_is_tie() {
        assert_eq!(determine_round_winner(&teams_at(60, 60), 50), MatchOutcome::Tie);
    }

    #[test]
    fn test_round_winner_nobody_reached_means_continue() {
        // Positions differ but neither is decisive: play on.
        assert_eq!(determine_round_winner(&teams_at(30, 40), 50), MatchOutcome::Tie);
    }

    #[test]
    fn test_final_winner_compares_positions() {
        assert_eq!(
            determine_final_winner(&teams_at(30, 40)),
            MatchOutcome::Winner(TeamId::B)
        );
        assert_eq!(
            determine_final_winner(&teams_at(41, 40)),
            MatchOutcome::Winner(TeamId::A)
        );
        assert_eq!(determine_final_winner(&teams_at(25, 25)), MatchOutcome::Tie);
    }

    #[test]
    fn test_outcome_wire_strings() {
        assert_eq!(MatchOutcome::Winner(TeamId::A).as_str(), "A");
        assert_eq!(MatchOutcome::Tie.as_str(), "tie");

        let json = serde_json::to_string(&MatchOutcome::Winner(TeamId::B)).unwrap();
        assert_eq!(json, "\"B\"");

        let back: MatchOutcome = serde_json::from_str("\"tie\"").unwrap();
        assert_eq!(back, MatchOutcome::Tie);
    }
}
