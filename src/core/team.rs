//! Team identity and per-team data storage.
//!
//! ## TeamId
//!
//! Type-safe identifier for the two competing teams. Turn ownership is
//! derived from the 1-based question index: odd questions belong to Team A.
//!
//! ## TeamMap
//!
//! Fixed two-slot per-team storage with O(1) access. Supports iteration
//! and indexing by `TeamId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Identifier for one of the two competing teams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamId {
    A,
    B,
}

impl TeamId {
    /// Both team IDs, in display order.
    pub const ALL: [TeamId; 2] = [TeamId::A, TeamId::B];

    /// The other team.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            TeamId::A => TeamId::B,
            TeamId::B => TeamId::A,
        }
    }

    /// The team that answers the given question (1-based).
    ///
    /// Questions alternate strictly; odd indices belong to Team A.
    ///
    /// ```
    /// use quiz_ladder::core::TeamId;
    ///
    /// assert_eq!(TeamId::acting_for_question(1), TeamId::A);
    /// assert_eq!(TeamId::acting_for_question(2), TeamId::B);
    /// assert_eq!(TeamId::acting_for_question(7), TeamId::A);
    /// ```
    #[must_use]
    pub const fn acting_for_question(question_index: u32) -> Self {
        if question_index % 2 == 1 {
            TeamId::A
        } else {
            TeamId::B
        }
    }

    /// Short key form used in wire payloads ("A" or "B").
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            TeamId::A => "A",
            TeamId::B => "B",
        }
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Team {}", self.key())
    }
}

/// A selectable team mascot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Stable identifier ("owl", "robot", ...).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Asset path for the portrait image.
    pub image: String,
}

impl Character {
    /// Create a character entry.
    pub fn new(id: impl Into<String>, name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: image.into(),
        }
    }

    /// The built-in selectable roster.
    #[must_use]
    pub fn roster() -> Vec<Character> {
        vec![
            Character::new("mouse", "Mind Master", "/characters/mouse.png"),
            Character::new("cat", "Swift Cat", "/characters/cat.png"),
            Character::new("owl", "Wise Owl", "/characters/owl.png"),
            Character::new("robot", "Techno Robot", "/characters/robot.png"),
            Character::new("dragon", "Space Explorer", "/characters/dragon.png"),
            Character::new("wizard", "Music Dragon", "/characters/wizard.png"),
        ]
    }
}

/// One competing team: identity plus score and ladder progress.
///
/// `ladder_position` is unsigned, so it can never go below zero;
/// effects that dock steps use saturating arithmetic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub character: Option<Character>,
    /// Count of correctly answered questions.
    pub score: u32,
    /// Current rung on the ladder, starting at 0.
    pub ladder_position: u32,
}

impl Team {
    /// Create a team with the default display name ("Team A" / "Team B").
    #[must_use]
    pub fn new(id: TeamId) -> Self {
        Self {
            id,
            name: id.to_string(),
            character: None,
            score: 0,
            ladder_position: 0,
        }
    }

    /// Set a custom display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the chosen character.
    #[must_use]
    pub fn with_character(mut self, character: Character) -> Self {
        self.character = Some(character);
        self
    }

    /// Move up the ladder.
    pub fn advance(&mut self, steps: u32) {
        self.ladder_position += steps;
    }

    /// Move down the ladder, clamping at 0.
    pub fn dock(&mut self, steps: u32) {
        self.ladder_position = self.ladder_position.saturating_sub(steps);
    }

    /// Record a correct answer: one score point plus the earned steps.
    pub fn record_correct(&mut self, steps: u32) {
        self.score += 1;
        self.advance(steps);
    }
}

/// Per-team data storage with O(1) access.
///
/// Exactly two slots, indexed by `TeamId`.
///
/// ## Example
///
/// ```
/// use quiz_ladder::core::{TeamId, TeamMap};
///
/// let mut counts: TeamMap<u32> = TeamMap::with_value(0);
/// counts[TeamId::A] += 1;
/// assert_eq!(counts[TeamId::A], 1);
/// assert_eq!(counts[TeamId::B], 0);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamMap<T> {
    a: T,
    b: T,
}

impl<T> TeamMap<T> {
    /// Create a map from explicit per-team values.
    #[must_use]
    pub const fn new(a: T, b: T) -> Self {
        Self { a, b }
    }

    /// Create a map with values from a factory function.
    pub fn from_fn(factory: impl Fn(TeamId) -> T) -> Self {
        Self {
            a: factory(TeamId::A),
            b: factory(TeamId::B),
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            a: value.clone(),
            b: value,
        }
    }

    /// Get a reference to a team's entry.
    #[must_use]
    pub const fn get(&self, team: TeamId) -> &T {
        match team {
            TeamId::A => &self.a,
            TeamId::B => &self.b,
        }
    }

    /// Get a mutable reference to a team's entry.
    pub fn get_mut(&mut self, team: TeamId) -> &mut T {
        match team {
            TeamId::A => &mut self.a,
            TeamId::B => &mut self.b,
        }
    }

    /// Iterate over (TeamId, &T) pairs in A, B order.
    pub fn iter(&self) -> impl Iterator<Item = (TeamId, &T)> {
        [(TeamId::A, &self.a), (TeamId::B, &self.b)].into_iter()
    }

    /// Build a new map by transforming each entry.
    pub fn map<U>(&self, f: impl Fn(TeamId, &T) -> U) -> TeamMap<U> {
        TeamMap {
            a: f(TeamId::A, &self.a),
            b: f(TeamId::B, &self.b),
        }
    }
}

impl TeamMap<Team> {
    /// Fresh pair of teams with default names and zeroed progress.
    #[must_use]
    pub fn fresh() -> Self {
        Self::from_fn(Team::new)
    }

    /// Teams ordered by ladder position, highest first, for the results view.
    #[must_use]
    pub fn standings(&self) -> [&Team; 2] {
        if self.b.ladder_position > self.a.ladder_position {
            [&self.b, &self.a]
        } else {
            [&self.a, &self.b]
        }
    }
}

impl<T> Index<TeamId> for TeamMap<T> {
    type Output = T;

    fn index(&self, team: TeamId) -> &Self::Output {
        self.get(team)
    }
}

impl<T> IndexMut<TeamId> for TeamMap<T> {
    fn index_mut(&mut self, team: TeamId) -> &mut Self::Output {
        self.get_mut(team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_id_basics() {
        assert_eq!(TeamId::A.opponent(), TeamId::B);
        assert_eq!(TeamId::B.opponent(), TeamId::A);
        assert_eq!(format!("{}", TeamId::A), "Team A");
        assert_eq!(TeamId::B.key(), "B");
    }

    #[test]
    fn test_turn_alternation_odd_is_a() {
        assert_eq!(TeamId::acting_for_question(1), TeamId::A);
        assert_eq!(TeamId::acting_for_question(2), TeamId::B);
        assert_eq!(TeamId::acting_for_question(3), TeamId::A);
        assert_eq!(TeamId::acting_for_question(10), TeamId::B);
    }

    #[test]
    fn test_team_defaults() {
        let team = Team::new(TeamId::B);
        assert_eq!(team.name, "Team B");
        assert_eq!(team.score, 0);
        assert_eq!(team.ladder_position, 0);
        assert!(team.character.is_none());
    }

    #[test]
    fn test_team_builder() {
        let character = Character::roster().remove(2);
        let team = Team::new(TeamId::A)
            .with_name("Quiz Wizards")
            .with_character(character.clone());

        assert_eq!(team.name, "Quiz Wizards");
        assert_eq!(team.character, Some(character));
    }

    #[test]
    fn test_dock_clamps_at_zero() {
        let mut team = Team::new(TeamId::A);
        team.advance(3);
        team.dock(5);
        assert_eq!(team.ladder_position, 0);
    }

    #[test]
    fn test_record_correct() {
        let mut team = Team::new(TeamId::A);
        team.record_correct(3);
        team.record_correct(1);
        assert_eq!(team.score, 2);
        assert_eq!(team.ladder_position, 4);
    }

    #[test]
    fn test_team_map_access() {
        let mut map: TeamMap<u32> = TeamMap::new(1, 2);
        assert_eq!(map[TeamId::A], 1);
        assert_eq!(map[TeamId::B], 2);

        map[TeamId::B] = 7;
        assert_eq!(map[TeamId::B], 7);
    }

    #[test]
    fn test_team_map_iter_order() {
        let map: TeamMap<u32> = TeamMap::from_fn(|t| match t {
            TeamId::A => 10,
            TeamId::B => 20,
        });

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(TeamId::A, &10), (TeamId::B, &20)]);
    }

    #[test]
    fn test_team_map_map() {
        let map: TeamMap<u32> = TeamMap::new(2, 5);
        let doubled = map.map(|_, v| v * 2);
        assert_eq!(doubled[TeamId::A], 4);
        assert_eq!(doubled[TeamId::B], 10);
    }

    #[test]
    fn test_standings_highest_first() {
        let mut teams = TeamMap::fresh();
        teams[TeamId::B].advance(12);
        teams[TeamId::A].advance(4);

        let standings = teams.standings();
        assert_eq!(standings[0].id, TeamId::B);
        assert_eq!(standings[1].id, TeamId::A);
    }

    #[test]
    fn test_standings_tie_keeps_a_first() {
        let mut teams = TeamMap::fresh();
        teams[TeamId::A].advance(5);
        teams[TeamId::B].advance(5);

        let standings = teams.standings();
        assert_eq!(standings[0].id, TeamId::A);
    }

    #[test]
    fn test_roster_has_six_unique_entries() {
        let roster = Character::roster();
        assert_eq!(roster.len(), 6);

        let mut ids: Vec<_> = roster.iter().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn test_team_map_serialization() {
        let map: TeamMap<u32> = TeamMap::new(3, 4);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: TeamMap<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
