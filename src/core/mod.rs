//! Core session types: team identity, settings, deterministic RNG.
//!
//! This module contains the building blocks the rest of the engine is
//! assembled from. Nothing here knows about screens or question flow.

pub mod rng;
pub mod settings;
pub mod team;

pub use rng::GameRng;
pub use settings::{GameMode, GameSettings, QuestionCount, DEFAULT_TIMER_SECONDS};
pub use team::{Character, Team, TeamId, TeamMap};
