//! Ladder progression rules.

pub mod engine;

pub use engine::{
    apply_answer, determine_final_winner, determine_round_winner, reached_target,
    steps_for_answer, MatchOutcome,
};
