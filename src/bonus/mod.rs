//! Surprise bonus rounds: trigger arbitration and effect application.

pub mod arbiter;
pub mod event;

pub use arbiter::{BonusArbiter, BonusConfig, BonusDecision, SurpriseTracker};
pub use event::{BonusChoice, BonusChoiceKind, BonusRound, LUCKY_NUMBER_SIDES};
