//! # quiz-ladder
//!
//! A turn-based two-team quiz engine built around ladder progression.
//!
//! ## Design Principles
//!
//! 1. **Host-Driven**: No threads, no timers of its own. The embedding
//!    host feeds inputs (including clock ticks) and renders snapshots.
//!
//! 2. **Tolerant At The Edges, Strict Inside**: Remote question content
//!    in any historical shape normalizes into one canonical model before
//!    gameplay sees it; malformed records degrade, never panic.
//!
//! 3. **A Session Always Starts**: Fetch failures fall back to the
//!    bundled pool, short pools shorten the session, and an empty pool
//!    ends it gracefully.
//!
//! ## Architecture
//!
//! - **Snapshot State**: Every accepted input produces a whole new
//!   [`GameState`]; renderers never observe a half-applied transition.
//!   Collections use `im` so cloning a snapshot is cheap.
//!
//! - **Seeded Determinism**: All randomness flows through [`GameRng`];
//!   a seeded session replays identically.
//!
//! ## Modules
//!
//! - `core`: Team identity, characters, settings, RNG
//! - `question`: Canonical question model, normalization, supply
//! - `progress`: Step bands, ladder application, winner rules
//! - `bonus`: Surprise box arbitration and bonus round effects
//! - `external`: Question sources, branding, game-end callbacks
//! - `session`: Screens, inputs, countdown, orchestration

pub mod bonus;
pub mod core;
pub mod external;
pub mod progress;
pub mod question;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Character, GameMode, GameRng, GameSettings, QuestionCount, Team, TeamId, TeamMap,
};

pub use crate::question::{
    normalize, normalize_batch, AnswerKey, NormalizedQuestion, OptionKey, OptionSet, QuestionId,
    QuestionKind, QuestionSupply, SupplyError,
};

pub use crate::progress::{
    apply_answer, determine_final_winner, determine_round_winner, steps_for_answer, MatchOutcome,
};

pub use crate::bonus::{
    BonusArbiter, BonusChoice, BonusChoiceKind, BonusConfig, BonusDecision, BonusRound,
    SurpriseTracker,
};

pub use crate::external::{
    fetch_with_fallback, AdSlide, BrandingSource, FetchedQuestions, GameEndReport, NoBranding,
    NullNotifier, QuestionOrigin, QuestionSource, RetryPolicy, SessionNotifier, SourceError,
    StaticSource,
};

pub use crate::session::{
    GameState, QuestionPhase, Screen, SessionBuilder, SessionInput, SessionOrchestrator, TeamSetup,
    Verdict,
};
