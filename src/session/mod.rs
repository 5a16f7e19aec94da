//! Session flow: screens, host inputs, the countdown, and orchestration.
//!
//! [`SessionOrchestrator`] owns a [`GameState`] snapshot and advances it
//! one [`SessionInput`] at a time. Renderers read the snapshot; nothing
//! in here renders or blocks.

pub mod input;
pub mod orchestrator;
pub mod state;
pub mod timer;

pub use input::{SessionInput, TeamSetup};
pub use orchestrator::{SessionBuilder, SessionOrchestrator};
pub use state::{BrandingState, GameState, QuestionPhase, RoundRecord, Screen, Verdict};
pub use timer::{QuestionTimer, TickOutcome};
