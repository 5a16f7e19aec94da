//! Integrations with the hosting platform.
//!
//! Everything here is behind a trait so sessions run identically against
//! a live platform, a canned payload, or nothing at all.

pub mod branding;
pub mod callback;
pub mod source;

pub use branding::{displayable_ads, AdSlide, BrandingSource, NoBranding};
pub use callback::{notify_game_end, GameEndReport, NotifyError, NullNotifier, SessionNotifier, TeamScores};
pub use source::{
    fetch_with_fallback, FetchedQuestions, QuestionOrigin, QuestionSource, RetryPolicy,
    SourceError, StaticSource,
};
