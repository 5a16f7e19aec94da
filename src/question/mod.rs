//! Question content: canonical model, tolerant normalization, supply.
//!
//! Everything upstream of gameplay. Raw records in any historical shape
//! come in through [`normalize`]/[`normalize_batch`]; complete working
//! lists come out of [`QuestionSupply`].

pub mod fallback;
pub mod model;
pub mod normalize;
pub mod supply;

pub use fallback::{fallback_pool, FALLBACK_ID_BASE};
pub use model::{
    AnswerKey, NormalizedQuestion, OptionKey, OptionSet, ParseAnswerKeyError, QuestionId,
    QuestionKind, QuestionOption,
};
pub use normalize::{normalize, normalize_batch};
pub use supply::{QuestionSupply, SupplyError};
