//! Canonical question data model.
//!
//! `NormalizedQuestion` is the single internal shape every raw record is
//! converted into. It is immutable after creation: gameplay reads it
//! through getters, and enrichment (branding URLs) builds a new value.
//!
//! Raw, heterogeneous inputs never appear past the normalizer.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Unique identifier for a question within a session's working list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub u32);

impl QuestionId {
    /// Create a new question ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Question({})", self.0)
    }
}

/// The three supported question shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Up to four keyed options, one correct.
    MultipleChoice,
    /// Exactly two outcomes, keyed by the true/false literals.
    TrueFalse,
    /// Open answer judged by the players themselves.
    Classic,
}

/// Key of a multiple-choice option slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

impl OptionKey {
    /// All keys in display order.
    pub const ALL: [OptionKey; 4] = [OptionKey::A, OptionKey::B, OptionKey::C, OptionKey::D];

    /// Key for a 0-based option position, `None` past the fourth slot.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(OptionKey::A),
            1 => Some(OptionKey::B),
            2 => Some(OptionKey::C),
            3 => Some(OptionKey::D),
            _ => None,
        }
    }

    /// 0-based position of this key.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            OptionKey::A => 0,
            OptionKey::B => 1,
            OptionKey::C => 2,
            OptionKey::D => 3,
        }
    }

    /// The key letter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OptionKey::A => "A",
            OptionKey::B => "B",
            OptionKey::C => "C",
            OptionKey::D => "D",
        }
    }
}

impl std::fmt::Display for OptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error from parsing an [`AnswerKey`] out of a string.
#[derive(Debug, Error)]
#[error("not a valid answer key: {0:?}")]
pub struct ParseAnswerKeyError(String);

/// The correct-answer key of a normalized question.
///
/// Multiple-choice questions use option letters; true/false questions use
/// the literal `true`/`false` strings rather than option keys; classic
/// questions carry the fixed `A`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnswerKey {
    Choice(OptionKey),
    True,
    False,
}

impl AnswerKey {
    /// String form used in wire payloads and raw records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AnswerKey::Choice(key) => key.as_str(),
            AnswerKey::True => "true",
            AnswerKey::False => "false",
        }
    }
}

impl std::fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AnswerKey {
    type Err = ParseAnswerKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(AnswerKey::Choice(OptionKey::A)),
            "B" | "b" => Ok(AnswerKey::Choice(OptionKey::B)),
            "C" | "c" => Ok(AnswerKey::Choice(OptionKey::C)),
            "D" | "d" => Ok(AnswerKey::Choice(OptionKey::D)),
            "true" | "TRUE" | "True" => Ok(AnswerKey::True),
            "false" | "FALSE" | "False" => Ok(AnswerKey::False),
            other => Err(ParseAnswerKeyError(other.to_string())),
        }
    }
}

impl Serialize for AnswerKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AnswerKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One keyed answer option.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub key: OptionKey,
    pub text: String,
}

/// Ordered, key-unique collection of answer options.
///
/// Holds at most four entries; questions rarely need heap allocation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet {
    entries: SmallVec<[QuestionOption; 4]>,
}

impl OptionSet {
    /// Create an empty option set (classic questions).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set by assigning keys A.. in order.
    ///
    /// Entries past the fourth are dropped.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::empty();
        for (index, text) in texts.into_iter().enumerate() {
            let Some(key) = OptionKey::from_index(index) else {
                break;
            };
            set.insert(key, text);
        }
        set
    }

    /// Insert or replace the text for a key.
    pub fn insert(&mut self, key: OptionKey, text: impl Into<String>) {
        let text = text.into();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            entry.text = text;
        } else {
            self.entries.push(QuestionOption { key, text });
        }
    }

    /// Text for a key, if present.
    #[must_use]
    pub fn get(&self, key: OptionKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.text.as_str())
    }

    /// Whether a key is populated.
    #[must_use]
    pub fn contains(&self, key: OptionKey) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// The first populated key, in insertion order.
    #[must_use]
    pub fn first_key(&self) -> Option<OptionKey> {
        self.entries.first().map(|e| e.key)
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &QuestionOption> {
        self.entries.iter()
    }

    /// Number of populated options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no options are populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A question in canonical internal form.
///
/// Fields are private; the value cannot change after construction.
/// Branding enrichment goes through the consuming `with_*` builders,
/// which produce a new value.
///
/// ## Example
///
/// ```
/// use quiz_ladder::question::{
///     AnswerKey, NormalizedQuestion, OptionKey, OptionSet, QuestionId, QuestionKind,
/// };
///
/// let q = NormalizedQuestion::new(
///     QuestionId::new(1),
///     QuestionKind::MultipleChoice,
///     "Which planet is closest to the sun?",
///     OptionSet::from_texts(["Venus", "Mercury", "Earth", "Mars"]),
///     AnswerKey::Choice(OptionKey::B),
/// );
///
/// assert_eq!(q.options().get(OptionKey::B), Some("Mercury"));
/// assert_eq!(q.correct_answer(), AnswerKey::Choice(OptionKey::B));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedQuestion {
    id: QuestionId,
    kind: QuestionKind,
    prompt_text: String,
    options: OptionSet,
    correct_answer: AnswerKey,
    publisher_id: u32,
    image_url: Option<String>,
    publisher_logo_url: Option<String>,
}

impl NormalizedQuestion {
    /// Create a question.
    ///
    /// The kind constrains the correct-answer shape: multiple choice takes
    /// a populated option key, true/false takes a literal, classic takes
    /// the fixed `A` with no options. Violations are a caller bug.
    #[must_use]
    pub fn new(
        id: QuestionId,
        kind: QuestionKind,
        prompt_text: impl Into<String>,
        options: OptionSet,
        correct_answer: AnswerKey,
    ) -> Self {
        debug_assert!(
            Self::shape_is_consistent(kind, &options, correct_answer),
            "correct answer {correct_answer} is invalid for {kind:?}"
        );
        Self {
            id,
            kind,
            prompt_text: prompt_text.into(),
            options,
            correct_answer,
            publisher_id: 0,
            image_url: None,
            publisher_logo_url: None,
        }
    }

    fn shape_is_consistent(kind: QuestionKind, options: &OptionSet, correct: AnswerKey) -> bool {
        match kind {
            QuestionKind::MultipleChoice => match correct {
                AnswerKey::Choice(key) => options.contains(key),
                _ => false,
            },
            QuestionKind::TrueFalse => matches!(correct, AnswerKey::True | AnswerKey::False),
            QuestionKind::Classic => {
                options.is_empty() && correct == AnswerKey::Choice(OptionKey::A)
            }
        }
    }

    /// Set the content publisher ID.
    #[must_use]
    pub fn with_publisher_id(mut self, publisher_id: u32) -> Self {
        self.publisher_id = publisher_id;
        self
    }

    /// Attach an illustration URL.
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Attach the publisher's logo URL.
    #[must_use]
    pub fn with_publisher_logo_url(mut self, url: impl Into<String>) -> Self {
        self.publisher_logo_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    #[must_use]
    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> AnswerKey {
        self.correct_answer
    }

    #[must_use]
    pub fn publisher_id(&self) -> u32 {
        self.publisher_id
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    #[must_use]
    pub fn publisher_logo_url(&self) -> Option<&str> {
        self.publisher_logo_url.as_deref()
    }

    /// Whether the given key answers this question correctly.
    #[must_use]
    pub fn is_correct(&self, key: AnswerKey) -> bool {
        self.correct_answer == key
    }
}
