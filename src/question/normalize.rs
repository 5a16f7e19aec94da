//! Tolerant conversion of heterogeneous raw records into [`NormalizedQuestion`]s.
//!
//! Remote content arrives in several historical shapes: different prompt
//! field names, answers as string arrays, object arrays, or key-to-text
//! maps, correctness expressed as a per-answer flag, a key letter, or an
//! index, with localized aliases sprinkled in. The normalizer absorbs all
//! of that here so gameplay code only ever sees the canonical model.
//!
//! ## Rule tables
//!
//! Each extraction step walks an ordered candidate list and takes the
//! first usable hit. Supporting a new upstream shape means appending a
//! candidate to the right table, not nesting another conditional.
//!
//! Unusable records (no prompt, no way to build a consistent answer
//! shape) yield `None` and are skipped by [`normalize_batch`]; a bad
//! record never aborts a whole batch.

use serde_json::Value;
use tracing::{debug, warn};

use super::model::{
    AnswerKey, NormalizedQuestion, OptionKey, OptionSet, QuestionId, QuestionKind,
};

/// Prompt text candidates, in priority order.
const PROMPT_FIELDS: &[&str] = &["question_text", "questionText", "question", "prompt", "text"];

/// Answer collection candidates, in priority order.
const ANSWER_FIELDS: &[&str] = &["answers", "answersText", "options", "choices"];

/// Text candidates inside an answer entry object.
const ANSWER_TEXT_FIELDS: &[&str] = &["answer_text", "text", "label", "value"];

/// Per-answer correctness flag candidates inside an entry object.
const ANSWER_FLAG_FIELDS: &[&str] = &["is_correct", "isCorrect", "correct"];

/// Explicit question-type candidates.
const TYPE_FIELDS: &[&str] = &["type", "question_type", "questionType"];

/// Explicit correct-answer key candidates (string form).
const CORRECT_KEY_FIELDS: &[&str] = &["correct_answer", "correctAnswer", "correct_option"];

/// Correct-answer position candidates (numeric form).
const CORRECT_INDEX_FIELDS: &[&str] = &[
    "correct_answer_index",
    "correctAnswerIndex",
    "correct_answer_id",
    "correctAnswerId",
];

/// Record identifier candidates.
const ID_FIELDS: &[&str] = &["id", "question_id", "questionId"];

/// Content publisher candidates.
const PUBLISHER_FIELDS: &[&str] = &["publisher_id", "publisherId"];

/// Illustration URL candidates.
const IMAGE_FIELDS: &[&str] = &["image_url", "imageUrl", "image_path", "imagePath"];

/// Publisher logo URL candidates.
const LOGO_FIELDS: &[&str] = &["publisher_logo_url", "publisherLogoUrl", "logo_url", "logoUrl"];

/// Keys a batch payload may nest its record array under.
const BATCH_FIELDS: &[&str] = &["questions", "items", "results", "data"];

/// Explicit type aliases, canonicalized to lowercase with underscores.
const TRUE_FALSE_TYPES: &[&str] = &["true_false", "truefalse", "tf", "dogru_yanlis"];
const CLASSIC_TYPES: &[&str] = &["classic", "klasik", "open_ended"];
const MULTIPLE_CHOICE_TYPES: &[&str] = &["multiple_choice", "multiplechoice", "mc", "coktan_secmeli"];

/// True/false literal aliases, matched lowercase.
const TRUE_ALIASES: &[&str] = &["true", "dogru", "doğru"];
const FALSE_ALIASES: &[&str] = &["false", "yanlis", "yanlış", "wrong"];

/// At most this many answers are kept per question.
const MAX_ANSWERS: usize = 4;

/// Convert a single raw record into canonical form.
///
/// Returns `None` when the record has no usable prompt or cannot produce
/// a consistent answer shape. Never panics on malformed input.
///
/// A record without an ID gets `QuestionId(0)`; batch normalization
/// defaults IDs from the record position instead.
#[must_use]
pub fn normalize(raw: &Value) -> Option<NormalizedQuestion> {
    normalize_record(raw, 0)
}

/// Normalize every usable record in a batch payload.
///
/// The payload may be a bare array or an object nesting the array under
/// one of the known batch keys. Unusable records are skipped with a log
/// line; record IDs default to their 1-based position.
#[must_use]
pub fn normalize_batch(payload: &Value) -> Vec<NormalizedQuestion> {
    let Some(records) = batch_records(payload) else {
        warn!("question payload contained no record array");
        return Vec::new();
    };

    let mut questions = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match normalize_record(record, index as u32 + 1) {
            Some(question) => questions.push(question),
            None => warn!(index, "skipped question record with no usable shape"),
        }
    }
    debug!(
        normalized = questions.len(),
        raw = records.len(),
        "normalized question batch"
    );
    questions
}

/// Locate the record array inside a batch payload.
fn batch_records(payload: &Value) -> Option<&Vec<Value>> {
    if let Value::Array(records) = payload {
        return Some(records);
    }
    let obj = payload.as_object()?;
    BATCH_FIELDS
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_array))
}

fn normalize_record(raw: &Value, default_id: u32) -> Option<NormalizedQuestion> {
    raw.as_object()?;

    let prompt = string_field(raw, PROMPT_FIELDS)?;
    let answers = extract_answers(raw);
    let kind = infer_kind(raw, &answers);

    let (options, correct) = match kind {
        QuestionKind::MultipleChoice => {
            // A choice question with nothing to choose from is unusable.
            if answers.entries.is_empty() {
                return None;
            }
            let options = build_options(&answers, MAX_ANSWERS);
            let correct = resolve_choice_correct(raw, &answers, &options);
            (options, correct)
        }
        QuestionKind::TrueFalse => {
            let options = build_options(&answers, 2);
            let correct = resolve_true_false_correct(raw, &answers);
            (options, correct)
        }
        // Open answers carry no options; the key slot holds the fixed "A".
        QuestionKind::Classic => (OptionSet::empty(), AnswerKey::Choice(OptionKey::A)),
    };

    let id = QuestionId::new(u32_field(raw, ID_FIELDS).unwrap_or(default_id));
    let mut question = NormalizedQuestion::new(id, kind, prompt, options, correct);

    if let Some(publisher_id) = u32_field(raw, PUBLISHER_FIELDS) {
        question = question.with_publisher_id(publisher_id);
    }
    if let Some(url) = string_field(raw, IMAGE_FIELDS) {
        question = question.with_image_url(url);
    }
    if let Some(url) = string_field(raw, LOGO_FIELDS) {
        question = question.with_publisher_logo_url(url);
    }

    Some(question)
}

/// One answer pulled out of a raw record, before kind resolution.
struct RawAnswer {
    /// Explicit key, present when the source was a key-to-text map.
    key: Option<OptionKey>,
    text: String,
    flagged_correct: bool,
}

struct RawAnswers {
    entries: Vec<RawAnswer>,
    /// Whether the source was an option-letter keyed map.
    keyed: bool,
}

fn extract_answers(raw: &Value) -> RawAnswers {
    let Some(obj) = raw.as_object() else {
        return RawAnswers { entries: Vec::new(), keyed: false };
    };

    for field in ANSWER_FIELDS {
        match obj.get(*field) {
            Some(Value::Array(items)) => return answers_from_array(items),
            Some(Value::Object(map)) => return answers_from_map(map),
            _ => continue,
        }
    }
    RawAnswers { entries: Vec::new(), keyed: false }
}

fn answers_from_array(items: &[Value]) -> RawAnswers {
    let mut entries = Vec::new();
    for item in items {
        if entries.len() == MAX_ANSWERS {
            break;
        }
        match item {
            Value::String(_) | Value::Number(_) => {
                if let Some(text) = value_text(item) {
                    entries.push(RawAnswer { key: None, text, flagged_correct: false });
                }
            }
            Value::Object(entry) => {
                let text = ANSWER_TEXT_FIELDS
                    .iter()
                    .find_map(|key| entry.get(*key).and_then(value_text));
                if let Some(text) = text {
                    let flagged = ANSWER_FLAG_FIELDS
                        .iter()
                        .any(|key| entry.get(*key).and_then(Value::as_bool) == Some(true));
                    entries.push(RawAnswer { key: None, text, flagged_correct: flagged });
                }
            }
            _ => {}
        }
    }
    RawAnswers { entries, keyed: false }
}

/// A map whose keys are all option letters keeps those keys; anything
/// else degrades to values-in-map-order with sequential keys.
fn answers_from_map(map: &serde_json::Map<String, Value>) -> RawAnswers {
    let letter_keys: Vec<Option<OptionKey>> =
        map.keys().map(|k| parse_option_letter(k)).collect();

    if !map.is_empty() && letter_keys.iter().all(Option::is_some) {
        let mut entries: Vec<RawAnswer> = map
            .values()
            .zip(letter_keys)
            .filter_map(|(value, key)| {
                value_text(value).map(|text| RawAnswer { key, text, flagged_correct: false })
            })
            .collect();
        entries.sort_by_key(|e| e.key);
        entries.truncate(MAX_ANSWERS);
        return RawAnswers { entries, keyed: true };
    }

    let entries = map
        .values()
        .filter_map(|value| {
            value_text(value).map(|text| RawAnswer { key: None, text, flagged_correct: false })
        })
        .take(MAX_ANSWERS)
        .collect();
    RawAnswers { entries, keyed: false }
}

fn infer_kind(raw: &Value, answers: &RawAnswers) -> QuestionKind {
    if let Some(alias) = string_field(raw, TYPE_FIELDS) {
        if let Some(kind) = kind_from_alias(&alias) {
            return kind;
        }
    }
    if answers.entries.is_empty() {
        QuestionKind::Classic
    } else if answers.keyed {
        // Explicitly keyed options were authored as a choice question,
        // even when only two keys are populated.
        QuestionKind::MultipleChoice
    } else if answers.entries.len() == 2 {
        QuestionKind::TrueFalse
    } else {
        QuestionKind::MultipleChoice
    }
}

fn kind_from_alias(alias: &str) -> Option<QuestionKind> {
    let canonical = alias.trim().to_lowercase().replace(['-', ' '], "_");
    if TRUE_FALSE_TYPES.contains(&canonical.as_str()) {
        Some(QuestionKind::TrueFalse)
    } else if CLASSIC_TYPES.contains(&canonical.as_str()) {
        Some(QuestionKind::Classic)
    } else if MULTIPLE_CHOICE_TYPES.contains(&canonical.as_str()) {
        Some(QuestionKind::MultipleChoice)
    } else {
        None
    }
}

fn build_options(answers: &RawAnswers, cap: usize) -> OptionSet {
    let mut options = OptionSet::empty();
    for (index, entry) in answers.entries.iter().take(cap).enumerate() {
        let key = entry.key.or_else(|| OptionKey::from_index(index));
        if let Some(key) = key {
            options.insert(key, entry.text.clone());
        }
    }
    options
}

/// Correct key for a multiple-choice question.
///
/// Resolution order: per-answer flag, explicit key field naming a
/// populated option, clamped index field, first populated option.
fn resolve_choice_correct(raw: &Value, answers: &RawAnswers, options: &OptionSet) -> AnswerKey {
    if let Some(key) = flagged_key(answers) {
        if options.contains(key) {
            return AnswerKey::Choice(key);
        }
    }

    if let Some(text) = string_field(raw, CORRECT_KEY_FIELDS) {
        if let Some(key) = parse_option_letter(&text) {
            if options.contains(key) {
                return AnswerKey::Choice(key);
            }
        }
    }

    if let Some(index) = correct_index(raw) {
        if let Some(key) = key_at_position(answers, index) {
            if options.contains(key) {
                return AnswerKey::Choice(key);
            }
        }
    }

    // Last resort per the tolerance rules: the first answer is correct.
    AnswerKey::Choice(options.first_key().unwrap_or(OptionKey::A))
}

/// Correct literal for a true/false question.
///
/// Resolution order: explicit field (letter or localized literal),
/// per-answer flag, index field, then `true`.
fn resolve_true_false_correct(raw: &Value, answers: &RawAnswers) -> AnswerKey {
    if let Some(text) = string_field(raw, CORRECT_KEY_FIELDS) {
        if let Some(key) = true_false_from_text(&text) {
            return key;
        }
        if let Some(letter) = parse_option_letter(&text) {
            return true_false_at_position(answers, letter.index());
        }
    }

    if let Some(position) = answers.entries.iter().take(2).position(|e| e.flagged_correct) {
        return true_false_at_position(answers, position);
    }

    if let Some(index) = correct_index(raw) {
        return true_false_at_position(answers, index.min(1) as usize);
    }

    AnswerKey::True
}

/// Map an answer position to a true/false literal, preferring the text
/// at that position over raw ordering.
fn true_false_at_position(answers: &RawAnswers, position: usize) -> AnswerKey {
    if let Some(entry) = answers.entries.get(position) {
        if let Some(key) = true_false_from_text(&entry.text) {
            return key;
        }
    }
    if position == 0 {
        AnswerKey::True
    } else {
        AnswerKey::False
    }
}

fn true_false_from_text(text: &str) -> Option<AnswerKey> {
    let canonical = text.trim().to_lowercase();
    if TRUE_ALIASES.contains(&canonical.as_str()) {
        Some(AnswerKey::True)
    } else if FALSE_ALIASES.contains(&canonical.as_str()) {
        Some(AnswerKey::False)
    } else {
        None
    }
}

fn flagged_key(answers: &RawAnswers) -> Option<OptionKey> {
    answers
        .entries
        .iter()
        .enumerate()
        .find(|(_, e)| e.flagged_correct)
        .and_then(|(index, entry)| entry.key.or_else(|| OptionKey::from_index(index)))
}

fn key_at_position(answers: &RawAnswers, index: u32) -> Option<OptionKey> {
    if answers.entries.is_empty() {
        return None;
    }
    let clamped = (index as usize).min(answers.entries.len() - 1);
    answers.entries[clamped]
        .key
        .or_else(|| OptionKey::from_index(clamped))
}

fn parse_option_letter(text: &str) -> Option<OptionKey> {
    match text.trim() {
        "A" | "a" => Some(OptionKey::A),
        "B" | "b" => Some(OptionKey::B),
        "C" | "c" => Some(OptionKey::C),
        "D" | "d" => Some(OptionKey::D),
        _ => None,
    }
}

/// First present candidate field holding a non-blank string.
///
/// Numbers are accepted and stringified; other types are skipped.
fn string_field(raw: &Value, candidates: &[&str]) -> Option<String> {
    let obj = raw.as_object()?;
    candidates
        .iter()
        .find_map(|key| obj.get(*key).and_then(value_text))
}

/// First present candidate field holding a non-negative integer.
///
/// Accepts JSON numbers and numeric strings; negatives clamp to 0.
fn u32_field(raw: &Value, candidates: &[&str]) -> Option<u32> {
    let obj = raw.as_object()?;
    candidates.iter().find_map(|key| numeric_value(obj.get(*key)?))
}

fn correct_index(raw: &Value) -> Option<u32> {
    if let Some(index) = u32_field(raw, CORRECT_INDEX_FIELDS) {
        return Some(index);
    }
    // A numeric value under a key field is an index in disguise.
    let obj = raw.as_object()?;
    CORRECT_KEY_FIELDS
        .iter()
        .find_map(|key| obj.get(*key).filter(|v| v.is_number()).and_then(numeric_value))
}

fn numeric_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(|v| v.max(0) as u32)
            .or_else(|| n.as_f64().map(|f| f.max(0.0) as u32)),
        Value::String(s) => s.trim().parse::<i64>().ok().map(|v| v.max(0) as u32),
        _ => None,
    }
}

/// Trimmed non-blank text of a string or number value.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
