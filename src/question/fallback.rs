//! Bundled fallback question pool.
//!
//! Used whenever remote content is unavailable: no game code configured,
//! fetch failures after retries, or a working list that comes up short.
//! IDs live in a reserved 9000 range so padded questions never collide
//! with remote record IDs.

use super::model::{
    AnswerKey, NormalizedQuestion, OptionKey, OptionSet, QuestionId, QuestionKind,
};

/// First ID of the reserved fallback range.
pub const FALLBACK_ID_BASE: u32 = 9000;

fn choice(
    id: u32,
    prompt: &str,
    options: [&str; 4],
    correct: OptionKey,
) -> NormalizedQuestion {
    NormalizedQuestion::new(
        QuestionId::new(FALLBACK_ID_BASE + id),
        QuestionKind::MultipleChoice,
        prompt,
        OptionSet::from_texts(options),
        AnswerKey::Choice(correct),
    )
}

fn true_false(id: u32, prompt: &str, answer: bool) -> NormalizedQuestion {
    NormalizedQuestion::new(
        QuestionId::new(FALLBACK_ID_BASE + id),
        QuestionKind::TrueFalse,
        prompt,
        OptionSet::from_texts(["True", "False"]),
        if answer { AnswerKey::True } else { AnswerKey::False },
    )
}

fn classic(id: u32, prompt: &str) -> NormalizedQuestion {
    NormalizedQuestion::new(
        QuestionId::new(FALLBACK_ID_BASE + id),
        QuestionKind::Classic,
        prompt,
        OptionSet::empty(),
        AnswerKey::Choice(OptionKey::A),
    )
}

/// The built-in general-knowledge pool.
///
/// Fills the shortest session outright and is varied across the three
/// question kinds. Longer sessions that outgrow it shorten rather
/// than fail.
#[must_use]
pub fn fallback_pool() -> Vec<NormalizedQuestion> {
    vec![
        choice(
            1,
            "Which planet is known as the Red Planet?",
            ["Venus", "Mars", "Jupiter", "Mercury"],
            OptionKey::B,
        ),
        choice(
            2,
            "How many continents are there on Earth?",
            ["Five", "Six", "Seven", "Eight"],
            OptionKey::C,
        ),
        choice(
            3,
            "Which animal is the largest living on land?",
            ["Giraffe", "Hippopotamus", "African elephant", "Rhinoceros"],
            OptionKey::C,
        ),
        choice(
            4,
            "What is the capital of Japan?",
            ["Osaka", "Kyoto", "Seoul", "Tokyo"],
            OptionKey::D,
        ),
        choice(
            5,
            "Which gas do plants absorb from the air?",
            ["Oxygen", "Carbon dioxide", "Nitrogen", "Hydrogen"],
            OptionKey::B,
        ),
        choice(
            6,
            "How many colors are there in a rainbow?",
            ["Five", "Six", "Seven", "Nine"],
            OptionKey::C,
        ),
        choice(
            7,
            "Which ocean is the largest?",
            ["Atlantic", "Indian", "Arctic", "Pacific"],
            OptionKey::D,
        ),
        choice(
            8,
            "What is the chemical symbol for water?",
            ["WO", "H2O", "CO2", "OH"],
            OptionKey::B,
        ),
        true_false(9, "The Great Wall of China is visible from the Moon with the naked eye.", false),
        true_false(10, "Honey never spoils when stored properly.", true),
        true_false(11, "Sound travels faster in water than in air.", true),
        true_false(12, "A spider is an insect.", false),
        classic(13, "Name the three states of matter commonly taught in school."),
        classic(14, "What force pulls objects toward the center of the Earth?"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_covers_longest_padding_need() {
        // Shortest selectable session is 10 questions; an empty remote
        // list must still fill it with room to spare.
        assert!(fallback_pool().len() >= 12);
    }

    #[test]
    fn test_pool_ids_are_unique_and_reserved() {
        let pool = fallback_pool();
        let mut ids: Vec<_> = pool.iter().map(|q| q.id().raw()).collect();
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), pool.len());
        assert!(ids.iter().all(|&id| id > FALLBACK_ID_BASE));
    }

    #[test]
    fn test_pool_mixes_kinds() {
        let pool = fallback_pool();
        let count = |kind: QuestionKind| pool.iter().filter(|q| q.kind() == kind).count();

        assert!(count(QuestionKind::MultipleChoice) >= 4);
        assert!(count(QuestionKind::TrueFalse) >= 2);
        assert!(count(QuestionKind::Classic) >= 1);
    }
}
