//! Turns an analysis into a reproducible quiz and a set of concept flashcards.
//!
//! The same analysis and seed always give the same deck, option order
//! included. Different seeds give different decks with overwhelming
//! probability.

pub mod error;
pub mod flashcards;
pub mod question_bank;
pub mod seed;
pub mod selector;
pub mod types;

pub use error::LearningError;
pub use flashcards::build_flashcards;
pub use question_bank::build_question_bank;
pub use seed::QuizSeed;
pub use selector::{select_questions, PermutationSource};
pub use types::{Flashcard, QuestionTopic, QuizDeck, QuizQuestion};

use analysis_core::AnalysisRecord;

pub const DEFAULT_NUM_QUESTIONS: usize = 5;

/// Build the question bank for `analysis`, shuffle it with `seed` and keep
/// `num_questions` of them (clamped to `1..=bank size`), plus the flashcards.
pub fn generate_quiz_and_flashcards(
    analysis: &AnalysisRecord,
    seed: QuizSeed,
    num_questions: usize,
) -> Result<QuizDeck, LearningError> {
    let bank = build_question_bank(analysis)?;
    let bank_size = bank.len();
    let quiz = select_questions(bank, seed, num_questions)?;
    let flashcards = build_flashcards(analysis);

    tracing::info!(
        "Generated {} of {} questions and {} flashcards for {} (seed {})",
        quiz.len(),
        bank_size,
        flashcards.len(),
        analysis.ticker,
        seed
    );

    Ok(QuizDeck { quiz, flashcards })
}
