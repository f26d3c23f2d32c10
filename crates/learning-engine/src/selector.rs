//! Seeded option shuffling and question selection.
//!
//! One generator per deck, created from the deck's seed and threaded through
//! both steps: first every question's options are permuted (bank order), then
//! the bank itself is permuted with the same, unreset generator and the first
//! `k` questions are kept. ChaCha8 is pinned so a seed maps to the same deck
//! on every platform.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::LearningError;
use crate::seed::QuizSeed;
use crate::types::QuizQuestion;

/// Deterministic source of permutations
pub struct PermutationSource {
    rng: ChaCha8Rng,
}

impl PermutationSource {
    pub fn new(seed: QuizSeed) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed.value()),
        }
    }

    /// Next permutation of `0..n`
    pub fn next_permutation(&mut self, n: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut self.rng);
        order
    }
}

/// Reorder a question's options so that position `i` shows the option that
/// was at `permutation[i]`, keeping the correct index on the same text.
pub fn apply_option_permutation(
    question: QuizQuestion,
    permutation: &[usize],
) -> Result<QuizQuestion, LearningError> {
    let expected = question.correct_answer().to_string();

    let mut sorted = permutation.to_vec();
    sorted.sort_unstable();
    if !sorted.iter().copied().eq(0..question.options.len()) {
        return Err(LearningError::InvalidQuestion {
            topic: question.topic,
            reason: format!(
                "permutation of length {} does not match {} options",
                permutation.len(),
                question.options.len()
            ),
        });
    }

    let options: Vec<String> = permutation.iter().map(|&i| question.options[i].clone()).collect();
    let correct_option_index = permutation
        .iter()
        .position(|&i| i == question.correct_option_index)
        .unwrap_or(usize::MAX);

    let shuffled = QuizQuestion {
        options,
        correct_option_index,
        ..question
    };
    shuffled.validate()?;

    if shuffled.correct_answer() != expected {
        return Err(LearningError::AnswerDesync {
            topic: shuffled.topic,
            expected,
            found: shuffled.correct_answer().to_string(),
        });
    }
    Ok(shuffled)
}

/// Shuffle options and bank order with one generator seeded from `seed`,
/// then keep the first `count` questions (at least one when the bank is not
/// empty).
pub fn select_questions(
    bank: Vec<QuizQuestion>,
    seed: QuizSeed,
    count: usize,
) -> Result<Vec<QuizQuestion>, LearningError> {
    if bank.is_empty() {
        return Ok(Vec::new());
    }

    let mut source = PermutationSource::new(seed);

    let mut shuffled = Vec::with_capacity(bank.len());
    for question in bank {
        let permutation = source.next_permutation(question.options().len());
        shuffled.push(apply_option_permutation(question, &permutation)?);
    }

    let order = source.next_permutation(shuffled.len());
    let mut slots: Vec<Option<QuizQuestion>> = shuffled.into_iter().map(Some).collect();
    let take = count.max(1).min(slots.len());

    let selected: Vec<QuizQuestion> = order
        .into_iter()
        .take(take)
        .filter_map(|i| slots[i].take())
        .collect();

    tracing::debug!("Selected {} of {} questions (seed {})", selected.len(), slots.len(), seed);
    Ok(selected)
}
