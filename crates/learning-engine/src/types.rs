use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::error::LearningError;

/// Which field of the analysis a question is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionTopic {
    PriceDirection,
    DailyVolatility,
    VolatilityLevel,
    MaxDrawdown,
    MeanDailyReturn,
    Sector,
    Industry,
    MarketCap,
    TrailingPe,
    ForwardPe,
    DividendYield,
    Beta,
}

impl QuestionTopic {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionTopic::PriceDirection => "price_direction",
            QuestionTopic::DailyVolatility => "daily_volatility",
            QuestionTopic::VolatilityLevel => "volatility_level",
            QuestionTopic::MaxDrawdown => "max_drawdown",
            QuestionTopic::MeanDailyReturn => "mean_daily_return",
            QuestionTopic::Sector => "sector",
            QuestionTopic::Industry => "industry",
            QuestionTopic::MarketCap => "market_cap",
            QuestionTopic::TrailingPe => "trailing_pe",
            QuestionTopic::ForwardPe => "forward_pe",
            QuestionTopic::DividendYield => "dividend_yield",
            QuestionTopic::Beta => "beta",
        }
    }
}

impl fmt::Display for QuestionTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multiple-choice question.
///
/// Always holds at least two distinct options and a correct index inside
/// them; the fields are only reachable through validated constructors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizQuestion {
    pub(crate) topic: QuestionTopic,
    #[serde(rename = "question")]
    pub(crate) question_text: String,
    pub(crate) options: Vec<String>,
    pub(crate) correct_option_index: usize,
    #[serde(rename = "explanation")]
    pub(crate) explanation_text: String,
}

impl QuizQuestion {
    pub fn new(
        topic: QuestionTopic,
        question_text: impl Into<String>,
        options: Vec<String>,
        correct_option_index: usize,
        explanation_text: impl Into<String>,
    ) -> Result<Self, LearningError> {
        let question = Self {
            topic,
            question_text: question_text.into(),
            options,
            correct_option_index,
            explanation_text: explanation_text.into(),
        };
        question.validate()?;
        Ok(question)
    }

    /// Build a question with `correct` at position 0 followed by up to three
    /// decoys taken in order from `decoy_pool`, skipping any that repeat the
    /// correct answer or each other (case-insensitively).
    pub fn with_correct_first(
        topic: QuestionTopic,
        question_text: impl Into<String>,
        correct: impl Into<String>,
        decoy_pool: &[&str],
        explanation_text: impl Into<String>,
    ) -> Result<Self, LearningError> {
        let correct = correct.into();
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(correct.to_lowercase());

        let mut options = vec![correct];
        for decoy in decoy_pool {
            if options.len() == 4 {
                break;
            }
            if seen.insert(decoy.to_lowercase()) {
                options.push(decoy.to_string());
            }
        }

        Self::new(topic, question_text, options, 0, explanation_text)
    }

    pub fn validate(&self) -> Result<(), LearningError> {
        let invalid = |reason: String| LearningError::InvalidQuestion { topic: self.topic, reason };

        if self.options.len() < 2 {
            return Err(invalid(format!("needs at least 2 options, has {}", self.options.len())));
        }
        if self.correct_option_index >= self.options.len() {
            return Err(invalid(format!(
                "correct index {} out of range for {} options",
                self.correct_option_index,
                self.options.len()
            )));
        }
        let unique: HashSet<&str> = self.options.iter().map(|o| o.as_str()).collect();
        if unique.len() != self.options.len() {
            return Err(invalid("options are not unique".to_string()));
        }
        Ok(())
    }

    pub fn topic(&self) -> QuestionTopic {
        self.topic
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_option_index(&self) -> usize {
        self.correct_option_index
    }

    pub fn correct_answer(&self) -> &str {
        &self.options[self.correct_option_index]
    }

    pub fn explanation_text(&self) -> &str {
        &self.explanation_text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flashcard {
    #[serde(rename = "front")]
    pub front_text: String,
    #[serde(rename = "back")]
    pub back_text: String,
}

impl Flashcard {
    pub fn new(front_text: impl Into<String>, back_text: impl Into<String>) -> Self {
        Self {
            front_text: front_text.into(),
            back_text: back_text.into(),
        }
    }
}

/// Final quiz plus flashcards for one request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuizDeck {
    pub quiz: Vec<QuizQuestion>,
    pub flashcards: Vec<Flashcard>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_first_skips_duplicate_decoys() {
        let q = QuizQuestion::with_correct_first(
            QuestionTopic::Sector,
            "Which sector?",
            "Technology",
            &["technology", "Energy", "Energy", "Utilities", "Healthcare", "Industrials"],
            "Because.",
        )
        .unwrap();

        assert_eq!(q.options(), &["Technology", "Energy", "Utilities", "Healthcare"]);
        assert_eq!(q.correct_option_index(), 0);
        assert_eq!(q.correct_answer(), "Technology");
    }

    #[test]
    fn test_rejects_single_option() {
        let result = QuizQuestion::with_correct_first(
            QuestionTopic::Beta,
            "Q?",
            "Only",
            &["only"],
            "E.",
        );
        assert!(matches!(result, Err(LearningError::InvalidQuestion { .. })));
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let result = QuizQuestion::new(
            QuestionTopic::Beta,
            "Q?",
            vec!["a".into(), "b".into()],
            2,
            "E.",
        );
        assert!(matches!(result, Err(LearningError::InvalidQuestion { .. })));
    }

    #[test]
    fn test_rejects_duplicate_options() {
        let result = QuizQuestion::new(
            QuestionTopic::Beta,
            "Q?",
            vec!["a".into(), "a".into()],
            0,
            "E.",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_wire_names() {
        let q = QuizQuestion::new(
            QuestionTopic::MaxDrawdown,
            "Q?",
            vec!["a".into(), "b".into()],
            1,
            "E.",
        )
        .unwrap();
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["question"], "Q?");
        assert_eq!(json["explanation"], "E.");
        assert_eq!(json["correct_option_index"], 1);
        assert_eq!(json["topic"], "max_drawdown");

        let card = serde_json::to_value(Flashcard::new("F", "B")).unwrap();
        assert_eq!(card["front"], "F");
        assert_eq!(card["back"], "B");
    }
}
