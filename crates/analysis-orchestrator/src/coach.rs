//! One coaching session: analysis, a seeded quiz and flashcards.

use analysis_core::{AnalysisError, AnalysisRecord, AnalysisRequest, FundamentalsSource, PriceHistorySource};
use learning_engine::{generate_quiz_and_flashcards, Flashcard, QuizSeed, QuizQuestion};
use serde::Serialize;

use crate::config::CoachConfig;
use crate::AnalysisCoordinator;

pub const DISCLAIMER: &str = "This content is for educational purposes only and is not financial advice.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachResponse {
    pub ticker: String,
    pub analysis: AnalysisRecord,
    pub quiz: Vec<QuizQuestion>,
    pub flashcards: Vec<Flashcard>,
    pub disclaimer: String,
    /// Set when the deck could not be generated; the analysis is still returned.
    pub quiz_error: Option<String>,
}

pub struct MarketCoach {
    coordinator: AnalysisCoordinator,
    config: CoachConfig,
}

impl MarketCoach {
    pub fn new(config: CoachConfig) -> Self {
        Self {
            coordinator: AnalysisCoordinator::new(),
            config,
        }
    }

    pub fn config(&self) -> &CoachConfig {
        &self.config
    }

    pub fn run(
        &self,
        request: &AnalysisRequest,
        prices: &dyn PriceHistorySource,
        fundamentals: &dyn FundamentalsSource,
    ) -> Result<CoachResponse, AnalysisError> {
        let request = request.normalized();
        let analysis = self.coordinator.analyze_with_sources(&request, prices, fundamentals)?;

        let seed = QuizSeed::for_request(&request);
        tracing::debug!("Quiz seed for {} ({}): {}", request.ticker, request.user_level, seed);

        let (quiz, flashcards, quiz_error) =
            match generate_quiz_and_flashcards(&analysis, seed, self.config.num_questions) {
                Ok(deck) => (deck.quiz, deck.flashcards, None),
                Err(e) => {
                    tracing::warn!("Quiz generation failed for {}: {}", analysis.ticker, e);
                    (Vec::new(), Vec::new(), Some(e.to_string()))
                }
            };

        Ok(CoachResponse {
            ticker: analysis.ticker.clone(),
            analysis,
            quiz,
            flashcards,
            disclaimer: DISCLAIMER.to_string(),
            quiz_error,
        })
    }
}

impl Default for MarketCoach {
    fn default() -> Self {
        Self::new(CoachConfig::default())
    }
}
