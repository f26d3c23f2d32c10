use thiserror::Error;

use crate::types::QuestionTopic;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LearningError {
    #[error("Invalid {topic} question: {reason}")]
    InvalidQuestion { topic: QuestionTopic, reason: String },

    #[error("Correct answer of {topic} question desynchronized by shuffle: expected '{expected}', found '{found}'")]
    AnswerDesync {
        topic: QuestionTopic,
        expected: String,
        found: String,
    },
}
