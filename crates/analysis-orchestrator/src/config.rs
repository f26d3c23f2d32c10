use learning_engine::DEFAULT_NUM_QUESTIONS;

pub const NUM_QUESTIONS_ENV: &str = "COACH_NUM_QUESTIONS";

/// Coaching session settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoachConfig {
    /// Questions per quiz before clamping to the bank size
    pub num_questions: usize,
}

impl CoachConfig {
    pub fn new(num_questions: usize) -> Self {
        Self { num_questions }
    }

    /// Read `COACH_NUM_QUESTIONS`, falling back to the default when it is
    /// unset or not a positive integer.
    pub fn from_env() -> Self {
        let raw = std::env::var(NUM_QUESTIONS_ENV).ok();
        Self::new(parse_num_questions(raw.as_deref()))
    }
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_QUESTIONS)
    }
}

fn parse_num_questions(raw: Option<&str>) -> usize {
    let Some(raw) = raw else {
        return DEFAULT_NUM_QUESTIONS;
    };
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => {
            tracing::warn!(
                "Invalid {}={:?}, using default of {}",
                NUM_QUESTIONS_ENV,
                raw,
                DEFAULT_NUM_QUESTIONS
            );
            DEFAULT_NUM_QUESTIONS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        assert_eq!(CoachConfig::default().num_questions, 5);
    }

    #[test]
    fn test_parse_num_questions() {
        assert_eq!(parse_num_questions(None), DEFAULT_NUM_QUESTIONS);
        assert_eq!(parse_num_questions(Some("8")), 8);
        assert_eq!(parse_num_questions(Some(" 3 ")), 3);
        assert_eq!(parse_num_questions(Some("0")), DEFAULT_NUM_QUESTIONS);
        assert_eq!(parse_num_questions(Some("-2")), DEFAULT_NUM_QUESTIONS);
        assert_eq!(parse_num_questions(Some("many")), DEFAULT_NUM_QUESTIONS);
    }
}
