//! Stable quiz seeds.
//!
//! The seed is a public contract: trim and uppercase the ticker, trim the
//! period, interval and user level, join them as `ticker|period|interval|level`,
//! hash with SHA-256 and read the first 8 digest bytes as a big-endian `u64`.
//! Any implementation following those steps reproduces the same seed.

use analysis_core::AnalysisRequest;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

const KEY_DELIMITER: &str = "|";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct QuizSeed(u64);

impl QuizSeed {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    pub fn derive(ticker: &str, period: &str, interval: &str, user_level: &str) -> Self {
        let key = seed_key(ticker, period, interval, user_level);
        let digest = Sha256::digest(key.as_bytes());

        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        Self(u64::from_be_bytes(prefix))
    }

    pub fn for_request(request: &AnalysisRequest) -> Self {
        Self::derive(
            &request.ticker,
            &request.period,
            &request.interval,
            &request.user_level,
        )
    }
}

impl From<u64> for QuizSeed {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for QuizSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Normalized, order-sensitive key the seed is hashed from.
pub fn seed_key(ticker: &str, period: &str, interval: &str, user_level: &str) -> String {
    [
        ticker.trim().to_uppercase(),
        period.trim().to_string(),
        interval.trim().to_string(),
        user_level.trim().to_string(),
    ]
    .join(KEY_DELIMITER)
}
