use crate::{AnalysisError, PriceTable};

/// Supplies raw price history for a ticker
pub trait PriceHistorySource: Send + Sync {
    fn price_history(&self, ticker: &str, period: &str, interval: &str) -> Result<PriceTable, AnalysisError>;
}

/// Supplies the raw, provider-shaped fundamentals record for a ticker
pub trait FundamentalsSource: Send + Sync {
    fn fundamentals(&self, ticker: &str) -> Result<serde_json::Value, AnalysisError>;
}
