use analysis_core::{
    AnalysisError, AnalysisRecord, AnalysisRequest, FundamentalsSnapshot, FundamentalsSource,
    PriceHistorySource, PriceTable,
};
use chrono::{DateTime, Utc};
use fundamental_analysis::FundamentalsAdapter;
use price_metrics::{extract_close_series, MetricsEngine};
use serde_json::Value;

pub mod coach;
pub mod config;

pub use coach::{CoachResponse, MarketCoach, DISCLAIMER};
pub use config::CoachConfig;

/// Combines price metrics and fundamentals into one `AnalysisRecord`.
///
/// Price failures abort the analysis. Fundamentals failures never do: they
/// are logged and replaced with an all-absent snapshot.
pub struct AnalysisCoordinator {
    metrics_engine: MetricsEngine,
    fundamentals_adapter: FundamentalsAdapter,
}

impl AnalysisCoordinator {
    pub fn new() -> Self {
        Self {
            metrics_engine: MetricsEngine::new(),
            fundamentals_adapter: FundamentalsAdapter::new(),
        }
    }

    /// Trimmed, uppercased ticker; an empty ticker is rejected.
    pub fn normalize_ticker(ticker: &str) -> Result<String, AnalysisError> {
        let normalized = ticker.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(AnalysisError::InvalidInput("ticker must not be empty".to_string()));
        }
        Ok(normalized)
    }

    /// Analyze already-fetched data.
    pub fn analyze(
        &self,
        request: &AnalysisRequest,
        prices: &PriceTable,
        raw_fundamentals: &Value,
    ) -> Result<AnalysisRecord, AnalysisError> {
        self.analyze_at(request, prices, Ok(raw_fundamentals.clone()), Utc::now())
    }

    /// Fetch from the two sources and analyze. The fundamentals source is
    /// only consulted once the price history is in hand.
    pub fn analyze_with_sources(
        &self,
        request: &AnalysisRequest,
        prices: &dyn PriceHistorySource,
        fundamentals: &dyn FundamentalsSource,
    ) -> Result<AnalysisRecord, AnalysisError> {
        let ticker = Self::normalize_ticker(&request.ticker)?;
        let table = prices.price_history(&ticker, request.period.trim(), request.interval.trim())?;
        let raw = fundamentals.fundamentals(&ticker);
        self.analyze_at(request, &table, raw, Utc::now())
    }

    fn analyze_at(
        &self,
        request: &AnalysisRequest,
        prices: &PriceTable,
        raw_fundamentals: Result<Value, AnalysisError>,
        as_of: DateTime<Utc>,
    ) -> Result<AnalysisRecord, AnalysisError> {
        let ticker = Self::normalize_ticker(&request.ticker)?;
        tracing::info!(
            "Starting analysis for {} (period: {}, interval: {})",
            ticker,
            request.period.trim(),
            request.interval.trim()
        );

        let series = extract_close_series(prices)?;
        let metrics = self.metrics_engine.compute(&series)?;
        let fundamentals = self.resolve_fundamentals(&ticker, raw_fundamentals);

        tracing::info!(
            "Analysis complete for {}: {} observations, return {:?}%",
            ticker,
            metrics.observations,
            metrics.period_return_pct
        );

        Ok(AnalysisRecord {
            ticker,
            as_of,
            period: request.period.trim().to_string(),
            interval: request.interval.trim().to_string(),
            fundamentals,
            metrics,
        })
    }

    fn resolve_fundamentals(
        &self,
        ticker: &str,
        raw: Result<Value, AnalysisError>,
    ) -> FundamentalsSnapshot {
        match raw.and_then(|value| self.fundamentals_adapter.adapt(ticker, &value)) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Fundamentals unavailable for {}, continuing without them: {}", ticker, e);
                FundamentalsSnapshot::unavailable()
            }
        }
    }
}

impl Default for AnalysisCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
