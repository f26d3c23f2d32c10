use analysis_core::numeric::finite;
use analysis_core::{AnalysisError, MetricsRecord, PriceSeries, PriceTable};
use statrs::statistics::Statistics;

pub mod normalizer;

pub use normalizer::{extract_close_series, find_close_column, flatten_columns};

/// Typical number of trading days in a year
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

pub struct MetricsEngine;

impl MetricsEngine {
    pub fn new() -> Self {
        Self
    }

    /// Calculate simple returns from prices
    fn calculate_returns(&self, prices: &[f64]) -> Vec<f64> {
        prices
            .windows(2)
            .map(|w| w[1] / w[0] - 1.0)
            .collect()
    }

    /// Sample standard deviation of returns as a percentage.
    /// Zero when there are fewer than two returns.
    fn calculate_daily_volatility(&self, returns: &[f64]) -> Option<f64> {
        if returns.len() < 2 {
            return Some(0.0);
        }
        finite(returns.std_dev() * 100.0)
    }

    /// Mean of returns as a percentage, zero when there are no returns
    fn calculate_mean_return(&self, returns: &[f64]) -> Option<f64> {
        if returns.is_empty() {
            return Some(0.0);
        }
        finite(returns.mean() * 100.0)
    }

    /// Maximum drawdown from the running peak, as a non-positive percentage.
    /// Points whose running peak is not positive are skipped.
    fn calculate_max_drawdown(&self, prices: &[f64]) -> Option<f64> {
        let mut running_max = f64::NEG_INFINITY;
        let mut worst: Option<f64> = None;

        for &price in prices {
            if price > running_max {
                running_max = price;
            }
            if running_max <= 0.0 {
                continue;
            }
            let drawdown = (price - running_max) / running_max;
            worst = Some(worst.map_or(drawdown, |w: f64| w.min(drawdown)));
        }

        worst.and_then(|dd| finite(dd.min(0.0) * 100.0))
    }

    fn calculate_period_return(&self, start: f64, last: f64) -> Option<f64> {
        finite((last / start - 1.0) * 100.0)
    }

    /// Compute the full metrics record for a close-price series.
    pub fn compute(&self, series: &PriceSeries) -> Result<MetricsRecord, AnalysisError> {
        let prices = series.closes();
        let (start_price, last_price) = match (prices.first(), prices.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => {
                return Err(AnalysisError::EmptyData(
                    "price series is empty".to_string(),
                ))
            }
        };

        let returns = self.calculate_returns(&prices);
        let daily_volatility = self.calculate_daily_volatility(&returns);
        let annualized_volatility =
            daily_volatility.and_then(|v| finite(v * TRADING_DAYS_PER_YEAR.sqrt()));

        let min_price = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max_price = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        tracing::debug!(
            "Computed metrics over {} prices ({} returns)",
            prices.len(),
            returns.len()
        );

        Ok(MetricsRecord {
            last_price,
            start_price,
            period_return_pct: self.calculate_period_return(start_price, last_price),
            daily_volatility_pct: daily_volatility,
            annualized_volatility_pct: annualized_volatility,
            max_drawdown_pct: self.calculate_max_drawdown(&prices),
            mean_daily_return_pct: self.calculate_mean_return(&returns),
            min_price,
            max_price,
            observations: prices.len(),
        })
    }

    /// Normalize a raw price table and compute its metrics.
    pub fn compute_from_table(&self, table: &PriceTable) -> Result<MetricsRecord, AnalysisError> {
        let series = extract_close_series(table)?;
        self.compute(&series)
    }
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
