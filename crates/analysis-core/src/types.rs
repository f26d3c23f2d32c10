use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PERIOD: &str = "1y";
pub const DEFAULT_INTERVAL: &str = "1d";
pub const DEFAULT_USER_LEVEL: &str = "Beginner";

/// Column label of a raw price table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnLabel {
    Flat(String),
    /// Two-level (or deeper) label, e.g. `["Close", "AAPL"]`
    Nested(Vec<Option<String>>),
}

impl ColumnLabel {
    /// Single-level rendering of the label. Nested parts that are missing or
    /// blank are skipped and the rest joined with an underscore.
    pub fn flatten(&self) -> String {
        match self {
            ColumnLabel::Flat(label) => label.clone(),
            ColumnLabel::Nested(parts) => parts
                .iter()
                .flatten()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>()
                .join("_"),
        }
    }
}

impl From<&str> for ColumnLabel {
    fn from(label: &str) -> Self {
        ColumnLabel::Flat(label.to_string())
    }
}

/// One timestamped row of a raw price table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub timestamp: DateTime<Utc>,
    /// One cell per column; a short row means the trailing cells are missing.
    pub values: Vec<Option<f64>>,
}

/// Raw tabular price history as handed over by the market-data collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    pub columns: Vec<ColumnLabel>,
    pub rows: Vec<PriceRow>,
}

impl PriceTable {
    pub fn new(columns: Vec<ColumnLabel>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    pub fn push_row(&mut self, timestamp: DateTime<Utc>, values: Vec<Option<f64>>) {
        self.rows.push(PriceRow { timestamp, values });
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (`row`, `column`), `None` when missing.
    pub fn cell(&self, row: usize, column: usize) -> Option<f64> {
        self.rows.get(row)?.values.get(column).copied().flatten()
    }
}

/// A single closing price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

/// Ordered close-price series: ascending timestamps, no duplicates, finite closes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from unordered observations. Non-finite closes are
    /// dropped; on duplicate timestamps the last observation wins.
    pub fn from_points(mut points: Vec<PricePoint>) -> Self {
        points.retain(|p| p.close.is_finite());
        points.sort_by_key(|p| p.timestamp);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.timestamp == point.timestamp => *last = point,
                _ => deduped.push(point),
            }
        }
        Self { points: deduped }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

/// Price-derived statistics.
///
/// Percentage fields are multiplied by 100 and signed (losses negative).
/// Optional fields are `None` when they could not be computed to a finite
/// value, e.g. a zero start price.
///
/// Convention: for a series with a single point there are no daily returns,
/// and `daily_volatility_pct`, `annualized_volatility_pct` and
/// `mean_daily_return_pct` are reported as `Some(0.0)`. That zero means
/// "no measurable movement", not "missing data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub last_price: f64,
    pub start_price: f64,
    pub period_return_pct: Option<f64>,
    pub daily_volatility_pct: Option<f64>,
    pub annualized_volatility_pct: Option<f64>,
    pub max_drawdown_pct: Option<f64>,
    pub mean_daily_return_pct: Option<f64>,
    pub min_price: f64,
    pub max_price: f64,
    /// Number of price points the statistics were computed from
    pub observations: usize,
}

impl MetricsRecord {
    /// Direction of the price over the whole period
    pub fn direction(&self) -> PriceDirection {
        if self.last_price > self.start_price {
            PriceDirection::Increased
        } else if self.last_price < self.start_price {
            PriceDirection::Decreased
        } else {
            PriceDirection::Unchanged
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceDirection {
    Increased,
    Decreased,
    Unchanged,
}

/// Company descriptive and valuation fields. Every field may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsSnapshot {
    pub ticker: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub beta: Option<f64>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
    pub country: Option<String>,
}

impl FundamentalsSnapshot {
    /// Snapshot with every field unknown
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Company name for display: short name, long name, then `fallback`.
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.short_name
            .as_deref()
            .or(self.long_name.as_deref())
            .unwrap_or(fallback)
    }
}

/// What the caller asked to analyze
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub ticker: String,
    #[serde(default = "default_period")]
    pub period: String,
    #[serde(default = "default_interval")]
    pub interval: String,
    #[serde(default = "default_user_level")]
    pub user_level: String,
}

fn default_period() -> String {
    DEFAULT_PERIOD.to_string()
}

fn default_interval() -> String {
    DEFAULT_INTERVAL.to_string()
}

fn default_user_level() -> String {
    DEFAULT_USER_LEVEL.to_string()
}

impl AnalysisRequest {
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            period: default_period(),
            interval: default_interval(),
            user_level: default_user_level(),
        }
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = period.into();
        self
    }

    pub fn with_interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = interval.into();
        self
    }

    pub fn with_user_level(mut self, user_level: impl Into<String>) -> Self {
        self.user_level = user_level.into();
        self
    }

    /// Canonical form: ticker trimmed and uppercased, other fields trimmed.
    pub fn normalized(&self) -> Self {
        Self {
            ticker: self.ticker.trim().to_uppercase(),
            period: self.period.trim().to_string(),
            interval: self.interval.trim().to_string(),
            user_level: self.user_level.trim().to_string(),
        }
    }
}

/// Canonical analysis of one ticker; the only input to quiz generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub ticker: String,
    pub as_of: DateTime<Utc>,
    pub period: String,
    pub interval: String,
    pub fundamentals: FundamentalsSnapshot,
    pub metrics: MetricsRecord,
}

impl AnalysisRecord {
    pub fn company_name(&self) -> &str {
        self.fundamentals.display_name(&self.ticker)
    }
}
