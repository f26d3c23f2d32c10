use analysis_core::numeric::{coerce_f64, coerce_text};
use analysis_core::{AnalysisError, FundamentalsSnapshot};
use serde_json::{Map, Value};

// Provider keys per field. The first spelling is the quote-summary camelCase
// name; the rest are aliases seen in cached or hand-written records.
const SHORT_NAME: &[&str] = &["shortName", "short_name"];
const LONG_NAME: &[&str] = &["longName", "long_name", "name"];
const SECTOR: &[&str] = &["sector", "sectorDisp"];
const INDUSTRY: &[&str] = &["industry", "industryDisp"];
const MARKET_CAP: &[&str] = &["marketCap", "market_cap"];
const TRAILING_PE: &[&str] = &["trailingPE", "trailing_pe", "peRatio", "pe_ratio"];
const FORWARD_PE: &[&str] = &["forwardPE", "forward_pe"];
const DIVIDEND_YIELD: &[&str] = &["dividendYield", "dividend_yield"];
const BETA: &[&str] = &["beta"];
const CURRENCY: &[&str] = &["currency", "financialCurrency"];
const EXCHANGE: &[&str] = &["exchange", "fullExchangeName", "primary_exchange"];
const COUNTRY: &[&str] = &["country"];

/// Maps loosely-typed provider fundamentals onto a [`FundamentalsSnapshot`].
pub struct FundamentalsAdapter;

impl FundamentalsAdapter {
    pub fn new() -> Self {
        Self
    }

    /// First usable value among `keys`, coerced with `coerce`.
    fn lookup<T>(&self, record: &Map<String, Value>, keys: &[&str], coerce: fn(&Value) -> Option<T>) -> Option<T> {
        keys.iter().filter_map(|key| record.get(*key)).find_map(coerce)
    }

    /// Build a snapshot from a provider record.
    ///
    /// Missing or malformed fields become `None`. A `null` record yields a
    /// snapshot with only the ticker set; a record that is not a JSON object
    /// at all is reported as `FundamentalsUnavailable`.
    pub fn adapt(&self, ticker: &str, raw: &Value) -> Result<FundamentalsSnapshot, AnalysisError> {
        let ticker = ticker.trim().to_uppercase();
        let empty = Map::new();
        let record = match raw {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(AnalysisError::FundamentalsUnavailable(format!(
                    "expected an object for {}, got {}",
                    ticker,
                    json_kind(other)
                )))
            }
        };

        let snapshot = FundamentalsSnapshot {
            ticker: (!ticker.is_empty()).then_some(ticker),
            short_name: self.lookup(record, SHORT_NAME, coerce_text),
            long_name: self.lookup(record, LONG_NAME, coerce_text),
            sector: self.lookup(record, SECTOR, coerce_text),
            industry: self.lookup(record, INDUSTRY, coerce_text),
            market_cap: self.lookup(record, MARKET_CAP, coerce_f64),
            trailing_pe: self.lookup(record, TRAILING_PE, coerce_f64),
            forward_pe: self.lookup(record, FORWARD_PE, coerce_f64),
            dividend_yield: self.lookup(record, DIVIDEND_YIELD, coerce_f64),
            beta: self.lookup(record, BETA, coerce_f64),
            currency: self.lookup(record, CURRENCY, coerce_text),
            exchange: self.lookup(record, EXCHANGE, coerce_text),
            country: self.lookup(record, COUNTRY, coerce_text),
        };

        tracing::debug!(
            "Adapted fundamentals for {}: {} of 12 fields present",
            snapshot.ticker.as_deref().unwrap_or("?"),
            present_fields(&snapshot)
        );
        Ok(snapshot)
    }
}

impl Default for FundamentalsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn present_fields(s: &FundamentalsSnapshot) -> usize {
    [
        s.short_name.is_some(),
        s.long_name.is_some(),
        s.sector.is_some(),
        s.industry.is_some(),
        s.market_cap.is_some(),
        s.trailing_pe.is_some(),
        s.forward_pe.is_some(),
        s.dividend_yield.is_some(),
        s.beta.is_some(),
        s.currency.is_some(),
        s.exchange.is_some(),
        s.country.is_some(),
    ]
    .iter()
    .filter(|present| **present)
    .count()
}
