use analysis_core::{AnalysisError, FundamentalsSource, PriceHistorySource, PriceTable};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use crate::reader::read_price_table;

/// Reads `<data_dir>/<TICKER>.csv`
pub struct CsvPriceSource {
    data_dir: PathBuf,
    header_rows: usize,
}

impl CsvPriceSource {
    pub fn new(data_dir: impl Into<PathBuf>, header_rows: usize) -> Self {
        Self {
            data_dir: data_dir.into(),
            header_rows,
        }
    }

    fn path_for(&self, ticker: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", ticker))
    }
}

impl PriceHistorySource for CsvPriceSource {
    fn price_history(&self, ticker: &str, period: &str, interval: &str) -> Result<PriceTable, AnalysisError> {
        let path = self.path_for(ticker);
        // Local exports already cover a fixed range, so period and interval
        // only label the request.
        tracing::debug!("Reading {} ({} / {}) from {}", ticker, period, interval, path.display());

        let file = File::open(&path).map_err(|e| source_error(&path, e))?;
        let table = read_price_table(BufReader::new(file), self.header_rows)?;
        tracing::debug!("{}: {} rows, {} columns", ticker, table.rows.len(), table.columns.len());
        Ok(table)
    }
}

/// Reads `<data_dir>/<TICKER>.json`. A missing or malformed file means the
/// fundamentals are unavailable, which the coordinator tolerates.
pub struct JsonFundamentalsSource {
    data_dir: PathBuf,
}

impl JsonFundamentalsSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }
}

impl FundamentalsSource for JsonFundamentalsSource {
    fn fundamentals(&self, ticker: &str) -> Result<Value, AnalysisError> {
        let path = self.data_dir.join(format!("{}.json", ticker));
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AnalysisError::FundamentalsUnavailable(format!(
                    "no fundamentals file at {}",
                    path.display()
                )));
            }
            Err(e) => return Err(source_error(&path, e)),
        };

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            AnalysisError::FundamentalsUnavailable(format!("{}: {}", path.display(), e))
        })
    }
}

fn source_error(path: &Path, e: std::io::Error) -> AnalysisError {
    AnalysisError::Source(format!("{}: {}", path.display(), e))
}
