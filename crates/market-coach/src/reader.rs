//! CSV price files.
//!
//! The first column holds the timestamp, every other column is a labeled
//! series. With two header rows the labels are two-level (`Close` / `AAPL`),
//! the layout market-data exports use when several tickers share a file.

use analysis_core::numeric::parse_number;
use analysis_core::{AnalysisError, ColumnLabel, PriceTable};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::io::Read;

pub fn read_price_table<R: Read>(reader: R, header_rows: usize) -> Result<PriceTable, AnalysisError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = csv_reader.records();

    let mut headers: Vec<csv::StringRecord> = Vec::with_capacity(header_rows);
    for _ in 0..header_rows {
        match records.next() {
            Some(record) => headers.push(record.map_err(csv_error)?),
            None => break,
        }
    }
    let mut table = PriceTable::new(column_labels(&headers));

    for record in records {
        let record = record.map_err(csv_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let stamp = record.get(0).unwrap_or_default();
        let values: Vec<Option<f64>> = record.iter().skip(1).map(parse_number).collect();

        match parse_timestamp(stamp) {
            Some(timestamp) => table.push_row(timestamp, values),
            // Header residue such as a lone `Date,,,,` row
            None if values.iter().all(Option::is_none) => {
                tracing::debug!("Skipping line {} without timestamp or values", line);
            }
            None => {
                return Err(AnalysisError::Source(format!(
                    "line {}: unrecognized timestamp '{}'",
                    line, stamp
                )));
            }
        }
    }

    Ok(table)
}

fn column_labels(headers: &[csv::StringRecord]) -> Vec<ColumnLabel> {
    let width = headers.iter().map(|h| h.len()).max().unwrap_or(0);

    (1..width)
        .map(|i| match headers {
            [single] => ColumnLabel::Flat(single.get(i).unwrap_or_default().to_string()),
            _ => ColumnLabel::Nested(
                headers
                    .iter()
                    .map(|h| h.get(i).filter(|part| !part.is_empty()).map(str::to_string))
                    .collect(),
            ),
        })
        .collect()
}

/// RFC 3339, `YYYY-MM-DD HH:MM:SS±HH:MM`, `YYYY-MM-DD HH:MM:SS` (UTC) or
/// `YYYY-MM-DD` (UTC midnight).
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn csv_error(e: csv::Error) -> AnalysisError {
    AnalysisError::Source(format!("CSV parse error: {}", e))
}
