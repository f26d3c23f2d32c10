//! Column normalization for raw price tables.
//!
//! Providers disagree on column layout: some return flat labels ("Close",
//! "Adj Close"), some return two-level labels pairing the field with the
//! ticker ("Close", "AAPL"), and some use their own spellings ("close",
//! "4. close"). Everything here reduces those layouts to one close-price series.

use analysis_core::{AnalysisError, PricePoint, PriceSeries, PriceTable};

const EXACT_CLOSE: &str = "Close";
const EXACT_ADJ_CLOSE: &str = "Adj Close";
const CLOSE_NEEDLE: &str = "close";

/// Flatten every column label of the table into a single-level label.
pub fn flatten_columns(table: &PriceTable) -> Vec<String> {
    table.columns.iter().map(|c| c.flatten()).collect()
}

/// Locate the closing-price column among flattened labels.
///
/// Priority: exact "Close", then exact "Adj Close", then any label containing
/// "close" (case-insensitive). Among the fuzzy matches a label that starts
/// with "close" beats one that merely contains it, then the shorter label
/// wins, then the earlier column.
pub fn find_close_column(labels: &[String]) -> Option<usize> {
    if let Some(idx) = labels.iter().position(|l| l == EXACT_CLOSE) {
        return Some(idx);
    }
    if let Some(idx) = labels.iter().position(|l| l == EXACT_ADJ_CLOSE) {
        return Some(idx);
    }

    labels
        .iter()
        .enumerate()
        .filter_map(|(idx, label)| {
            let lower = label.to_lowercase();
            lower.contains(CLOSE_NEEDLE).then(|| {
                let not_prefix = !lower.starts_with(CLOSE_NEEDLE);
                ((not_prefix, label.chars().count(), idx), idx)
            })
        })
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, idx)| idx)
}

/// Reduce a raw price table to its close-price series.
pub fn extract_close_series(table: &PriceTable) -> Result<PriceSeries, AnalysisError> {
    if table.is_empty() {
        return Err(AnalysisError::EmptyData(
            "price table contains no rows".to_string(),
        ));
    }

    let labels = flatten_columns(table);
    let close_idx = find_close_column(&labels).ok_or_else(|| AnalysisError::DataFormat {
        available: labels.clone(),
    })?;
    tracing::debug!("Using column '{}' as close price", labels[close_idx]);

    let points: Vec<PricePoint> = table
        .rows
        .iter()
        .filter_map(|row| {
            let close = row.values.get(close_idx).copied().flatten()?;
            close.is_finite().then_some(PricePoint { timestamp: row.timestamp, close })
        })
        .collect();

    let dropped = table.rows.len() - points.len();
    if dropped > 0 {
        tracing::debug!("Dropped {} rows with missing close prices", dropped);
    }

    let series = PriceSeries::from_points(points);
    if series.is_empty() {
        return Err(AnalysisError::EmptyData(format!(
            "no usable values in close column '{}'",
            labels[close_idx]
        )));
    }
    Ok(series)
}
