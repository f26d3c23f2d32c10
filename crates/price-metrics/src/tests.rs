use super::*;
use analysis_core::PricePoint;
use approx::assert_relative_eq;
use chrono::{Duration, TimeZone, Utc};

fn series(prices: &[f64]) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    PriceSeries::from_points(
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                timestamp: start + Duration::days(i as i64),
                close,
            })
            .collect(),
    )
}

fn compute(prices: &[f64]) -> MetricsRecord {
    MetricsEngine::new().compute(&series(prices)).unwrap()
}

#[test]
fn test_reference_scenario() {
    let m = compute(&[100.0, 110.0, 99.0, 121.0]);

    assert_relative_eq!(m.period_return_pct.unwrap(), 21.0, epsilon = 1e-9);
    assert_eq!(m.start_price, 100.0);
    assert_eq!(m.last_price, 121.0);
    assert_eq!(m.max_price, 121.0);
    assert_eq!(m.min_price, 99.0);
    assert_relative_eq!(m.max_drawdown_pct.unwrap(), -10.0, epsilon = 1e-9);
    assert_eq!(m.observations, 4);
}

#[test]
fn test_reference_scenario_returns() {
    // returns: +10%, -10%, +22.2222%
    let m = compute(&[100.0, 110.0, 99.0, 121.0]);
    let r = [0.10, -0.10, 121.0 / 99.0 - 1.0];
    let mean = r.iter().sum::<f64>() / 3.0;
    let var = r.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / 2.0;

    assert_relative_eq!(m.mean_daily_return_pct.unwrap(), mean * 100.0, epsilon = 1e-9);
    assert_relative_eq!(m.daily_volatility_pct.unwrap(), var.sqrt() * 100.0, epsilon = 1e-9);
    assert_relative_eq!(
        m.annualized_volatility_pct.unwrap(),
        var.sqrt() * 100.0 * 252.0_f64.sqrt(),
        epsilon = 1e-9
    );
}

#[test]
fn test_monotonic_increase() {
    let m = compute(&[10.0, 11.0, 12.5, 13.0, 20.0]);
    assert_eq!(m.max_drawdown_pct, Some(0.0));
    assert!(m.period_return_pct.unwrap() > 0.0);
    assert!(m.mean_daily_return_pct.unwrap() > 0.0);
}

#[test]
fn test_constant_series() {
    let m = compute(&[50.0; 10]);
    assert_eq!(m.period_return_pct, Some(0.0));
    assert_eq!(m.daily_volatility_pct, Some(0.0));
    assert_eq!(m.annualized_volatility_pct, Some(0.0));
    assert_eq!(m.max_drawdown_pct, Some(0.0));
    assert_eq!(m.mean_daily_return_pct, Some(0.0));
}

#[test]
fn test_single_point_uses_zero_convention() {
    let m = compute(&[42.0]);
    assert_eq!(m.start_price, 42.0);
    assert_eq!(m.last_price, 42.0);
    assert_eq!(m.period_return_pct, Some(0.0));
    assert_eq!(m.daily_volatility_pct, Some(0.0));
    assert_eq!(m.mean_daily_return_pct, Some(0.0));
    assert_eq!(m.max_drawdown_pct, Some(0.0));
}

#[test]
fn test_two_points_have_zero_volatility() {
    // a single return has no sample dispersion
    let m = compute(&[100.0, 105.0]);
    assert_eq!(m.daily_volatility_pct, Some(0.0));
    assert_relative_eq!(m.mean_daily_return_pct.unwrap(), 5.0, epsilon = 1e-9);
}

#[test]
fn test_bounds_hold_for_various_series() {
    let cases: Vec<Vec<f64>> = vec![
        vec![100.0, 90.0],
        vec![5.0, 7.0, 3.0, 9.0, 1.0, 4.0],
        vec![200.0, 150.0, 175.0, 120.0, 130.0],
        vec![1.0, 1.5, 1.2, 1.8, 1.7, 2.5, 0.9],
        (1..=60).map(|i| 100.0 + ((i * 37) % 23) as f64 - 11.0).collect(),
    ];

    for prices in cases {
        let m = compute(&prices);
        assert!(m.min_price <= m.start_price && m.start_price <= m.max_price, "{:?}", prices);
        assert!(m.min_price <= m.last_price && m.last_price <= m.max_price, "{:?}", prices);
        assert!(m.max_drawdown_pct.unwrap() <= 0.0, "{:?}", prices);
    }
}

#[test]
fn test_decline_reports_negative_return() {
    let m = compute(&[100.0, 80.0, 60.0]);
    assert_relative_eq!(m.period_return_pct.unwrap(), -40.0, epsilon = 1e-9);
    assert_relative_eq!(m.max_drawdown_pct.unwrap(), -40.0, epsilon = 1e-9);
}

#[test]
fn test_zero_start_price_is_absent_not_zero() {
    let m = compute(&[0.0, 10.0, 12.0]);
    assert_eq!(m.period_return_pct, None);
    assert_eq!(m.mean_daily_return_pct, None);
    assert_eq!(m.min_price, 0.0);
}

#[test]
fn test_empty_series_is_error() {
    let result = MetricsEngine::new().compute(&PriceSeries::default());
    assert!(matches!(result, Err(AnalysisError::EmptyData(_))));
}

#[test]
fn test_compute_from_table() {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let mut table = PriceTable::new(vec!["Open".into(), "Adj Close".into()]);
    table.push_row(start, vec![Some(1.0), Some(100.0)]);
    table.push_row(start + Duration::days(1), vec![Some(1.0), None]);
    table.push_row(start + Duration::days(2), vec![Some(1.0), Some(110.0)]);

    let m = MetricsEngine::default().compute_from_table(&table).unwrap();
    assert_eq!(m.observations, 2);
    assert_relative_eq!(m.period_return_pct.unwrap(), 10.0, epsilon = 1e-9);
}

#[test]
fn test_metrics_serialize_absence_as_null() {
    let m = compute(&[0.0, 10.0]);
    let json = serde_json::to_value(&m).unwrap();
    assert!(json["period_return_pct"].is_null());
    assert_eq!(json["last_price"], serde_json::json!(10.0));
}
