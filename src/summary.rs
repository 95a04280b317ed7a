//! Scalar metrics over a forecast series.

use crate::models::{AccuracyResponse, MetricsResponse};
use crate::series::ForecastSeries;

use ndarray::{Array1, Zip};
use ndarray_stats::QuantileExt;

/// NaN, from an all-NaN column, is reported as zero.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Largest forecast value, or 0 for an empty series.
pub fn peak(series: &ForecastSeries) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    finite_or_zero(*series.forecast_values().max_skipnan())
}

/// Mean forecast value, or 0 for an empty series.
pub fn average(series: &ForecastSeries) -> f64 {
    series.forecast_values().mean().unwrap_or(0.0)
}

/// Peak and average forecast load.
pub fn load_metrics(series: &ForecastSeries) -> MetricsResponse {
    MetricsResponse {
        peak_load: peak(series),
        average_load: average(series),
    }
}

/// Accuracy of the forecast against actual values.
///
/// Where an actual value is missing the forecast stands in for it, contributing zero error.
/// sMAPE uses the mean absolute magnitude as denominator, replaced by 1 when both values are
/// zero.
pub fn accuracy_metrics(series: &ForecastSeries) -> AccuracyResponse {
    if series.is_empty() {
        return AccuracyResponse::default();
    }
    let forecasts = series.forecast_values();
    let actuals: Array1<f64> = series
        .actual_values()
        .iter()
        .zip(forecasts.iter())
        .map(|(actual, forecast)| actual.unwrap_or(*forecast))
        .collect();
    let errors = &actuals - forecasts;
    let smape = Zip::from(&actuals)
        .and(forecasts)
        .map_collect(|&actual, &forecast| {
            let denominator = (actual.abs() + forecast.abs()) / 2.0;
            let denominator = if denominator == 0.0 { 1.0 } else { denominator };
            (forecast - actual).abs() / denominator
        });

    AccuracyResponse {
        peak_load: finite_or_zero(*actuals.max_skipnan()),
        min_load: finite_or_zero(*actuals.min_skipnan()),
        average_load: actuals.mean().unwrap_or(0.0),
        mae: errors.mapv(f64::abs).mean().unwrap_or(0.0),
        rmse: errors.mapv(|e| e * e).mean().unwrap_or(0.0).sqrt(),
        smape: smape.mean().unwrap_or(0.0) * 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_utils::forecast_row;

    fn make_series(values: &[(f64, Option<f64>)]) -> ForecastSeries {
        let rows = values
            .iter()
            .enumerate()
            .map(|(hour, (forecast, actual))| {
                let timestamp = format!("2024-01-01T{:02}:00:00+00:00", hour);
                forecast_row(1, &timestamp, *forecast, *actual)
            })
            .collect();
        ForecastSeries::from_rows(rows).unwrap()
    }

    #[test]
    fn load_metrics_empty() {
        let series = ForecastSeries::default();
        assert_eq!(
            MetricsResponse {
                peak_load: 0.0,
                average_load: 0.0
            },
            load_metrics(&series)
        );
    }

    #[test]
    fn load_metrics_values() {
        let series = make_series(&[(10.0, None), (20.0, None), (30.0, None)]);
        assert_eq!(
            MetricsResponse {
                peak_load: 30.0,
                average_load: 20.0
            },
            load_metrics(&series)
        );
    }

    #[test]
    fn peak_ignores_actuals() {
        let series = make_series(&[(1.0, Some(100.0)), (2.0, Some(200.0))]);
        assert_eq!(2.0, peak(&series));
        assert_eq!(1.5, average(&series));
    }

    #[test]
    fn peak_negative_values() {
        let series = make_series(&[(-3.0, None), (-1.0, None)]);
        assert_eq!(-1.0, peak(&series));
        assert_eq!(-2.0, average(&series));
    }

    #[test]
    fn accuracy_empty() {
        assert_eq!(
            AccuracyResponse::default(),
            accuracy_metrics(&ForecastSeries::default())
        );
    }

    #[test]
    fn accuracy_values() {
        let series = make_series(&[(10.0, Some(12.0)), (20.0, Some(16.0))]);
        let metrics = accuracy_metrics(&series);
        assert_eq!(16.0, metrics.peak_load);
        assert_eq!(12.0, metrics.min_load);
        assert_eq!(14.0, metrics.average_load);
        assert_eq!(3.0, metrics.mae);
        assert_eq!(10.0_f64.sqrt(), metrics.rmse);
        // |10 - 12| / 11 and |20 - 16| / 18
        let expected_smape = (2.0 / 11.0 + 4.0 / 18.0) / 2.0 * 100.0;
        assert!((expected_smape - metrics.smape).abs() < 1e-9);
    }

    #[test]
    fn accuracy_missing_actuals_fall_back_to_forecast() {
        let series = make_series(&[(10.0, None), (20.0, Some(20.0))]);
        let metrics = accuracy_metrics(&series);
        assert_eq!(20.0, metrics.peak_load);
        assert_eq!(10.0, metrics.min_load);
        assert_eq!(15.0, metrics.average_load);
        assert_eq!(0.0, metrics.mae);
        assert_eq!(0.0, metrics.rmse);
        assert_eq!(0.0, metrics.smape);
    }

    #[test]
    fn accuracy_zero_denominator() {
        let series = make_series(&[(0.0, Some(0.0))]);
        let metrics = accuracy_metrics(&series);
        assert_eq!(0.0, metrics.smape);
    }
}
