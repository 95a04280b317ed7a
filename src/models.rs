//! Data types and associated functions and methods

use crate::types::timestamp;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::{Validate, ValidationError};

/// Identifier of a distribution feeder
pub type FeederId = i64;

/// One row of the `forecasts` table.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ForecastRow {
    pub feeder_id: FeederId,
    pub model_version: String,
    pub tag: String,
    #[serde(default)]
    pub scenario_type: Option<String>,
    #[serde(default)]
    pub model_architecture_type: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize_store")]
    pub target_timestamp: OffsetDateTime,
    pub forecast_value: f64,
    /// Absent until ground truth is known
    #[serde(default)]
    pub actual_value: Option<f64>,
}

/// One row of the `Feeders_Metadata` table, reduced to the identifier.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct FeederRow {
    #[serde(rename = "Feeder_ID")]
    pub feeder_id: FeederId,
}

/// Query parameters for loading a forecast series.
///
/// Optional filters are applied only when present and non-empty.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_forecast_query"))]
pub struct ForecastQuery {
    /// Model version that produced the forecasts
    #[validate(length(min = 1, message = "version must not be empty"))]
    pub version: String,
    /// Partition tag. Defaults to the repository's tag.
    pub tag: Option<String>,
    /// Forecast horizon, e.g. `24hr`
    pub scenario_type: Option<String>,
    /// Model architecture, e.g. `LSTM`
    pub model_architecture_type: Option<String>,
    /// Inclusive lower bound on the target timestamp (RFC 3339)
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
    /// Inclusive upper bound on the target timestamp (RFC 3339)
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
}

impl ForecastQuery {
    /// Return a query with only the version set.
    pub fn new(version: &str) -> Self {
        ForecastQuery {
            version: version.to_string(),
            ..Default::default()
        }
    }
}

/// Validate that a time range is not inverted
fn validate_forecast_query(query: &ForecastQuery) -> Result<(), ValidationError> {
    if let (Some(start_time), Some(end_time)) = (query.start_time, query.end_time) {
        if start_time > end_time {
            let mut error = ValidationError::new("start_time must not be after end_time");
            error.add_param("start_time".into(), &start_time.unix_timestamp());
            error.add_param("end_time".into(), &end_time.unix_timestamp());
            return Err(error);
        }
    }
    Ok(())
}

/// A forecast point as served to the dashboard.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ApiForecastEntry {
    /// `%Y-%m-%dT%H:%M:%S%z`
    pub target_timestamp: String,
    pub forecast_value: f64,
    pub actual_value: Option<f64>,
}

/// A forecast point with its lineage, as served by the series endpoint.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SeriesEntry {
    pub target_timestamp: String,
    pub forecast_value: f64,
    pub actual_value: Option<f64>,
    pub model_version: String,
    pub tag: String,
    pub scenario_type: Option<String>,
    pub model_architecture_type: Option<String>,
}

#[derive(Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct FeederListResponse {
    pub feeders: Vec<FeederId>,
}

#[derive(Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ForecastListResponse<T> {
    pub forecasts: Vec<T>,
}

/// Load metrics over a forecast series
#[derive(Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct MetricsResponse {
    pub peak_load: f64,
    pub average_load: f64,
}

/// Accuracy metrics over a forecast series
///
/// Load figures are over actual values, falling back to the forecast where the actual value is
/// missing. `smape` is a percentage.
#[derive(Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct AccuracyResponse {
    pub peak_load: f64,
    pub min_load: f64,
    pub average_load: f64,
    pub mae: f64,
    pub rmse: f64,
    pub smape: f64,
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
