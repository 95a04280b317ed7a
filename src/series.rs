//! A forecast series held as a table indexed by target timestamp.

use crate::error::ForecastError;
use crate::models::{ApiForecastEntry, FeederId, ForecastRow, SeriesEntry};
use crate::store::Row;
use crate::types::timestamp;

use ndarray::Array1;
use time::OffsetDateTime;

/// Forecast entries for one feeder, version and tag, in ascending timestamp order.
///
/// Columns are stored separately and share the timestamp index. The forecast column is an
/// [ndarray::Array1] so that aggregates can be computed on it directly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForecastSeries {
    index: Vec<OffsetDateTime>,
    feeder_id: Vec<FeederId>,
    model_version: Vec<String>,
    tag: Vec<String>,
    scenario_type: Vec<Option<String>>,
    model_architecture_type: Vec<Option<String>>,
    forecast_value: Array1<f64>,
    actual_value: Vec<Option<f64>>,
}

impl ForecastSeries {
    /// Build a series from rows returned by the store.
    ///
    /// Rows are ordered by timestamp. The sort is stable, so rows sharing a timestamp keep the
    /// order the store returned them in.
    pub fn from_rows(rows: Vec<Row>) -> Result<Self, ForecastError> {
        let entries = rows
            .into_iter()
            .map(|row| serde_json::from_value(serde_json::Value::Object(row)))
            .collect::<Result<Vec<ForecastRow>, _>>()?;
        Ok(Self::from_entries(entries))
    }

    /// Build a series from decoded rows.
    pub fn from_entries(mut entries: Vec<ForecastRow>) -> Self {
        entries.sort_by_key(|entry| entry.target_timestamp);
        let mut series = ForecastSeries::default();
        let mut forecast_value = Vec::with_capacity(entries.len());
        for entry in entries {
            series.index.push(entry.target_timestamp);
            series.feeder_id.push(entry.feeder_id);
            series.model_version.push(entry.model_version);
            series.tag.push(entry.tag);
            series.scenario_type.push(entry.scenario_type);
            series
                .model_architecture_type
                .push(entry.model_architecture_type);
            forecast_value.push(entry.forecast_value);
            series.actual_value.push(entry.actual_value);
        }
        series.forecast_value = Array1::from_vec(forecast_value);
        series
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Target timestamps, ascending.
    pub fn index(&self) -> &[OffsetDateTime] {
        &self.index
    }

    pub fn feeder_ids(&self) -> &[FeederId] {
        &self.feeder_id
    }

    pub fn forecast_values(&self) -> &Array1<f64> {
        &self.forecast_value
    }

    pub fn actual_values(&self) -> &[Option<f64>] {
        &self.actual_value
    }

    /// Project onto timestamp, forecast and actual value, formatting timestamps for the wire.
    pub fn to_api_entries(&self) -> Result<Vec<ApiForecastEntry>, ForecastError> {
        (0..self.len())
            .map(|i| {
                Ok(ApiForecastEntry {
                    target_timestamp: timestamp::format_wire(&self.index[i])?,
                    forecast_value: self.forecast_value[i],
                    actual_value: self.actual_value[i],
                })
            })
            .collect()
    }

    /// Return every column except the feeder, formatting timestamps for the wire.
    pub fn to_series_entries(&self) -> Result<Vec<SeriesEntry>, ForecastError> {
        (0..self.len())
            .map(|i| {
                Ok(SeriesEntry {
                    target_timestamp: timestamp::format_wire(&self.index[i])?,
                    forecast_value: self.forecast_value[i],
                    actual_value: self.actual_value[i],
                    model_version: self.model_version[i].clone(),
                    tag: self.tag[i].clone(),
                    scenario_type: self.scenario_type[i].clone(),
                    model_architecture_type: self.model_architecture_type[i].clone(),
                })
            })
            .collect()
    }
}
