//! Forecast repository
//!
//! Translates forecast lookups into store queries and normalises the rows into a
//! [ForecastSeries]. Two operations, [ForecastRepository::list_feeder_ids] and the
//! `*_for_api` loaders, never fail outward: they return a [Lookup] so that callers can answer
//! with empty data while still knowing whether the store was reachable.

use crate::error::{log_error_chain, ForecastError};
use crate::lookup::Lookup;
use crate::metrics::STORE_FAILURES;
use crate::models::{ApiForecastEntry, FeederId, FeederRow, ForecastQuery};
use crate::series::ForecastSeries;
use crate::store::{Direction, SelectQuery, TableStore};
use crate::types::{timestamp, Namespace};

use std::sync::Arc;
use tracing::{info, warn};

/// Table holding forecast entries, in [Namespace::Ml].
pub const FORECASTS_TABLE: &str = "forecasts";
/// Table listing known feeders, in [Namespace::Metadata].
pub const FEEDERS_TABLE: &str = "Feeders_Metadata";
/// Feeder identifier column of [FEEDERS_TABLE].
pub const FEEDER_ID_COLUMN: &str = "Feeder_ID";

/// Fixed parameters of the dashboard's forecast and metrics endpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiDefaults {
    pub version: String,
    pub tag: String,
    pub scenario_type: String,
    pub model_architecture_type: String,
}

impl Default for ApiDefaults {
    fn default() -> Self {
        ApiDefaults {
            version: "v1.7_HP_Tuning_1".to_string(),
            tag: "exp_HP".to_string(),
            scenario_type: "24hr".to_string(),
            model_architecture_type: "LSTM".to_string(),
        }
    }
}

impl ApiDefaults {
    /// Return the equivalent [ForecastQuery].
    pub fn query(&self) -> ForecastQuery {
        ForecastQuery {
            version: self.version.clone(),
            tag: Some(self.tag.clone()),
            scenario_type: Some(self.scenario_type.clone()),
            model_architecture_type: Some(self.model_architecture_type.clone()),
            start_time: None,
            end_time: None,
        }
    }
}

/// Repository configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct RepositorySettings {
    /// Tag used when a query does not name one
    pub default_tag: String,
    /// Parameters of the dashboard endpoints
    pub api: ApiDefaults,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        RepositorySettings {
            default_tag: "exp_HP".to_string(),
            api: ApiDefaults::default(),
        }
    }
}

/// Treat an empty filter value as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Read-only access to forecasts and feeders.
///
/// Holds no per-request state and may be shared between concurrent requests.
pub struct ForecastRepository {
    store: Arc<dyn TableStore>,
    settings: RepositorySettings,
}

impl ForecastRepository {
    /// Create a repository over a store.
    pub fn new(store: Arc<dyn TableStore>, settings: RepositorySettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &RepositorySettings {
        &self.settings
    }

    /// List the identifiers of all known feeders, in store order.
    ///
    /// Store errors are logged and reported as [Lookup::Failed].
    #[tracing::instrument(level = "DEBUG", skip(self))]
    pub async fn list_feeder_ids(&self) -> Lookup<Vec<FeederId>> {
        info!("Fetching list of feeder IDs");
        let query =
            SelectQuery::new(Namespace::Metadata, FEEDERS_TABLE).columns(&[FEEDER_ID_COLUMN]);
        let result = match self.store.select(&query).await {
            Ok(rows) => rows
                .into_iter()
                .map(|row| serde_json::from_value::<FeederRow>(serde_json::Value::Object(row)))
                .map(|row| row.map(|row| row.feeder_id))
                .collect::<Result<Vec<_>, _>>()
                .map_err(ForecastError::from),
            Err(error) => Err(error),
        };
        match result {
            Ok(feeder_ids) if feeder_ids.is_empty() => {
                warn!("No feeders found in metadata table");
                Lookup::Empty
            }
            Ok(feeder_ids) => {
                info!("Found {} feeders", feeder_ids.len());
                Lookup::Found(feeder_ids)
            }
            Err(error) => {
                log_error_chain("Error fetching feeder IDs", &error);
                STORE_FAILURES.with_label_values(&["list_feeder_ids"]).inc();
                Lookup::Failed(error)
            }
        }
    }

    /// Return the store query for a forecast lookup.
    ///
    /// Feeder, version and tag are always matched. The other filters are added only when set.
    pub fn forecast_query(
        &self,
        feeder_id: FeederId,
        query: &ForecastQuery,
    ) -> Result<SelectQuery, ForecastError> {
        let tag = present(&query.tag).unwrap_or(&self.settings.default_tag);
        let mut select = SelectQuery::new(Namespace::Ml, FORECASTS_TABLE)
            .eq("feeder_id", feeder_id)
            .eq("model_version", &query.version)
            .eq("tag", tag);
        if let Some(scenario_type) = present(&query.scenario_type) {
            select = select.eq("scenario_type", scenario_type);
        }
        if let Some(model_architecture_type) = present(&query.model_architecture_type) {
            select = select.eq("model_architecture_type", model_architecture_type);
        }
        if let Some(start_time) = &query.start_time {
            select = select.gte("target_timestamp", timestamp::format_store(start_time)?);
        }
        if let Some(end_time) = &query.end_time {
            select = select.lte("target_timestamp", timestamp::format_store(end_time)?);
        }
        Ok(select.order("target_timestamp", Direction::Asc))
    }

    /// Load a forecast series.
    ///
    /// Returns an empty series when nothing matches. Store errors are logged and returned.
    #[tracing::instrument(level = "DEBUG", skip(self))]
    pub async fn load_forecasts(
        &self,
        feeder_id: FeederId,
        query: &ForecastQuery,
    ) -> Result<ForecastSeries, ForecastError> {
        let result = self.try_load_forecasts(feeder_id, query).await;
        if let Err(error) = &result {
            log_error_chain("Error loading forecasts", error);
        }
        result
    }

    async fn try_load_forecasts(
        &self,
        feeder_id: FeederId,
        query: &ForecastQuery,
    ) -> Result<ForecastSeries, ForecastError> {
        let select = self.forecast_query(feeder_id, query)?;
        let rows = self.store.select(&select).await?;
        if rows.is_empty() {
            warn!("No forecast data found for feeder {}", feeder_id);
            return Ok(ForecastSeries::default());
        }
        let series = ForecastSeries::from_rows(rows)?;
        info!(
            "Loaded {} forecast entries with tag '{}'",
            series.len(),
            present(&query.tag).unwrap_or(&self.settings.default_tag)
        );
        Ok(series)
    }

    /// Load the series shown by the dashboard for a feeder.
    ///
    /// Uses the fixed [ApiDefaults]. Errors are reported as [Lookup::Failed].
    pub async fn load_series_for_api(&self, feeder_id: FeederId) -> Lookup<ForecastSeries> {
        match self
            .load_forecasts(feeder_id, &self.settings.api.query())
            .await
        {
            Ok(series) if series.is_empty() => Lookup::Empty,
            Ok(series) => Lookup::Found(series),
            Err(error) => {
                STORE_FAILURES.with_label_values(&["load_forecasts"]).inc();
                Lookup::Failed(error)
            }
        }
    }

    /// Load the dashboard's forecast entries for a feeder: timestamp, forecast and actual
    /// value.
    pub async fn load_forecasts_for_api(
        &self,
        feeder_id: FeederId,
    ) -> Lookup<Vec<ApiForecastEntry>> {
        match self.load_series_for_api(feeder_id).await {
            Lookup::Found(series) => match series.to_api_entries() {
                Ok(entries) => Lookup::Found(entries),
                Err(error) => {
                    log_error_chain(
                        &format!("Error loading forecasts for feeder {}", feeder_id),
                        &error,
                    );
                    Lookup::Failed(error)
                }
            },
            Lookup::Empty => Lookup::Empty,
            Lookup::Failed(error) => Lookup::Failed(error),
        }
    }
}
