use crate::error::ForecastError;
use crate::models::FeederId;
use crate::store::{Direction, Filter, FilterOp, Row, SelectQuery, TableStore};
use crate::types::{timestamp, Namespace};

use async_trait::async_trait;
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::sync::Mutex;

/// Create a forecast row with the API's fixed version, tag, scenario and architecture.
pub(crate) fn forecast_row(
    feeder_id: FeederId,
    target_timestamp: &str,
    forecast_value: f64,
    actual_value: Option<f64>,
) -> Row {
    let value = json!({
        "feeder_id": feeder_id,
        "model_version": "v1.7_HP_Tuning_1",
        "tag": "exp_HP",
        "scenario_type": "24hr",
        "model_architecture_type": "LSTM",
        "target_timestamp": target_timestamp,
        "forecast_value": forecast_value,
        "actual_value": actual_value,
    });
    match value {
        Value::Object(row) => row,
        _ => unreachable!(),
    }
}

/// Create a copy of a row with one column replaced.
pub(crate) fn with_column(mut row: Row, column: &str, value: Value) -> Row {
    row.insert(column.to_string(), value);
    row
}

/// Create a row of the feeder metadata table.
pub(crate) fn feeder_row(feeder_id: FeederId) -> Row {
    let mut row = Row::new();
    row.insert("Feeder_ID".to_string(), json!(feeder_id));
    row.insert("Feeder_Name".to_string(), json!(format!("feeder {}", feeder_id)));
    row
}

/// An in-memory [TableStore] that evaluates queries the way PostgREST would.
///
/// Records every query it receives.
#[derive(Default)]
pub(crate) struct MemoryStore {
    tables: Vec<(Namespace, String, Vec<Row>)>,
    failure: Option<u16>,
    queries: Mutex<Vec<SelectQuery>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Return a store that answers every query with the given error status.
    pub(crate) fn failing(status: u16) -> Self {
        MemoryStore {
            failure: Some(status),
            ..Default::default()
        }
    }

    pub(crate) fn with_table(mut self, namespace: Namespace, table: &str, rows: Vec<Row>) -> Self {
        self.tables.push((namespace, table.to_string(), rows));
        self
    }

    pub(crate) fn queries(&self) -> Vec<SelectQuery> {
        self.queries.lock().unwrap().clone()
    }
}

/// Compare cells as timestamps, then numbers, then strings.
fn compare(a: &str, b: &str) -> Ordering {
    if let (Ok(a), Ok(b)) = (timestamp::parse_store(a), timestamp::parse_store(b)) {
        return a.cmp(&b);
    }
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(a), Ok(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

fn cell(row: &Row, column: &str) -> Option<String> {
    match row.get(column) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

fn matches(row: &Row, filter: &Filter) -> bool {
    match cell(row, &filter.column) {
        None => false,
        Some(cell) => match filter.op {
            FilterOp::Eq => cell == filter.value,
            FilterOp::Gte => compare(&cell, &filter.value) != Ordering::Less,
            FilterOp::Lte => compare(&cell, &filter.value) != Ordering::Greater,
        },
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>, ForecastError> {
        self.queries.lock().unwrap().push(query.clone());
        if let Some(status) = self.failure {
            return Err(ForecastError::StoreStatus {
                status,
                message: "store unavailable".to_string(),
            });
        }
        let table = self
            .tables
            .iter()
            .find(|(namespace, table, _)| *namespace == query.namespace && *table == query.table);
        let rows = match table {
            Some((_, _, rows)) => rows,
            None => {
                return Err(ForecastError::StoreStatus {
                    status: 404,
                    message: format!(
                        "relation \"{}.{}\" does not exist",
                        query.namespace, query.table
                    ),
                })
            }
        };
        let mut rows: Vec<Row> = rows
            .iter()
            .filter(|row| query.filters.iter().all(|filter| matches(row, filter)))
            .cloned()
            .collect();
        if let Some((column, direction)) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = match (cell(a, column), cell(b, column)) {
                    (Some(a), Some(b)) => compare(&a, &b),
                    (a, b) => a.is_some().cmp(&b.is_some()),
                };
                match direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        }
        if let Some(columns) = &query.columns {
            for row in rows.iter_mut() {
                row.retain(|key, _| columns.contains(key));
            }
        }
        Ok(rows)
    }
}
