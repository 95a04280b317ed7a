//! Store abstraction: filtered, sorted reads of schema-qualified tables.

use crate::error::ForecastError;
use crate::types::Namespace;

use async_trait::async_trait;
use strum_macros::Display;

/// A single row returned by the store, keyed by column name.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Comparison applied by a [Filter].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum FilterOp {
    /// Column equals value
    Eq,
    /// Column greater than or equal to value
    Gte,
    /// Column less than or equal to value
    Lte,
}

/// A predicate on one column. Filters within a query are combined with AND.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: String,
}

/// Sort direction
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

/// A read against one table in one namespace.
///
/// Built with chained calls:
///
/// ```
/// use feederwatch::store::{Direction, SelectQuery};
/// use feederwatch::types::Namespace;
///
/// let query = SelectQuery::new(Namespace::Ml, "forecasts")
///     .eq("feeder_id", 7)
///     .gte("target_timestamp", "2024-01-01T00:00:00Z")
///     .order("target_timestamp", Direction::Asc);
/// assert_eq!(2, query.filters.len());
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SelectQuery {
    /// Namespace holding the table
    pub namespace: Namespace,
    /// Table name
    pub table: String,
    /// Columns to return. `None` returns every column.
    pub columns: Option<Vec<String>>,
    /// Predicates, combined with AND
    pub filters: Vec<Filter>,
    /// Optional sort column and direction
    pub order: Option<(String, Direction)>,
}

impl SelectQuery {
    /// Return a query selecting every row and column of a table.
    pub fn new(namespace: Namespace, table: &str) -> Self {
        SelectQuery {
            namespace,
            table: table.to_string(),
            columns: None,
            filters: vec![],
            order: None,
        }
    }

    /// Restrict the returned columns.
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    fn filter(mut self, column: &str, op: FilterOp, value: impl ToString) -> Self {
        self.filters.push(Filter {
            column: column.to_string(),
            op,
            value: value.to_string(),
        });
        self
    }

    /// Add an exact-match predicate.
    pub fn eq(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Eq, value)
    }

    /// Add an inclusive lower bound.
    pub fn gte(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Gte, value)
    }

    /// Add an inclusive upper bound.
    pub fn lte(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Lte, value)
    }

    /// Sort the result on a column.
    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }
}

/// Read access to a hosted relational store.
///
/// Implementations return an empty vector when nothing matches and an error when the store
/// cannot be reached or rejects the query.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Run a query and return the matching rows.
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>, ForecastError>;
}
