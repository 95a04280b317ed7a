//! Timestamp parsing and formatting.
//!
//! The store hands out RFC 3339 instants. The API emits
//! `%Y-%m-%dT%H:%M:%S%z`, e.g. `2024-05-01T13:00:00+0000`.

use crate::error::ForecastError;

use serde::{Deserialize, Deserializer};
use time::format_description::well_known::Rfc3339;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

/// Timestamp format used on the wire by the API.
pub const WIRE_FORMAT: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory][offset_minute]"
);

/// Parse a timestamp as returned by the store.
///
/// Values without an offset are taken to be UTC.
pub fn parse_store(value: &str) -> Result<OffsetDateTime, ForecastError> {
    let normalised = value.trim().replacen(' ', "T", 1);
    OffsetDateTime::parse(&normalised, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(&format!("{}Z", normalised), &Rfc3339))
        .map_err(|_| ForecastError::InvalidTimestamp {
            value: value.to_string(),
        })
}

/// Format a timestamp for the query string of a store request.
pub fn format_store(timestamp: &OffsetDateTime) -> Result<String, ForecastError> {
    Ok(timestamp.format(&Rfc3339)?)
}

/// Format a timestamp for an API response.
///
/// Sub-second precision is dropped.
pub fn format_wire(timestamp: &OffsetDateTime) -> Result<String, ForecastError> {
    Ok(timestamp.format(WIRE_FORMAT)?)
}

/// Parse a timestamp in the API wire format.
pub fn parse_wire(value: &str) -> Result<OffsetDateTime, ForecastError> {
    OffsetDateTime::parse(value, WIRE_FORMAT).map_err(|_| ForecastError::InvalidTimestamp {
        value: value.to_string(),
    })
}

/// Serde adapter for store timestamps.
pub fn deserialize_store<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_store(&value).map_err(serde::de::Error::custom)
}
