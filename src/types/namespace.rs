use serde::Deserialize;
use strum_macros::Display;

/// Schema (namespace) of the hosted store holding a table.
///
/// Selected per query, never held as client state.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Namespace {
    /// Forecasts and other model outputs
    Ml,
    /// Feeder metadata
    Metadata,
    /// Default schema of the store. No lookup reads from it; it names the schema a
    /// PostgREST request falls back to when no profile is sent.
    Public,
}
