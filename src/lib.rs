//! This crate provides Feederwatch, the read-only HTTP API behind the feeder load forecast
//! dashboard. It serves forecasts for electricity distribution feeders, together with simple
//! load and accuracy metrics, from tables held in a hosted Postgres store.
//!
//! Feederwatch is built on top of a number of open source components.
//!
//! * [Tokio](tokio), the most popular asynchronous Rust runtime.
//! * [Axum](axum) web framework, built by the Tokio team, on top of the [hyper] HTTP library.
//! * [Serde](serde) performs (de)serialisation of JSON request and response data.
//! * [reqwest] talks to the store's PostgREST interface.
//! * [AWS SDK for S3](aws-sdk-s3) is used to interact with the store's object storage.
//! * [ndarray] provides the forecast value columns used to compute metrics.

pub mod app;
pub mod app_state;
pub mod blob_store;
pub mod cli;
pub mod error;
pub mod lookup;
pub mod metrics;
pub mod models;
pub mod postgrest;
pub mod repository;
pub mod series;
pub mod server;
pub mod store;
pub mod summary;
#[cfg(test)]
pub mod test_utils;
pub mod tracing;
pub mod types;
pub mod validated_query;
