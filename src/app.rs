//! Forecast API: router and request handlers.

use crate::app_state::{AppState, SharedAppState};
use crate::cli::CommandLineArgs;
use crate::error::ForecastError;
use crate::metrics;
use crate::models::{
    AccuracyResponse, FeederId, FeederListResponse, ForecastListResponse, ForecastQuery,
    MessageResponse, MetricsResponse, SeriesEntry,
};
use crate::summary;
use crate::validated_query::ValidatedQuery;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower::Layer;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

/// Set to `true` on responses whose empty payload stands in for a store failure.
pub const HEADER_DEGRADED: &str = "x-feederwatch-degraded";

/// The service served by [crate::server::serve].
pub type Service = NormalizePath<Router>;

/// Attach the degraded marker to a response when the lookup behind it failed.
fn flag_degraded(failed: bool, body: impl IntoResponse) -> Response {
    if failed {
        ([(HEADER_DEGRADED, "true")], body).into_response()
    } else {
        body.into_response()
    }
}

/// Initialise the application.
pub fn init(args: &CommandLineArgs) -> Result<SharedAppState, ForecastError> {
    Ok(Arc::new(AppState::new(args)?))
}

/// Returns a [axum::Router] for the forecast API.
///
/// CORS is open to any origin, method and header.
pub fn router(state: SharedAppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/feeders", get(feeders))
        .route("/forecasts/:feeder_id", get(forecasts))
        .route("/forecasts/:feeder_id/series", get(series))
        .route("/metrics/:feeder_id", get(load_metrics))
        .route("/metrics/:feeder_id/accuracy", get(accuracy))
        .route("/prometheus", get(metrics::metrics_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .on_request(metrics::request_counter)
                        .on_response(metrics::record_response_metrics),
                )
                .layer(cors),
        )
}

/// Returns the [Service]: the router, with trailing slashes removed from request paths.
pub fn service(state: SharedAppState) -> Service {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Forecast Viewer Backend Running!".to_string(),
    })
}

async fn feeders(State(state): State<SharedAppState>) -> Response {
    let lookup = state.repository.list_feeder_ids().await;
    let failed = lookup.is_failed();
    let body = FeederListResponse {
        feeders: lookup.unwrap_or_default(),
    };
    flag_degraded(failed, Json(body))
}

async fn forecasts(
    State(state): State<SharedAppState>,
    Path(feeder_id): Path<FeederId>,
) -> Response {
    let lookup = state.repository.load_forecasts_for_api(feeder_id).await;
    let failed = lookup.is_failed();
    let body = ForecastListResponse {
        forecasts: lookup.unwrap_or_default(),
    };
    flag_degraded(failed, Json(body))
}

async fn series(
    State(state): State<SharedAppState>,
    Path(feeder_id): Path<FeederId>,
    ValidatedQuery(query): ValidatedQuery<ForecastQuery>,
) -> Result<Json<ForecastListResponse<SeriesEntry>>, ForecastError> {
    let series = state.repository.load_forecasts(feeder_id, &query).await?;
    Ok(Json(ForecastListResponse {
        forecasts: series.to_series_entries()?,
    }))
}

async fn load_metrics(
    State(state): State<SharedAppState>,
    Path(feeder_id): Path<FeederId>,
) -> Response {
    let lookup = state.repository.load_series_for_api(feeder_id).await;
    let failed = lookup.is_failed();
    let body: MetricsResponse = lookup
        .map(|series| summary::load_metrics(&series))
        .unwrap_or_default();
    flag_degraded(failed, Json(body))
}

async fn accuracy(
    State(state): State<SharedAppState>,
    Path(feeder_id): Path<FeederId>,
) -> Response {
    let lookup = state.repository.load_series_for_api(feeder_id).await;
    let failed = lookup.is_failed();
    let body: AccuracyResponse = lookup
        .map(|series| summary::accuracy_metrics(&series))
        .unwrap_or_default();
    flag_degraded(failed, Json(body))
}
