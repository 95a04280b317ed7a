//! Error handling.

use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Error;
use aws_smithy_types::byte_stream::error::Error as ByteStreamError;
use axum::{
    extract::rejection::QueryRejection,
    http::header,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use thiserror::Error;
use tracing::{event, Level};

/// Forecast server error type
///
/// This type encapsulates the various errors that may occur.
/// Each variant may result in a different API error response.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// A required configuration value is absent or empty
    #[error("missing configuration value {name}")]
    MissingConfiguration { name: &'static str },

    /// The store endpoint could not be turned into a request URL
    #[error("invalid store URL")]
    InvalidUrl(#[from] url::ParseError),

    /// Error sending a request to, or receiving a response from, the store
    #[error("error communicating with the forecast store")]
    StoreRequest(#[from] reqwest::Error),

    /// The store answered with an error status
    #[error("forecast store returned status {status}: {message}")]
    StoreStatus { status: u16, message: String },

    /// Rows returned by the store do not have the expected shape
    #[error("failed to decode rows returned by the forecast store")]
    RowDecode(#[from] serde_json::Error),

    /// A timestamp could not be parsed
    #[error("invalid timestamp {value}")]
    InvalidTimestamp { value: String },

    /// A timestamp could not be formatted
    #[error("failed to format timestamp")]
    TimestampFormat(#[from] time::error::Format),

    /// Error deserialising the query string
    #[error("request query is not valid")]
    RequestQueryRejection(#[from] QueryRejection),

    /// Error validating the query string (single error)
    #[error("request query is not valid")]
    RequestQueryValidationSingle(#[from] validator::ValidationError),

    /// Error validating the query string (multiple errors)
    #[error("request query is not valid")]
    RequestQueryValidation(#[from] validator::ValidationErrors),

    /// Error while listing objects in blob storage
    #[error("error listing objects in blob storage")]
    BlobListObjects(#[from] SdkError<ListObjectsV2Error>),

    /// Error while retrieving an object from blob storage
    #[error("error retrieving object from blob storage")]
    BlobGetObject(#[from] SdkError<GetObjectError>),

    /// Error reading object data from blob storage
    #[error("error receiving object from blob storage")]
    BlobByteStream(#[from] ByteStreamError),
}

impl IntoResponse for ForecastError {
    /// Convert from a `ForecastError` into an [axum::response::Response].
    fn into_response(self) -> Response {
        ErrorResponse::from(self).into_response()
    }
}

/// Log an error and each of its causes at ERROR level.
pub fn log_error_chain(context: &str, error: &ForecastError) {
    event!(Level::ERROR, "{}: {}", context, error);
    let mut current = error.source();
    while let Some(source) = current {
        event!(Level::ERROR, "Caused by: {}", source);
        current = source.source();
    }
}

/// Body of error response
///
/// Implements serde (de)serialise.
#[derive(Deserialize, Serialize)]
struct ErrorBody {
    /// Main error message
    message: String,

    /// Optional list of causes
    #[serde(skip_serializing_if = "Option::is_none")]
    caused_by: Option<Vec<String>>,
}

impl ErrorBody {
    /// Return a new ErrorBody
    ///
    /// # Arguments
    ///
    /// * `error`: The error that occurred
    fn new<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        let message = error.to_string();
        let mut caused_by = None;
        let mut current = error.source();
        while let Some(source) = current {
            let mut causes: Vec<String> = caused_by.unwrap_or_default();
            causes.push(source.to_string());
            caused_by = Some(causes);
            current = source.source();
        }
        // Remove duplicate entries.
        if let Some(caused_by) = caused_by.as_mut() {
            caused_by.dedup()
        }
        ErrorBody { message, caused_by }
    }
}

/// A response to send in error cases
///
/// Implements serde (de)serialise.
#[derive(Deserialize, Serialize)]
struct ErrorResponse {
    /// HTTP status of the response
    #[serde(skip)]
    status: StatusCode,

    /// Response body
    error: ErrorBody,
}

impl ErrorResponse {
    /// Return a new ErrorResponse
    ///
    /// # Arguments
    ///
    /// * `status`: HTTP status of the response
    /// * `error`: The error that occurred. This will be formatted into a suitable `ErrorBody`
    fn new<E>(status: StatusCode, error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        ErrorResponse {
            status,
            error: ErrorBody::new(error),
        }
    }

    /// Return a 400 bad request ErrorResponse
    fn bad_request<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    /// Return a 401 unauthorised ErrorResponse
    fn unauthorised<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::UNAUTHORIZED, error)
    }

    /// Return a 404 not found ErrorResponse
    fn not_found<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    /// Return a 500 internal server error ErrorResponse
    fn internal_server_error<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    /// Return a 502 bad gateway ErrorResponse
    fn bad_gateway<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::BAD_GATEWAY, error)
    }

    /// Pick a response for an S3 error code that has no dedicated variant.
    fn from_blob_code<E>(code: Option<&str>, error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        match code {
            // Not found
            Some("NoSuchKey") | Some("NoSuchBucket") => Self::not_found(error),

            // Unauthorised
            Some("InvalidAccessKeyId") | Some("SignatureDoesNotMatch") | Some("AccessDenied") => {
                Self::unauthorised(error)
            }

            // Internal server error
            _ => Self::internal_server_error(error),
        }
    }
}

impl From<ForecastError> for ErrorResponse {
    /// Convert from a `ForecastError` into an `ErrorResponse`.
    fn from(error: ForecastError) -> Self {
        let response = match &error {
            // Bad request
            ForecastError::RequestQueryRejection(_)
            | ForecastError::RequestQueryValidationSingle(_)
            | ForecastError::RequestQueryValidation(_) => Self::bad_request(&error),

            // Unauthorised or bad gateway, depending on what the store said
            ForecastError::StoreStatus { status, .. } => match status {
                401 | 403 => Self::unauthorised(&error),
                _ => Self::bad_gateway(&error),
            },

            // Bad gateway
            ForecastError::StoreRequest(_) => Self::bad_gateway(&error),

            // Internal server error
            ForecastError::MissingConfiguration { name: _ }
            | ForecastError::InvalidUrl(_)
            | ForecastError::RowDecode(_)
            | ForecastError::InvalidTimestamp { value: _ }
            | ForecastError::TimestampFormat(_)
            | ForecastError::BlobByteStream(_) => Self::internal_server_error(&error),

            ForecastError::BlobListObjects(sdk_error) => match sdk_error {
                SdkError::ServiceError(list_error) => {
                    Self::from_blob_code(list_error.err().code(), &error)
                }
                _ => Self::internal_server_error(&error),
            },

            ForecastError::BlobGetObject(sdk_error) => match sdk_error {
                SdkError::ServiceError(get_obj_error) => match get_obj_error.err() {
                    GetObjectError::NoSuchKey(_) => Self::not_found(&error),
                    get_obj_error => Self::from_blob_code(get_obj_error.code(), &error),
                },
                _ => Self::internal_server_error(&error),
            },
        };

        // Log server errors.
        if response.status.is_server_error() {
            log_error_chain("request failed", &error);
        }

        response
    }
}

impl IntoResponse for ErrorResponse {
    /// Convert from an `ErrorResponse` into an `axum::response::Response`.
    ///
    /// Renders the response as JSON.
    fn into_response(self) -> Response {
        let json_body = serde_json::to_string_pretty(&self);
        match json_body {
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialise error response: {}", err),
            )
                .into_response(),
            Ok(json_body) => (
                self.status,
                [(&header::CONTENT_TYPE, mime::APPLICATION_JSON.to_string())],
                json_body,
            )
                .into_response(),
        }
    }
}
