//! A [TableStore] backed by the hosted store's PostgREST HTTP interface.
//!
//! Each request names its schema with the `Accept-Profile` header, so the client itself carries
//! no schema state and may be shared freely between concurrent requests.

use crate::error::ForecastError;
use crate::store::{Row, SelectQuery, TableStore};

use async_trait::async_trait;
use reqwest::header::{HeaderName, ACCEPT};
use std::time::Duration;
use url::Url;

static HEADER_APIKEY: HeaderName = HeaderName::from_static("apikey");
static HEADER_ACCEPT_PROFILE: HeaderName = HeaderName::from_static("accept-profile");

/// PostgREST store client.
#[derive(Clone, Debug)]
pub struct RestStore {
    /// Underlying HTTP client. Cloning shares its connection pool.
    client: reqwest::Client,
    /// `<store URL>/rest/v1/`
    base_url: Url,
    /// Service credential
    key: String,
}

impl RestStore {
    /// Create a store client.
    ///
    /// # Arguments
    ///
    /// * `url`: Store endpoint URL, e.g. `https://<project>.supabase.co`
    /// * `key`: Service credential
    /// * `timeout`: Upper bound on the duration of each request
    pub fn new(url: &Url, key: &str, timeout: Duration) -> Result<Self, ForecastError> {
        if key.trim().is_empty() {
            return Err(ForecastError::MissingConfiguration {
                name: "SUPABASE_SECRET_KEY",
            });
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: rest_endpoint(url)?,
            key: key.to_string(),
        })
    }

    /// Return the URL for a query.
    pub fn request_url(&self, query: &SelectQuery) -> Result<Url, ForecastError> {
        let mut url = self.base_url.join(&query.table)?;
        {
            let mut pairs = url.query_pairs_mut();
            let columns = query
                .columns
                .as_ref()
                .map_or_else(|| "*".to_string(), |columns| columns.join(","));
            pairs.append_pair("select", &columns);
            for filter in &query.filters {
                pairs.append_pair(&filter.column, &format!("{}.{}", filter.op, filter.value));
            }
            if let Some((column, direction)) = &query.order {
                pairs.append_pair("order", &format!("{}.{}", column, direction));
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl TableStore for RestStore {
    #[tracing::instrument(
        level = "DEBUG",
        skip(self, query),
        fields(namespace = %query.namespace, table = %query.table)
    )]
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>, ForecastError> {
        let url = self.request_url(query)?;
        let response = self
            .client
            .get(url)
            .header(&HEADER_APIKEY, &self.key)
            .bearer_auth(&self.key)
            .header(&HEADER_ACCEPT_PROFILE, query.namespace.to_string())
            .header(ACCEPT, mime::APPLICATION_JSON.as_ref())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ForecastError::StoreStatus {
                status: status.as_u16(),
                message: error_message(&body, status),
            });
        }
        let body = response.bytes().await?;
        let rows: Vec<Row> = serde_json::from_slice(&body)?;
        tracing::debug!("store returned {} rows", rows.len());
        Ok(rows)
    }
}

/// Return the PostgREST endpoint below a store URL.
fn rest_endpoint(url: &Url) -> Result<Url, ForecastError> {
    let mut base = url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join("rest/v1/")?)
}

/// Extract a readable message from a PostgREST error body.
///
/// PostgREST errors are JSON objects with a `message` field. Anything else is returned as is,
/// falling back to the status' reason phrase for an empty body.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string));
    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    }
}
