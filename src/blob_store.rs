//! Client for the hosted store's S3-compatible object storage.

use crate::cli::CommandLineArgs;
use crate::error::ForecastError;

use aws_credential_types::Credentials;
use aws_sdk_s3::config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_types::region::Region;
use bytes::Bytes;
use tracing::Instrument;
use url::Url;

/// Returns the S3 endpoint of a hosted store.
pub fn storage_endpoint(url: &Url) -> Url {
    let mut endpoint = url.clone();
    endpoint.set_query(None);
    let path = format!("{}/storage/v1/s3", url.path().trim_end_matches('/'));
    endpoint.set_path(&path);
    endpoint
}

/// Blob store client object.
#[derive(Clone, Debug)]
pub struct BlobStore {
    /// Underlying AWS SDK S3 client object.
    client: Client,
}

impl BlobStore {
    /// Creates a BlobStore object
    ///
    /// # Arguments
    ///
    /// * `endpoint`: Object storage API URL
    /// * `region`: Object storage region
    /// * `access_key`: Object storage access key
    /// * `secret_key`: Object storage secret key
    pub fn new(endpoint: &Url, region: &str, access_key: &str, secret_key: &str) -> Self {
        let credentials = Credentials::from_keys(access_key, secret_key, None);
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Some(Region::new(region.to_string())))
            // Path-style requests append the bucket after a single slash.
            .endpoint_url(format!("{}/", endpoint.as_str().trim_end_matches('/')))
            .force_path_style(true)
            .build();
        Self {
            client: Client::from_conf(config),
        }
    }

    /// Creates a BlobStore for the store named on the command line.
    ///
    /// Returns `None` unless both storage keys are set.
    pub fn from_args(args: &CommandLineArgs) -> Option<Self> {
        match (&args.storage_access_key, &args.storage_secret_key) {
            (Some(access_key), Some(secret_key)) => {
                let endpoint = storage_endpoint(&args.supabase_url);
                tracing::info!("Using object storage at {}", endpoint);
                Some(Self::new(
                    &endpoint,
                    &args.storage_region,
                    access_key,
                    secret_key,
                ))
            }
            _ => None,
        }
    }

    /// List the keys of objects in a bucket, following continuation tokens.
    ///
    /// # Arguments
    ///
    /// * `bucket`: Name of the bucket
    /// * `prefix`: Optional key prefix to restrict the listing
    #[tracing::instrument(level = "DEBUG", skip(self))]
    pub async fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<String>, ForecastError> {
        let mut keys = Vec::new();
        let mut continuation_token = None;
        loop {
            let response = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .set_prefix(prefix.map(str::to_string))
                .set_continuation_token(continuation_token)
                .send()
                .instrument(tracing::Span::current())
                .await?;
            keys.extend(
                response
                    .contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );
            match (response.is_truncated(), response.next_continuation_token()) {
                (Some(true), Some(token)) => continuation_token = Some(token.to_string()),
                _ => break,
            }
        }
        Ok(keys)
    }

    /// Downloads an object from object storage and returns the data as Bytes
    ///
    /// # Arguments
    ///
    /// * `bucket`: Name of the bucket
    /// * `key`: Name of the object in the bucket
    #[tracing::instrument(level = "DEBUG", skip(self))]
    pub async fn download_object(&self, bucket: &str, key: &str) -> Result<Bytes, ForecastError> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .instrument(tracing::Span::current())
            .await?;
        let data = response
            .body
            .collect()
            .instrument(tracing::Span::current())
            .await?;
        Ok(data.into_bytes())
    }
}
