use crate::blob_store::BlobStore;
use crate::cli::CommandLineArgs;
use crate::error::ForecastError;
use crate::postgrest::RestStore;
use crate::repository::{ApiDefaults, ForecastRepository, RepositorySettings};

use std::sync::Arc;
use std::time::Duration;

/// Shared application state passed to each request handler.
///
/// Read-only once built.
pub struct AppState {
    /// Forecast repository.
    pub repository: ForecastRepository,

    /// Object storage, when storage keys are configured.
    pub blob_store: Option<BlobStore>,
}

impl AppState {
    /// Create and return an [AppState] reading from the store named on the command line.
    pub fn new(args: &CommandLineArgs) -> Result<Self, ForecastError> {
        let store = RestStore::new(
            &args.supabase_url,
            &args.supabase_secret_key,
            Duration::from_secs(args.store_timeout),
        )?;
        let settings = RepositorySettings {
            default_tag: args.default_tag.clone(),
            api: ApiDefaults::default(),
        };
        Ok(Self {
            repository: ForecastRepository::new(Arc::new(store), settings),
            blob_store: BlobStore::from_args(args),
        })
    }

    /// Create and return an [AppState] around an existing repository, without object storage.
    pub fn from_repository(repository: ForecastRepository) -> Self {
        Self {
            repository,
            blob_store: None,
        }
    }
}

/// AppState wrapped in an Atomic Reference Count (Arc) to allow multiple references.
pub type SharedAppState = Arc<AppState>;
