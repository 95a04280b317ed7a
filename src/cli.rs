//! Command Line Interface (CLI) arguments.

use clap::Parser;
use url::Url;

/// Feederwatch command line interface
#[derive(Clone, Debug, Parser)]
pub struct CommandLineArgs {
    /// The IP address on which the server should listen
    #[arg(long, default_value = "0.0.0.0", env = "FEEDERWATCH_HOST")]
    pub host: String,
    /// The port to which the server should bind
    #[arg(long, default_value_t = 8000, env = "FEEDERWATCH_PORT")]
    pub port: u16,
    /// Flag indicating whether HTTPS should be used
    #[arg(long, default_value_t = false, env = "FEEDERWATCH_HTTPS")]
    pub https: bool,
    /// Path to the certificate file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/feederwatch/certs/cert.pem",
        env = "FEEDERWATCH_CERT_FILE"
    )]
    pub cert_file: String,
    /// Path to the key file to be used for HTTPS encryption
    #[arg(
        long,
        default_value = "~/.config/feederwatch/certs/key.pem",
        env = "FEEDERWATCH_KEY_FILE"
    )]
    pub key_file: String,
    /// Maximum time in seconds to wait for operations to complete upon receiving `ctrl+c` signal.
    #[arg(long, default_value_t = 60, env = "FEEDERWATCH_SHUTDOWN_TIMEOUT")]
    pub graceful_shutdown_timeout: u64,
    /// Whether to enable sending traces to Jaeger.
    #[arg(long, default_value_t = false, env = "FEEDERWATCH_ENABLE_JAEGER")]
    pub enable_jaeger: bool,
    /// URL of the hosted store
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Url,
    /// Service credential for the hosted store
    #[arg(long, env = "SUPABASE_SECRET_KEY", hide_env_values = true)]
    pub supabase_secret_key: String,
    /// Timeout in seconds for each request to the store
    #[arg(long, default_value_t = 30, env = "FEEDERWATCH_STORE_TIMEOUT")]
    pub store_timeout: u64,
    /// Tag used for forecast lookups that do not name one
    #[arg(long, default_value = "exp_HP", env = "FEEDERWATCH_DEFAULT_TAG")]
    pub default_tag: String,
    /// Access key for the store's S3-compatible object storage
    #[arg(long, env = "SUPABASE_S3_ACCESS_KEY")]
    pub storage_access_key: Option<String>,
    /// Secret key for the store's S3-compatible object storage
    #[arg(long, env = "SUPABASE_S3_SECRET_KEY", hide_env_values = true)]
    pub storage_secret_key: Option<String>,
    /// Region of the store's S3-compatible object storage
    #[arg(long, default_value = "us-east-1", env = "SUPABASE_S3_REGION")]
    pub storage_region: String,
}

/// Returns parsed command line arguments.
pub fn parse() -> CommandLineArgs {
    CommandLineArgs::parse()
}
