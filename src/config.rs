//! Server configuration.

use clap::Parser;
use std::path::PathBuf;

/// Default HTTP port for the library service.
pub const DEFAULT_PORT: u16 = 8080;

/// Default number of characters per content page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Default bucket name used when building content locations.
pub const DEFAULT_BUCKET: &str = "diglib";

/// Default upper bound for uploaded book content (32 MiB).
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 32 * 1024 * 1024;

/// Command-line arguments for the server.
#[derive(Parser, Debug, Clone)]
#[command(name = "diglib-server")]
#[command(about = "Digital library REST service")]
#[command(version)]
pub struct Args {
    /// Host address to bind to.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port for the HTTP service.
    #[arg(long, short = 'p', default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory for book content. Content is kept in memory when unset.
    #[arg(long, short = 'l')]
    pub location: Option<PathBuf>,

    /// Bucket name reported in content locations.
    #[arg(long, default_value = DEFAULT_BUCKET)]
    pub bucket: String,

    /// Default page size in characters when a request does not give one.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// JSON file containing the list of genres.
    #[arg(long)]
    pub genres_file: Option<PathBuf>,

    /// Maximum accepted upload size in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_SIZE)]
    pub max_upload_size: usize,

    /// Enable debug logging.
    #[arg(long, short = 'd')]
    pub debug: bool,

    /// Enable silent mode (minimal logging).
    #[arg(long, short = 's')]
    pub silent: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            location: None,
            bucket: DEFAULT_BUCKET.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            genres_file: None,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            debug: false,
            silent: false,
        }
    }
}

/// Server configuration derived from command-line arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host address to bind to.
    pub host: String,
    /// Port for the HTTP service.
    pub port: u16,
    /// Directory for book content (None = in-memory).
    pub location: Option<PathBuf>,
    /// Bucket name reported in content locations.
    pub bucket: String,
    /// Default page size in characters.
    pub default_page_size: usize,
    /// Genre list override.
    pub genres_file: Option<PathBuf>,
    /// Maximum accepted upload size in bytes.
    pub max_upload_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            location: None,
            bucket: DEFAULT_BUCKET.to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            genres_file: None,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            location: args.location,
            bucket: args.bucket,
            // A zero default would make every unsized request invalid
            default_page_size: args.page_size.max(1),
            genres_file: args.genres_file,
            max_upload_size: args.max_upload_size,
        }
    }
}

impl Config {
    /// Returns the bind address for the HTTP service.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
