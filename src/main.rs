//! diglib-server: REST backend for the digital library.
//!
//! Serves book metadata and paginated book text over HTTP.

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use diglib::{Args, Config, LibraryServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug {
        Level::DEBUG
    } else if args.silent {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Create configuration from arguments
    let config = Config::from(args);
    let storage = match &config.location {
        Some(location) => location.display().to_string(),
        None => "in memory".to_string(),
    };

    // Create and run the server
    let server = LibraryServer::from_config(config).await?;

    println!(
        r#"
Digital library service is starting at {}

Book content: {}

Endpoints:
  GET    {base}/books
  GET    {base}/books/{{id}}
  GET    {base}/books/{{id}}/content?page=&pageSize=
  POST   {base}/books
  DELETE {base}/books/{{id}}
  GET    {base}/genres

Press Ctrl+C to stop the server.
"#,
        server.bind_address(),
        storage,
        base = server.base_url()
    );

    server.run().await
}
