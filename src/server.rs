//! HTTP server for the digital library.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::LibraryResult;
use crate::router::{create_router, AppState};
use crate::service::ContentService;
use crate::storage::{BlobStore, BookRepository, FsBlobStore, MemoryBlobStore, MemoryBookRepository};

/// Digital library server.
pub struct LibraryServer {
    config: Arc<Config>,
    books: Arc<dyn BookRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl LibraryServer {
    /// Creates a server whose content store follows the configuration:
    /// files below `location` when set, memory otherwise.
    pub async fn from_config(config: Config) -> LibraryResult<Self> {
        let blobs: Arc<dyn BlobStore> = match &config.location {
            Some(location) => Arc::new(FsBlobStore::new(location.clone()).await?),
            None => Arc::new(MemoryBlobStore::new()),
        };

        Ok(Self::with_storage(
            config,
            Arc::new(MemoryBookRepository::new()),
            blobs,
        ))
    }

    /// Creates a new server with custom storage.
    pub fn with_storage(
        config: Config,
        books: Arc<dyn BookRepository>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            books,
            blobs,
        }
    }

    /// Builds the application router with middleware.
    pub fn router(&self) -> axum::Router {
        let state = AppState {
            config: self.config.clone(),
            books: self.books.clone(),
            content: ContentService::new(
                self.blobs.clone(),
                self.config.bucket.clone(),
                self.config.default_page_size,
            ),
        };

        create_router(state)
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any)
                    .expose_headers(Any),
            )
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the configured address.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr: SocketAddr = self.config.bind_address().parse()?;
        let listener = TcpListener::bind(addr).await?;
        self.run_on(listener).await
    }

    /// Runs the server on an already bound listener.
    pub async fn run_on(
        self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let app = self.router();

        info!(
            "Digital library service is starting at http://{}",
            listener.local_addr()?
        );
        info!(
            "Content store: {}://{} (default page size {} characters)",
            self.blobs.scheme(),
            self.config.bucket,
            self.config.default_page_size
        );

        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Returns the bind address.
    pub fn bind_address(&self) -> String {
        self.config.bind_address()
    }

    /// Returns the base URL for the service.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.bind_address())
    }
}
