use tokio::net::TcpListener;

use archived_store::Archive;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// Archive server.
pub struct ArchiveServer {
    config: ServerConfig,
    archive: Archive,
}

impl ArchiveServer {
    /// Fails if the configured root is not a `.container` directory.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let archive = Archive::open(&config.archive_root)?;
        Ok(Self { config, archive })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.archive.clone(), self.config.max_body_size)
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            root = %self.archive.root().display(),
            "archive server listening on {}",
            self.config.bind_addr
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
