//! HTTP surface for the library and watch pages
//!
//! Every request is a fresh page load: it builds its own loader and fetches
//! the catalog again.

use anyhow::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Config;

pub mod handlers;
pub mod server;

/// HTTP server serving the rendered pages
#[derive(Debug)]
pub struct ApiServer {
    config: Arc<Config>,
    port: u16,
}

impl ApiServer {
    pub fn new(config: Arc<Config>) -> Self {
        let port = config.server.port;
        Self { config, port }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Start the server in the background
    pub fn start_background(self) -> JoinHandle<Result<()>> {
        tokio::spawn(async move { self.start().await })
    }

    /// Run the server until it fails
    pub async fn start(self) -> Result<()> {
        info!("🚀 Starting page server on port {}", self.port);
        server::start_http_server(self.config, self.port).await
    }
}
