//! Catalog loading from the static data file

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::LoadFailure;
use crate::video::{Catalog, CatalogDocument};

/// Something that can produce the catalog document
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<Catalog, LoadFailure>;

    /// Human-readable location, used in logs and failures
    fn describe(&self) -> String;
}

/// Catalog served over HTTP(S)
pub struct HttpCatalogSource {
    url: String,
    client: reqwest::Client,
}

impl HttpCatalogSource {
    /// No timeout is configured beyond the client's own transport defaults
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<Catalog, LoadFailure> {
        debug!("Fetching catalog from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LoadFailure::Transport {
                source_name: self.url.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(LoadFailure::Status {
                source_name: self.url.clone(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| LoadFailure::Transport {
            source_name: self.url.clone(),
            message: e.to_string(),
        })?;

        parse_document(&self.url, &body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Catalog read from the local filesystem
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn fetch(&self) -> Result<Catalog, LoadFailure> {
        debug!("Reading catalog from {}", self.path.display());

        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| LoadFailure::Transport {
                source_name: self.describe(),
                message: e.to_string(),
            })?;

        parse_document(&self.describe(), &body)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parse `{ "videos": [...] }` without further validation
pub fn parse_document(source_name: &str, body: &str) -> Result<Catalog, LoadFailure> {
    serde_json::from_str::<CatalogDocument>(body)
        .map(Catalog::from)
        .map_err(|e| LoadFailure::Decode {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })
}

/// Fetches the catalog once per page load. Holds no cache.
pub struct CatalogLoader {
    source: Box<dyn CatalogSource>,
}

impl CatalogLoader {
    pub fn new(source: Box<dyn CatalogSource>) -> Self {
        Self { source }
    }

    /// HTTP for `http://` and `https://` locations, a file path otherwise
    pub fn for_location(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::new(Box::new(HttpCatalogSource::new(location)))
        } else {
            Self::new(Box::new(FileCatalogSource::new(location)))
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::for_location(&config.catalog.source)
    }

    pub async fn load(&self) -> Result<Catalog, LoadFailure> {
        match self.source.fetch().await {
            Ok(catalog) => {
                info!("📚 Loaded {} videos from {}", catalog.len(), self.source.describe());
                Ok(catalog)
            }
            Err(e) => {
                warn!("Error loading videos: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer a single request with `status_line` and an empty body.
    /// Returns the catalog URL to fetch.
    pub async fn serve_status_once(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 2048];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                status_line
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        });

        format!("http://{}/videos.json", addr)
    }
}
