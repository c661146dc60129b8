//! Page and data handlers, independent of the HTTP framework

use serde_json::Value;

use crate::config::Config;
use crate::error::LoadFailure;
use crate::loader::CatalogLoader;
use crate::pages;
use crate::video::CatalogDocument;

/// Handle health check requests
pub fn health_check() -> Value {
    serde_json::json!({
        "status": "healthy",
        "service": "teamup-video",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    })
}

/// The catalog document as loaded from the configured source
pub async fn catalog_document(config: &Config) -> Result<Value, LoadFailure> {
    let catalog = CatalogLoader::from_config(config).load().await?;
    let document = CatalogDocument {
        videos: catalog.videos().to_vec(),
    };
    serde_json::to_value(document).map_err(|e| LoadFailure::Decode {
        source_name: config.catalog.source.clone(),
        message: e.to_string(),
    })
}

pub async fn home(config: &Config) -> String {
    pages::home_page(config).await
}

pub async fn library(config: &Config, query: &str) -> String {
    pages::library_page(config, &CatalogLoader::from_config(config), query).await
}

pub async fn watch(config: &Config, query: &str) -> String {
    pages::watch_page(config, &CatalogLoader::from_config(config), query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;

    #[test]
    fn test_health_check() {
        let health = health_check();
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["service"], "teamup-video");
    }

    #[tokio::test]
    async fn test_catalog_document_passthrough() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("videos.json");
        tokio::fs::write(
            &path,
            r#"{"videos":[{"id":"5","title":"T","description":"D","category":"c","thumbnail":"t","duration":"0:30"}]}"#,
        )
        .await
        .unwrap();
        let config = ConfigBuilder::new().with_source(path.to_str().unwrap()).build();

        let document = catalog_document(&config).await.unwrap();
        assert_eq!(document["videos"][0]["id"], "5");
    }

    #[tokio::test]
    async fn test_catalog_document_failure() {
        let config = ConfigBuilder::new().with_source("/nonexistent/videos.json").build();
        assert!(catalog_document(&config).await.is_err());
    }
}
