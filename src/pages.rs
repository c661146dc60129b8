//! One function per page load: fetch the catalog, build the controller,
//! render HTML. Nothing is shared between loads.

use tracing::{debug, warn};

use crate::config::Config;
use crate::embed::{self, NoDelay};
use crate::html::{self, PageLinks};
use crate::loader::CatalogLoader;
use crate::navigation::{SessionHistory, ID_PARAM};
use crate::player::{PlayerController, PlayerPage, PlayerSurface};
use crate::video::is_valid_video_id;
use crate::view::{CatalogView, ALL_CATEGORIES};

pub const HOME_LOAD_ERROR: &str = "Failed to load video";

/// `category` query parameter of the library page, `"all"` when absent
pub fn category_from_query(query: &str) -> String {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "category")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_else(|| ALL_CATEGORIES.to_string())
}

/// Render the landing page with the featured video. No catalog fetch.
pub async fn home_page(config: &Config) -> String {
    let video_id = &config.player.default_video_id;
    let mut page = PlayerPage::new(&config.player.site_name);
    page.set_title(&format!("{} Videos", config.player.site_name));

    if is_valid_video_id(video_id) {
        embed::mount(&mut page, &NoDelay, config.embed_renderer().frame(video_id)).await;
    } else {
        warn!("Featured video id {:?} cannot be embedded", video_id);
        page.show_error(HOME_LOAD_ERROR, &config.catalog.home_page);
    }

    html::render_home_page(&page, &PageLinks::from_config(config))
}

/// Render the library page for `query`
pub async fn library_page(config: &Config, loader: &CatalogLoader, query: &str) -> String {
    let mut view = CatalogView::from_load(loader.load().await, config.catalog.player_page.clone());
    view.set_category(&category_from_query(query));

    let retry_address = if query.is_empty() {
        config.catalog.catalog_page.clone()
    } else {
        format!("{}?{}", config.catalog.catalog_page, query.trim_start_matches('?'))
    };

    debug!("Rendering library page, category {}", view.current_category());
    html::render_library_page(&view, &PageLinks::from_config(config), &retry_address)
}

/// Render the watch page for `query`
pub async fn watch_page(config: &Config, loader: &CatalogLoader, query: &str) -> String {
    let address = format!("{}?{}", config.catalog.player_page, query.trim_start_matches('?'));
    let mut player = PlayerController::new(
        config,
        SessionHistory::starting_at(address),
        Box::new(NoDelay),
    );
    let mut page = PlayerPage::new(&config.player.site_name);

    player.open(&mut page, query, loader.load().await).await;

    let neighbours = match player.current_index() {
        Some(index) => (
            index
                .checked_sub(1)
                .and_then(|i| player.catalog().get(i))
                .map(|v| v.id.as_str()),
            player.catalog().get(index + 1).map(|v| v.id.as_str()),
        ),
        None => (None, None),
    };

    debug!(
        "Rendering watch page for {}={:?}",
        ID_PARAM,
        player.current_video().map(|v| &v.id)
    );
    html::render_watch_page(&page, &PageLinks::from_config(config), neighbours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use scraper::{Html, Selector};
    use tempfile::TempDir;

    const DOCUMENT: &str = r#"{"videos":[
        {"id":"1","title":"One","description":"first","category":"a","thumbnail":"1.jpg","duration":"1:00"},
        {"id":"2","title":"Two","description":"second","category":"b","thumbnail":"2.jpg","duration":"2:00"},
        {"id":"3","title":"Three","description":"third","category":"a","thumbnail":"3.jpg","duration":"3:00"}
    ]}"#;

    fn count(html: &str, selector: &str) -> usize {
        let selector = Selector::parse(selector).unwrap();
        Html::parse_document(html).select(&selector).count()
    }

    async fn setup() -> (TempDir, Config, CatalogLoader) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("videos.json");
        tokio::fs::write(&path, DOCUMENT).await.unwrap();
        let config = ConfigBuilder::new().with_source(path.to_str().unwrap()).build();
        let loader = CatalogLoader::from_config(&config);
        (temp_dir, config, loader)
    }

    #[test]
    fn test_category_from_query() {
        assert_eq!(category_from_query(""), "all");
        assert_eq!(category_from_query("?category=a"), "a");
        assert_eq!(category_from_query("category=Team%20Up"), "Team Up");
    }

    #[tokio::test]
    async fn test_library_page_filtered() {
        let (_dir, config, loader) = setup().await;
        let html = library_page(&config, &loader, "category=a").await;
        assert_eq!(count(&html, ".video-card"), 2);
    }

    #[tokio::test]
    async fn test_library_page_failure() {
        let config = ConfigBuilder::new().with_source("/nonexistent/videos.json").build();
        let loader = CatalogLoader::from_config(&config);
        let html = library_page(&config, &loader, "").await;

        assert_eq!(count(&html, ".error-message"), 1);
        assert_eq!(count(&html, ".no-videos"), 0);
        assert_eq!(count(&html, "a.retry-button[href=\"library.html\"]"), 1);
    }

    #[tokio::test]
    async fn test_library_page_error_status() {
        let url = crate::loader::test_support::serve_status_once("500 Internal Server Error").await;
        let config = ConfigBuilder::new().with_source(url).build();
        let loader = CatalogLoader::from_config(&config);
        let html = library_page(&config, &loader, "category=a").await;

        assert_eq!(count(&html, ".error-message"), 1);
        assert_eq!(count(&html, ".no-videos"), 0);
        assert_eq!(count(&html, "a.retry-button[href=\"library.html?category=a\"]"), 1);
    }

    #[tokio::test]
    async fn test_home_page_mounts_featured_video() {
        let config = ConfigBuilder::new().with_default_video("1071247401").build();
        let html = home_page(&config).await;
        let expected = config
            .embed_renderer()
            .render("1071247401", &embed::EmbedParams::new());

        let document = Html::parse_document(&html);
        let iframe = Selector::parse(".video-wrapper iframe").unwrap();
        let src = document.select(&iframe).next().unwrap().value().attr("src");
        assert_eq!(src, Some(expected.as_str()));
        assert_eq!(count(&html, ".retry-button"), 0);
    }

    #[tokio::test]
    async fn test_home_page_unplayable_video_offers_retry() {
        let config = ConfigBuilder::new().with_default_video("").build();
        let html = home_page(&config).await;

        assert_eq!(count(&html, "iframe"), 0);
        assert!(html.contains(HOME_LOAD_ERROR));
        assert_eq!(count(&html, "a.retry-button[href=\"index.html\"]"), 1);
    }

    #[tokio::test]
    async fn test_watch_page_middle_video() {
        let (_dir, config, loader) = setup().await;
        let html = watch_page(&config, &loader, "id=2").await;

        assert_eq!(count(&html, "a#prevButton[href=\"watch.html?id=1\"]"), 1);
        assert_eq!(count(&html, "a#nextButton[href=\"watch.html?id=3\"]"), 1);
        assert!(html.contains("<title>Two - TeamUp</title>"));
    }

    #[tokio::test]
    async fn test_watch_page_without_id() {
        let (_dir, config, loader) = setup().await;
        let html = watch_page(&config, &loader, "").await;

        assert_eq!(count(&html, "iframe"), 0);
        assert!(html.contains("No video ID provided."));
    }
}
