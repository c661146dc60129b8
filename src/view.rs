//! Catalog page: category filter state and card rendering

use serde::Serialize;
use tracing::debug;

use crate::error::LoadFailure;
use crate::navigation::{watch_address, Intent, Navigation};
use crate::video::{Catalog, Video};

/// Category value that disables filtering
pub const ALL_CATEGORIES: &str = "all";

pub const NO_RESULTS_MESSAGE: &str = "No videos found in this category.";
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load videos. Please try again later.";

/// One clickable catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub thumbnail: String,
    pub duration: String,
    /// Address card activation navigates to
    pub href: String,
}

/// A category filter control and whether it is the active one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryControl {
    pub category: String,
    pub active: bool,
}

/// What the card grid shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CatalogRender {
    Cards { cards: Vec<VideoCard> },
    NoResults { message: String },
    Error { message: String },
}

/// Catalog page controller
#[derive(Debug, Clone)]
pub struct CatalogView {
    all_videos: Result<Catalog, String>,
    current_category: String,
    visible: Vec<usize>,
    player_page: String,
}

impl CatalogView {
    /// View over a loaded catalog, unfiltered
    pub fn new(catalog: Catalog, player_page: impl Into<String>) -> Self {
        let visible = (0..catalog.len()).collect();
        Self {
            all_videos: Ok(catalog),
            current_category: ALL_CATEGORIES.to_string(),
            visible,
            player_page: player_page.into(),
        }
    }

    /// View for a page whose catalog failed to load
    pub fn failed(failure: &LoadFailure, player_page: impl Into<String>) -> Self {
        debug!("Catalog view in error state: {}", failure);
        Self {
            all_videos: Err(LOAD_ERROR_MESSAGE.to_string()),
            current_category: ALL_CATEGORIES.to_string(),
            visible: Vec::new(),
            player_page: player_page.into(),
        }
    }

    /// Build from a loader outcome
    pub fn from_load(result: Result<Catalog, LoadFailure>, player_page: impl Into<String>) -> Self {
        match result {
            Ok(catalog) => Self::new(catalog, player_page),
            Err(failure) => Self::failed(&failure, player_page),
        }
    }

    pub fn current_category(&self) -> &str {
        &self.current_category
    }

    pub fn is_failed(&self) -> bool {
        self.all_videos.is_err()
    }

    /// Select a category; `"all"` clears the filter. Matching is exact.
    pub fn set_category(&mut self, category: &str) {
        self.current_category = category.to_string();
        self.visible = match &self.all_videos {
            Ok(catalog) => catalog
                .videos()
                .iter()
                .enumerate()
                .filter(|(_, v)| category == ALL_CATEGORIES || v.category == category)
                .map(|(i, _)| i)
                .collect(),
            Err(_) => Vec::new(),
        };
        debug!("Category {} shows {} videos", category, self.visible.len());
    }

    pub fn visible_videos(&self) -> Vec<&Video> {
        match &self.all_videos {
            Ok(catalog) => self.visible.iter().filter_map(|&i| catalog.get(i)).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Filter controls: `all` first, then categories in catalog order.
    /// Exactly one is active.
    pub fn category_controls(&self) -> Vec<CategoryControl> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        if let Ok(catalog) = &self.all_videos {
            categories.extend(
                catalog
                    .categories()
                    .into_iter()
                    .filter(|c| c != ALL_CATEGORIES),
            );
        }
        if !categories.contains(&self.current_category) {
            categories.push(self.current_category.clone());
        }

        categories
            .into_iter()
            .map(|category| CategoryControl {
                active: category == self.current_category,
                category,
            })
            .collect()
    }

    pub fn render(&self) -> CatalogRender {
        if let Err(message) = &self.all_videos {
            return CatalogRender::Error {
                message: message.clone(),
            };
        }

        let cards: Vec<VideoCard> = self
            .visible_videos()
            .into_iter()
            .map(|video| self.card(video))
            .collect();

        if cards.is_empty() {
            CatalogRender::NoResults {
                message: NO_RESULTS_MESSAGE.to_string(),
            }
        } else {
            CatalogRender::Cards { cards }
        }
    }

    fn card(&self, video: &Video) -> VideoCard {
        VideoCard {
            id: video.id.clone(),
            title: video.title.clone(),
            description: video.description.clone(),
            category: video.category.clone(),
            thumbnail: video.thumbnail.clone(),
            duration: video.duration.clone(),
            href: watch_address(&self.player_page, &video.id),
        }
    }

    /// Apply a user intent. Intents meant for the player page are ignored.
    pub fn handle(&mut self, intent: Intent) -> Option<Navigation> {
        match intent {
            Intent::SelectCategory(category) => {
                self.set_category(&category);
                None
            }
            Intent::SelectVideo(id) => {
                Some(Navigation::Load(watch_address(&self.player_page, &id)))
            }
            Intent::Retry => Some(Navigation::Reload),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::fixtures::{three_videos, video};

    fn ids(view: &CatalogView) -> Vec<String> {
        view.visible_videos().iter().map(|v| v.id.clone()).collect()
    }

    #[test]
    fn test_filter_keeps_catalog_order() {
        let mut view = CatalogView::new(three_videos(), "watch.html");
        view.set_category("a");
        assert_eq!(ids(&view), vec!["1", "3"]);
    }

    #[test]
    fn test_all_shows_everything_unmodified() {
        let mut view = CatalogView::new(three_videos(), "watch.html");
        view.set_category("b");
        view.set_category(ALL_CATEGORIES);
        assert_eq!(ids(&view), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_filter_is_exact_and_bounded() {
        let catalog = three_videos();
        let mut view = CatalogView::new(catalog.clone(), "watch.html");

        for category in ["a", "b", "A", "", "all", "missing"] {
            view.set_category(category);
            let visible = view.visible_videos();
            assert!(visible.len() <= catalog.len());
            if category != ALL_CATEGORIES {
                assert!(visible.iter().all(|v| v.category == category));
            }
        }

        view.set_category("A");
        assert!(ids(&view).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let mut view = CatalogView::new(three_videos(), "watch.html");
        view.set_category("a");
        let once = ids(&view);
        view.set_category("a");
        assert_eq!(ids(&view), once);
    }

    #[test]
    fn test_exactly_one_control_active() {
        let mut view = CatalogView::new(three_videos(), "watch.html");
        view.handle(Intent::SelectCategory("b".to_string()));

        let controls = view.category_controls();
        let active: Vec<&str> = controls
            .iter()
            .filter(|c| c.active)
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(active, vec!["b"]);
        assert_eq!(controls.len(), 3);
    }

    #[test]
    fn test_render_cards_link_to_player() {
        let view = CatalogView::new(three_videos(), "watch.html");
        match view.render() {
            CatalogRender::Cards { cards } => {
                assert_eq!(cards.len(), 3);
                assert_eq!(cards[1].href, "watch.html?id=2");
            }
            other => panic!("unexpected render: {:?}", other),
        }
    }

    #[test]
    fn test_render_is_idempotent() {
        let view = CatalogView::new(three_videos(), "watch.html");
        assert_eq!(view.render(), view.render());
    }

    #[test]
    fn test_empty_filter_renders_no_results() {
        let mut view = CatalogView::new(Catalog::new(vec![video("1", "a")]), "watch.html");
        view.set_category("b");
        assert_eq!(
            view.render(),
            CatalogRender::NoResults {
                message: NO_RESULTS_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_load_failure_renders_error_not_empty() {
        let failure = LoadFailure::Status {
            source_name: "videos.json".to_string(),
            status: 500,
        };
        let view = CatalogView::from_load(Err(failure), "watch.html");
        assert!(view.is_failed());
        assert_eq!(
            view.render(),
            CatalogRender::Error {
                message: LOAD_ERROR_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_intents_map_to_navigation() {
        let mut view = CatalogView::new(three_videos(), "watch.html");
        assert_eq!(
            view.handle(Intent::SelectVideo("3".to_string())),
            Some(Navigation::Load("watch.html?id=3".to_string()))
        );
        assert_eq!(view.handle(Intent::Retry), Some(Navigation::Reload));
        assert_eq!(view.handle(Intent::NavigateNext), None);
    }
}
