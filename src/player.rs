//! Player page controller
//!
//! Resolves the active video from the `id` query parameter, draws it on a
//! [`PlayerSurface`] and moves through the catalog with prev/next. The state
//! machine is Loading → Ready | Error, where Error is terminal until the page
//! is reloaded.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::embed::{self, Delay, EmbedFrame, EmbedRenderer};
use crate::error::{LoadFailure, NotFoundFailure, PlayerFailure};
use crate::navigation::{
    video_id_from_query, watch_address, History, HistoryEntry, Intent, Navigation,
};
use crate::video::{Catalog, Video};

pub const NOT_FOUND_TITLE: &str = "Video Not Found";

/// Enabled state of the prev/next controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavControls {
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

impl NavControls {
    pub const DISABLED: NavControls = NavControls {
        previous_enabled: false,
        next_enabled: false,
    };

    /// Previous is disabled at index 0, next at the last index
    pub fn at(index: usize, len: usize) -> Self {
        Self {
            previous_enabled: index > 0,
            next_enabled: index + 1 < len,
        }
    }
}

/// Where the player page draws
pub trait PlayerSurface: Send {
    fn set_page_title(&mut self, title: &str);
    fn set_title(&mut self, title: &str);
    fn set_description(&mut self, description: &str);
    /// Replace the embed area with the loading indicator
    fn show_loading(&mut self);
    /// Replace the embed area with the player frame
    fn show_embed(&mut self, frame: EmbedFrame);
    /// Replace the embed area with an error block linking back to the catalog
    fn show_error(&mut self, message: &str, return_address: &str);
    fn set_navigation(&mut self, controls: NavControls);
}

/// Display state of the player page
#[derive(Debug)]
pub enum PlayerState {
    Loading,
    /// The current video and its catalog position, always set together
    Ready { video: Video, index: usize },
    Error(PlayerFailure),
}

/// Player page controller, one per page load
pub struct PlayerController<H: History> {
    catalog: Catalog,
    state: PlayerState,
    history: H,
    embed: EmbedRenderer,
    delay: Box<dyn Delay>,
    player_page: String,
    catalog_page: String,
    site_name: String,
}

impl<H: History> PlayerController<H> {
    pub fn new(config: &Config, history: H, delay: Box<dyn Delay>) -> Self {
        Self {
            catalog: Catalog::default(),
            state: PlayerState::Loading,
            history,
            embed: config.embed_renderer(),
            delay,
            player_page: config.catalog.player_page.clone(),
            catalog_page: config.catalog.catalog_page.clone(),
            site_name: config.player.site_name.clone(),
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_video(&self) -> Option<&Video> {
        match &self.state {
            PlayerState::Ready { video, .. } => Some(video),
            _ => None,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        match &self.state {
            PlayerState::Ready { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Both controls are disabled outside the Ready state
    pub fn nav_controls(&self) -> NavControls {
        match self.current_index() {
            Some(index) => NavControls::at(index, self.catalog.len()),
            None => NavControls::DISABLED,
        }
    }

    /// Resolve the page from its query string and the settled catalog fetch
    pub async fn open<S>(
        &mut self,
        surface: &mut S,
        query: &str,
        load: Result<Catalog, LoadFailure>,
    )
    where
        S: PlayerSurface + ?Sized,
    {
        let Some(video_id) = video_id_from_query(query) else {
            self.fail(surface, NotFoundFailure::MissingId.into());
            return;
        };

        self.catalog = match load {
            Ok(catalog) => catalog,
            Err(failure) => {
                self.fail(surface, failure.into());
                return;
            }
        };

        let Some((index, _)) = self.catalog.locate(&video_id) else {
            self.fail(surface, NotFoundFailure::UnknownId(video_id).into());
            return;
        };

        self.show_ready(surface, index).await;
    }

    /// Move to the next catalog entry. Returns false at the last entry.
    pub async fn navigate_next<S>(&mut self, surface: &mut S) -> bool
    where
        S: PlayerSurface + ?Sized,
    {
        match self.current_index() {
            Some(index) if index + 1 < self.catalog.len() => {
                self.navigate_to(surface, index + 1).await;
                true
            }
            _ => false,
        }
    }

    /// Move to the previous catalog entry. Returns false at the first entry.
    pub async fn navigate_previous<S>(&mut self, surface: &mut S) -> bool
    where
        S: PlayerSurface + ?Sized,
    {
        match self.current_index() {
            Some(index) if index > 0 => {
                self.navigate_to(surface, index - 1).await;
                true
            }
            _ => false,
        }
    }

    /// Back/forward landed on another entry. The page reloads and re-derives
    /// its state from the address.
    pub fn on_history_change(&self, entry: &HistoryEntry) -> Option<Navigation> {
        entry.video_id.as_ref().map(|id| {
            debug!("History moved to video {}, reloading", id);
            Navigation::Reload
        })
    }

    /// Apply a user intent from the player page
    pub async fn handle<S>(&mut self, intent: Intent, surface: &mut S) -> Option<Navigation>
    where
        S: PlayerSurface + ?Sized,
    {
        match intent {
            Intent::NavigateNext => {
                self.navigate_next(surface).await;
                None
            }
            Intent::NavigatePrevious => {
                self.navigate_previous(surface).await;
                None
            }
            Intent::ReturnToCatalog => Some(Navigation::Load(self.catalog_page.clone())),
            Intent::Retry => Some(Navigation::Reload),
            Intent::SelectVideo(id) => {
                Some(Navigation::Load(watch_address(&self.player_page, &id)))
            }
            Intent::SelectCategory(_) => None,
        }
    }

    async fn navigate_to<S>(&mut self, surface: &mut S, index: usize)
    where
        S: PlayerSurface + ?Sized,
    {
        let Some(video) = self.catalog.get(index) else {
            return;
        };
        let address = watch_address(&self.player_page, &video.id);
        self.history.push(&video.id, &address);
        self.show_ready(surface, index).await;
    }

    async fn show_ready<S>(&mut self, surface: &mut S, index: usize)
    where
        S: PlayerSurface + ?Sized,
    {
        let Some(video) = self.catalog.get(index).cloned() else {
            return;
        };

        info!("▶️ Playing {} ({}/{})", video.id, index + 1, self.catalog.len());

        surface.set_page_title(&format!("{} - {}", video.title, self.site_name));
        surface.set_title(&video.title);
        surface.set_description(&video.description);

        let frame = self.embed.frame(&video.id);
        self.state = PlayerState::Ready { video, index };
        surface.set_navigation(self.nav_controls());

        embed::mount(surface, self.delay.as_ref(), frame).await;
    }

    fn fail<S>(&mut self, surface: &mut S, failure: PlayerFailure)
    where
        S: PlayerSurface + ?Sized,
    {
        warn!("Player page error: {}", failure);

        let message = failure.message();
        surface.set_title(NOT_FOUND_TITLE);
        surface.set_description(&message);
        surface.show_error(&message, &self.catalog_page);
        surface.set_navigation(NavControls::DISABLED);

        self.state = PlayerState::Error(failure);
    }
}

/// Embed area contents of a [`PlayerPage`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EmbedArea {
    Empty,
    Loading,
    Frame(EmbedFrame),
    Error { message: String, return_address: String },
}

/// Snapshot surface: keeps whatever was drawn last, for HTML rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerPage {
    pub page_title: String,
    pub title: String,
    pub description: String,
    pub embed: EmbedArea,
    pub navigation: NavControls,
}

impl PlayerPage {
    pub fn new(site_name: &str) -> Self {
        Self {
            page_title: site_name.to_string(),
            title: String::new(),
            description: String::new(),
            embed: EmbedArea::Empty,
            navigation: NavControls::DISABLED,
        }
    }
}

impl PlayerSurface for PlayerPage {
    fn set_page_title(&mut self, title: &str) {
        self.page_title = title.to_string();
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    fn show_loading(&mut self) {
        self.embed = EmbedArea::Loading;
    }

    fn show_embed(&mut self, frame: EmbedFrame) {
        self.embed = EmbedArea::Frame(frame);
    }

    fn show_error(&mut self, message: &str, return_address: &str) {
        self.embed = EmbedArea::Error {
            message: message.to_string(),
            return_address: return_address.to_string(),
        };
    }

    fn set_navigation(&mut self, controls: NavControls) {
        self.navigation = controls;
    }
}
