//! TeamUp Video - catalog and player front-end
//!
//! Lists videos from a static data file, filters them by category and plays
//! a selected video through the Vimeo embed widget with prev/next navigation.
//! The catalog and player models are independent of the surface they draw on;
//! `html` and the optional `api` server are two such surfaces.

pub mod config;
pub mod embed;
pub mod error;
pub mod html;
pub mod loader;
pub mod navigation;
pub mod pages;
pub mod player;
pub mod video;
pub mod view;

#[cfg(feature = "api")]
pub mod api;

// Re-export main types for easy access
pub use crate::config::Config;
pub use crate::embed::{Delay, EmbedParams, EmbedRenderer, NoDelay, TimerDelay};
pub use crate::error::{LoadFailure, NotFoundFailure, PlayerFailure};
pub use crate::loader::{CatalogLoader, CatalogSource};
pub use crate::navigation::{History, Intent, Navigation, SessionHistory};
pub use crate::player::{NavControls, PlayerController, PlayerPage, PlayerState, PlayerSurface};
pub use crate::video::{Catalog, Video};
pub use crate::view::{CatalogRender, CatalogView};
