//! Embed reference construction and player mounting
//!
//! The reference is a pure function of the video id, the configured default
//! parameters and the per-call overrides. Mounting shows a loading indicator
//! first and swaps in the frame after a [`Delay`].

use async_trait::async_trait;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::player::PlayerSurface;

pub const VIMEO_PLAYER_BASE: &str = "https://player.vimeo.com/video/";
pub const DEFAULT_ACCENT_COLOR: &str = "075f74";
pub const DEFAULT_MOUNT_DELAY_MS: u64 = 500;

/// Ordered query parameters for the embed widget
///
/// Keys are unique; [`EmbedParams::merged`] keeps the order of `self` and
/// appends keys that only exist in the overrides. Serialized as a table in
/// key order; a repeated key on input replaces the earlier value in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedParams(Vec<(String, String)>);

impl EmbedParams {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or replace a key, keeping its original position on replace
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Shallow merge, `{ ...self, ...overrides }`
    pub fn merged(&self, overrides: &EmbedParams) -> EmbedParams {
        let mut merged = self.clone();
        for (key, value) in overrides.iter() {
            merged.set(key, value);
        }
        merged
    }

    /// `application/x-www-form-urlencoded` serialization
    pub fn to_query(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.iter() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

impl Default for EmbedParams {
    /// Autoplay off, accent color, no title/byline/portrait chrome, responsive
    fn default() -> Self {
        Self::new()
            .with("autoplay", 0)
            .with("color", DEFAULT_ACCENT_COLOR)
            .with("title", 0)
            .with("byline", 0)
            .with("portrait", 0)
            .with("responsive", 1)
    }
}

impl Serialize for EmbedParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Scalar table values, so `autoplay = 0` and `color = "075f74"` both parse
#[derive(Deserialize)]
#[serde(untagged)]
enum ParamValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(text) => f.write_str(text),
            ParamValue::Integer(n) => write!(f, "{}", n),
            ParamValue::Boolean(b) => write!(f, "{}", u8::from(*b)),
        }
    }
}

struct ParamsVisitor;

impl<'de> Visitor<'de> for ParamsVisitor {
    type Value = EmbedParams;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a table of embed query parameters")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut params = EmbedParams::new();
        while let Some((key, value)) = access.next_entry::<String, ParamValue>()? {
            params.set(key, value);
        }
        Ok(params)
    }
}

impl<'de> Deserialize<'de> for EmbedParams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ParamsVisitor)
    }
}

/// Builds embed references from an immutable default parameter set
#[derive(Debug, Clone)]
pub struct EmbedRenderer {
    base_url: String,
    defaults: EmbedParams,
}

impl EmbedRenderer {
    pub fn new(base_url: impl Into<String>, defaults: EmbedParams) -> Self {
        Self {
            base_url: base_url.into(),
            defaults,
        }
    }

    pub fn defaults(&self) -> &EmbedParams {
        &self.defaults
    }

    /// Embed reference for `video_id` with `overrides` applied over the defaults
    pub fn render(&self, video_id: &str, overrides: &EmbedParams) -> String {
        let params = self.defaults.merged(overrides);
        format!(
            "{}{}?{}",
            self.base_url,
            urlencoding::encode(video_id),
            params.to_query()
        )
    }

    /// Frame description for a video using the default parameters
    pub fn frame(&self, video_id: &str) -> EmbedFrame {
        EmbedFrame::new(self.render(video_id, &EmbedParams::new()))
    }
}

impl Default for EmbedRenderer {
    fn default() -> Self {
        Self::new(VIMEO_PLAYER_BASE, EmbedParams::default())
    }
}

/// The iframe that replaces the loading indicator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedFrame {
    pub src: String,
    pub width: String,
    pub height: String,
    pub allow: String,
    pub allow_fullscreen: bool,
}

impl EmbedFrame {
    pub fn new(src: String) -> Self {
        Self {
            src,
            width: "100%".to_string(),
            height: "100%".to_string(),
            allow: "autoplay; fullscreen; picture-in-picture".to_string(),
            allow_fullscreen: true,
        }
    }
}

/// Pause between showing the loading indicator and mounting the frame
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self);
}

/// Real elapsed-time delay backed by the tokio timer
#[derive(Debug, Clone)]
pub struct TimerDelay {
    duration: Duration,
}

impl TimerDelay {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }
}

impl Default for TimerDelay {
    fn default() -> Self {
        Self::from_millis(DEFAULT_MOUNT_DELAY_MS)
    }
}

#[async_trait]
impl Delay for TimerDelay {
    async fn wait(&self) {
        tokio::time::sleep(self.duration).await;
    }
}

/// Returns immediately; used for server-side rendering and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Delay for NoDelay {
    async fn wait(&self) {}
}

/// Show the loading indicator, wait, then mount the frame
pub async fn mount<S>(surface: &mut S, delay: &dyn Delay, frame: EmbedFrame)
where
    S: PlayerSurface + ?Sized,
{
    surface.show_loading();
    delay.wait().await;
    debug!("Mounting embed frame {}", frame.src);
    surface.show_embed(frame);
}
