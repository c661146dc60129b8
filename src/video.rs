use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static VIMEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:vimeo\.com/|player\.vimeo\.com/video/)(\d+)").expect("valid Vimeo id pattern")
});

/// A single playable entry from the catalog data file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Video {
    /// Opaque identifier, also the embed widget's video id
    pub id: String,

    pub title: String,

    pub description: String,

    /// Category key used by the filter controls (exact match)
    pub category: String,

    /// Thumbnail image URL
    pub thumbnail: String,

    /// Display-formatted duration, "M:SS"
    pub duration: String,
}

/// Shape of the `videos.json` document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub videos: Vec<Video>,
}

/// Ordered, immutable collection of videos for one page view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    videos: Vec<Video>,
}

impl Catalog {
    pub fn new(videos: Vec<Video>) -> Self {
        Self { videos }
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Video> {
        self.videos.get(index)
    }

    /// Locate a video by identifier. Linear scan, first match wins.
    pub fn locate(&self, id: &str) -> Option<(usize, &Video)> {
        self.videos.iter().enumerate().find(|(_, v)| v.id == id)
    }

    /// Distinct categories in order of first appearance
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for video in &self.videos {
            if !seen.iter().any(|c| c == &video.category) {
                seen.push(video.category.clone());
            }
        }
        seen
    }
}

impl From<CatalogDocument> for Catalog {
    fn from(document: CatalogDocument) -> Self {
        Self::new(document.videos)
    }
}

/// Format a duration in seconds as "M:SS"
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Numeric, non-empty identifiers are the only ones the embed widget accepts
pub fn is_valid_video_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
}

/// Pull the numeric video id out of a Vimeo page or player address
pub fn extract_vimeo_id(url: &str) -> Option<String> {
    VIMEO_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn video(id: &str, category: &str) -> Video {
        Video {
            id: id.to_string(),
            title: format!("Video {}", id),
            description: format!("Description for video {}", id),
            category: category.to_string(),
            thumbnail: format!("https://i.vimeocdn.com/video/{}_640.jpg", id),
            duration: "3:05".to_string(),
        }
    }

    pub fn three_videos() -> Catalog {
        Catalog::new(vec![video("1", "a"), video("2", "b"), video("3", "a")])
    }
}
