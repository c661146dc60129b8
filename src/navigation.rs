//! Page addresses, user intents and browser-style history

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Query parameter carrying the selected video's identifier
pub const ID_PARAM: &str = "id";

/// A discrete user action emitted by a view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// A category filter control was activated
    SelectCategory(String),
    /// A catalog card was activated
    SelectVideo(String),
    NavigateNext,
    NavigatePrevious,
    /// The retry button of an error placeholder
    Retry,
    /// The "Back to Library" button of the player error block
    ReturnToCatalog,
}

/// What the hosting surface has to do after an intent was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Full navigation to another address
    Load(String),
    /// Full reload of the current address
    Reload,
}

/// Read `id` from a query string such as `?id=3` or `id=3&x=1`
///
/// The first occurrence wins. An empty value counts as absent.
pub fn video_id_from_query(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == ID_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Read `id` from a full or relative page address
pub fn video_id_from_address(address: &str) -> Option<String> {
    let query = address.split_once('?').map(|(_, q)| q).unwrap_or("");
    let query = query.split('#').next().unwrap_or("");
    video_id_from_query(query)
}

/// `<player-page>?id=<identifier>`
pub fn watch_address(player_page: &str, video_id: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(ID_PARAM, video_id)
        .finish();
    format!("{}?{}", player_page, query)
}

/// State stored alongside a history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub video_id: Option<String>,
    pub address: String,
}

/// Browser history as seen by the player page
pub trait History: Send {
    /// Push a new entry for `video_id` without reloading the page
    fn push(&mut self, video_id: &str, address: &str);

    /// Address of the entry currently shown
    fn current_address(&self) -> Option<&str>;
}

/// In-memory session history with back/forward support
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl SessionHistory {
    /// History whose first entry is the initial page load
    pub fn starting_at(address: impl Into<String>) -> Self {
        let address = address.into();
        Self {
            entries: vec![HistoryEntry {
                video_id: video_id_from_address(&address),
                address,
            }],
            cursor: 0,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    /// Step back; returns the entry now shown
    pub fn back(&mut self) -> Option<&HistoryEntry> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward; returns the entry now shown
    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }
}

impl History for SessionHistory {
    fn push(&mut self, video_id: &str, address: &str) {
        // a push after going back drops the forward entries
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry {
            video_id: Some(video_id.to_string()),
            address: address.to_string(),
        });
        self.cursor = self.entries.len() - 1;
        debug!("History push {} ({} entries)", address, self.entries.len());
    }

    fn current_address(&self) -> Option<&str> {
        self.current().map(|entry| entry.address.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_from_query() {
        assert_eq!(video_id_from_query("?id=2"), Some("2".to_string()));
        assert_eq!(video_id_from_query("x=1&id=abc%20d"), Some("abc d".to_string()));
        assert_eq!(video_id_from_query("id=1&id=2"), Some("1".to_string()));
        assert_eq!(video_id_from_query(""), None);
        assert_eq!(video_id_from_query("?id="), None);
        assert_eq!(video_id_from_query("?video=2"), None);
    }

    #[test]
    fn test_video_id_from_address() {
        assert_eq!(
            video_id_from_address("https://example.com/watch.html?id=7#top"),
            Some("7".to_string())
        );
        assert_eq!(video_id_from_address("watch.html"), None);
    }

    #[test]
    fn test_watch_address() {
        assert_eq!(watch_address("watch.html", "3"), "watch.html?id=3");
        assert_eq!(watch_address("watch.html", "a&b"), "watch.html?id=a%26b");
    }

    #[test]
    fn test_session_history_back_and_forward() {
        let mut history = SessionHistory::starting_at("watch.html?id=1");
        history.push("2", "watch.html?id=2");
        history.push("3", "watch.html?id=3");

        assert_eq!(history.back().unwrap().video_id.as_deref(), Some("2"));
        assert_eq!(history.back().unwrap().video_id.as_deref(), Some("1"));
        assert!(history.back().is_none());
        assert_eq!(history.forward().unwrap().address, "watch.html?id=2");

        history.push("9", "watch.html?id=9");
        assert_eq!(history.entries().len(), 3);
        assert!(history.forward().is_none());
        assert_eq!(history.current_address(), Some("watch.html?id=9"));
    }
}
