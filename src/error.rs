//! Failure taxonomy for catalog and player pages

/// The catalog data file could not be obtained
#[derive(thiserror::Error, Debug)]
pub enum LoadFailure {
    #[error("Failed to reach catalog source {source_name}: {message}")]
    Transport { source_name: String, message: String },

    #[error("Catalog source {source_name} answered with status {status}")]
    Status { source_name: String, status: u16 },

    #[error("Catalog document from {source_name} is unreadable: {message}")]
    Decode { source_name: String, message: String },
}

/// The requested video could not be resolved
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFoundFailure {
    #[error("No video ID provided. Please select a video from the library.")]
    MissingId,

    #[error("Video not found. Please check the URL and try again.")]
    UnknownId(String),
}

/// Why a player page ended in its error state
#[derive(thiserror::Error, Debug)]
pub enum PlayerFailure {
    #[error("Failed to load video data. Please try again later.")]
    Load(#[from] LoadFailure),

    #[error(transparent)]
    NotFound(#[from] NotFoundFailure),
}

impl PlayerFailure {
    /// Message shown in place of the video description
    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_failure_messages_are_distinct() {
        let load = PlayerFailure::from(LoadFailure::Status {
            source_name: "videos.json".to_string(),
            status: 404,
        });
        let missing = PlayerFailure::from(NotFoundFailure::MissingId);
        let unknown = PlayerFailure::from(NotFoundFailure::UnknownId("9".to_string()));

        assert_eq!(load.message(), "Failed to load video data. Please try again later.");
        assert_eq!(
            missing.message(),
            "No video ID provided. Please select a video from the library."
        );
        assert_eq!(
            unknown.message(),
            "Video not found. Please check the URL and try again."
        );
    }
}
