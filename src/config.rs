use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::embed::{
    EmbedParams, EmbedRenderer, TimerDelay, DEFAULT_MOUNT_DELAY_MS, VIMEO_PLAYER_BASE,
};

/// Files `Config::load` looks at, in order
pub const CONFIG_PATHS: [&str; 2] = ["teamup-video.toml", "config/teamup-video.toml"];

/// Video played on the landing page when none is configured
pub const DEFAULT_VIDEO_ID: &str = "1071247322";

/// Configuration for the TeamUp video front-end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the catalog comes from and how pages address each other
    pub catalog: CatalogConfig,

    /// Embed widget settings
    pub embed: EmbedConfig,

    /// Player page behaviour
    pub player: PlayerConfig,

    /// HTTP server settings
    pub server: ServerConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Data file location, either an http(s) URL or a local path
    pub source: String,

    /// Landing page name, target of the home page "Retry"
    #[serde(default = "default_home_page")]
    pub home_page: String,

    /// Catalog page name, target of "Back to Library"
    pub catalog_page: String,

    /// Player page name, target of card activation
    pub player_page: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Player endpoint the video id is appended to
    pub base_url: String,

    /// Default query parameters, in order
    pub params: EmbedParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Pause before the loading indicator is swapped for the frame
    pub mount_delay_ms: u64,

    /// Suffix of the page title, "<video title> - <site name>"
    pub site_name: String,

    /// Featured video mounted on the landing page
    #[serde(default = "default_video_id")]
    pub default_video_id: String,
}

fn default_home_page() -> String {
    "index.html".to_string()
}

fn default_video_id() -> String {
    DEFAULT_VIDEO_ID.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,

    /// Directory with stylesheets and images served as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    pub level: String,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_first(&CONFIG_PATHS)
    }

    /// First existing file of `paths`, or the environment when none exists.
    /// A file that exists but does not parse is an error, not a fallback.
    pub fn load_first<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        for path in paths {
            let path = path.as_ref();
            if let Ok(config_str) = std::fs::read_to_string(path) {
                let config: Self = toml::from_str(&config_str).map_err(|e| {
                    anyhow!("Failed to parse config file {}: {}", path.display(), e)
                })?;
                tracing::info!("📄 Loaded configuration from: {}", path.display());
                return Ok(config);
            }
        }

        Self::from_env()
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Cannot read config file {}: {}", path, e))?;
        let config = toml::from_str(&config_str)?;
        tracing::info!("📄 Loaded configuration from: {}", path);
        Ok(config)
    }

    /// Defaults overridden by environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(source) = std::env::var("TEAMUP_VIDEO_SOURCE") {
            config.catalog.source = source;
        }

        if let Ok(port) = std::env::var("TEAMUP_VIDEO_PORT") {
            config.server.port = port
                .parse()
                .map_err(|e| anyhow!("Invalid TEAMUP_VIDEO_PORT {}: {}", port, e))?;
        }

        if let Ok(level) = std::env::var("TEAMUP_VIDEO_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(color) = std::env::var("TEAMUP_VIDEO_EMBED_COLOR") {
            config.embed.params.set("color", color);
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.catalog.source.trim().is_empty() {
            return Err(anyhow!("catalog.source must not be empty"));
        }

        let pages = [
            &self.catalog.home_page,
            &self.catalog.catalog_page,
            &self.catalog.player_page,
        ];
        if pages.iter().any(|page| page.is_empty()) {
            return Err(anyhow!("catalog page names must not be empty"));
        }
        if pages[0] == pages[1] || pages[0] == pages[2] || pages[1] == pages[2] {
            return Err(anyhow!("home, catalog and player pages must be distinct"));
        }

        url::Url::parse(&self.embed.base_url)
            .map_err(|e| anyhow!("embed.base_url is not a valid URL: {}", e))?;

        if self.server.port == 0 {
            return Err(anyhow!("server.port must be greater than 0"));
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }

    /// Embed renderer built from the configured defaults
    pub fn embed_renderer(&self) -> EmbedRenderer {
        EmbedRenderer::new(self.embed.base_url.clone(), self.embed.params.clone())
    }

    /// Mount delay for interactive surfaces
    pub fn mount_delay(&self) -> TimerDelay {
        TimerDelay::from_millis(self.player.mount_delay_ms)
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "TeamUp Video Configuration:\n\
            - Catalog Source: {}\n\
            - Pages: {} / {} / {}\n\
            - Embed Base: {}\n\
            - Embed Params: {}\n\
            - Mount Delay: {}ms\n\
            - Featured Video: {}\n\
            - Server Port: {}",
            self.catalog.source,
            self.catalog.home_page,
            self.catalog.catalog_page,
            self.catalog.player_page,
            self.embed.base_url,
            self.embed.params.to_query(),
            self.player.mount_delay_ms,
            self.player.default_video_id,
            self.server.port
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                source: "videos.json".to_string(),
                home_page: default_home_page(),
                catalog_page: "library.html".to_string(),
                player_page: "watch.html".to_string(),
            },
            embed: EmbedConfig {
                base_url: VIMEO_PLAYER_BASE.to_string(),
                params: EmbedParams::default(),
            },
            player: PlayerConfig {
                mount_delay_ms: DEFAULT_MOUNT_DELAY_MS,
                site_name: "TeamUp".to_string(),
                default_video_id: default_video_id(),
            },
            server: ServerConfig {
                port: 8080,
                static_dir: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.config.catalog.source = source.into();
        self
    }

    pub fn with_player_page(mut self, page: impl Into<String>) -> Self {
        self.config.catalog.player_page = page.into();
        self
    }

    pub fn with_embed_param(mut self, key: &str, value: impl ToString) -> Self {
        self.config.embed.params.set(key, value);
        self
    }

    pub fn with_default_video(mut self, id: impl Into<String>) -> Self {
        self.config.player.default_video_id = id.into();
        self
    }

    pub fn with_mount_delay_ms(mut self, millis: u64) -> Self {
        self.config.player.mount_delay_ms = millis;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn with_static_dir(mut self, dir: PathBuf) -> Self {
        self.config.server.static_dir = Some(dir);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
