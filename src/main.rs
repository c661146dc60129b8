use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use teamup_video::embed::{EmbedFrame, EmbedParams};
use teamup_video::navigation::History;
use teamup_video::pages;
use teamup_video::player::{NavControls, PlayerController, PlayerState, PlayerSurface};
use teamup_video::view::{CatalogRender, CatalogView};
use teamup_video::{CatalogLoader, Config, SessionHistory};

#[derive(Parser)]
#[command(name = "teamup-video")]
#[command(version, about = "TeamUp video catalog and player")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to teamup-video.toml, then environment)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Catalog data file, path or http(s) URL
    #[arg(long, global = true)]
    source: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog entries, optionally filtered by category
    List {
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Print the rendered grid state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Open a video and step through the catalog
    Watch {
        /// Video identifier, as the `id` query parameter
        #[arg(long)]
        id: Option<String>,

        /// Navigation steps applied after opening, in order
        #[arg(long = "nav", value_enum)]
        steps: Vec<Step>,
    },
    /// Print the embed reference for a video
    Embed {
        id: String,

        /// Parameter override, key=value
        #[arg(short, long = "param")]
        params: Vec<String>,
    },
    /// Render a page (home, library or watch) to HTML
    Render {
        #[arg(value_enum)]
        page: Page,

        /// Query string of the page address, e.g. "id=3" or "category=a"
        #[arg(short, long, default_value = "")]
        query: String,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Serve the pages and the catalog document over HTTP
    #[cfg(feature = "api")]
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the effective configuration
    Config {
        /// Save it to this path as TOML
        #[arg(long)]
        save: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Step {
    Next,
    Prev,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Page {
    Home,
    Library,
    Watch,
}

/// Player surface that narrates draws to the terminal
struct TerminalSurface;

impl PlayerSurface for TerminalSurface {
    fn set_page_title(&mut self, title: &str) {
        println!("== {} ==", title);
    }

    fn set_title(&mut self, title: &str) {
        println!("Title:       {}", title);
    }

    fn set_description(&mut self, description: &str) {
        println!("Description: {}", description);
    }

    fn show_loading(&mut self) {
        println!("Loading video...");
    }

    fn show_embed(&mut self, frame: EmbedFrame) {
        println!("Player:      {}", frame.src);
    }

    fn show_error(&mut self, message: &str, return_address: &str) {
        println!("⚠ {} [Back to Library: {}]", message, return_address);
    }

    fn set_navigation(&mut self, controls: NavControls) {
        println!(
            "Navigation:  previous {} | next {}",
            if controls.previous_enabled { "enabled" } else { "disabled" },
            if controls.next_enabled { "enabled" } else { "disabled" }
        );
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(source) = &cli.source {
        config.catalog.source = source.clone();
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(level: &str, verbose: bool) {
    let level = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("teamup_video={},warn", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_overrides(params: &[String]) -> Result<EmbedParams> {
    let mut overrides = EmbedParams::new();
    for param in params {
        let (key, value) = param
            .split_once('=')
            .ok_or_else(|| anyhow!("Parameter override must be key=value: {}", param))?;
        overrides.set(key, value);
    }
    Ok(overrides)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    init_logging(&config.logging.level, cli.verbose);
    info!("📄 Catalog source: {}", config.catalog.source);

    match cli.command {
        Commands::List { category, json } => {
            let loader = CatalogLoader::from_config(&config);
            let mut view =
                CatalogView::from_load(loader.load().await, config.catalog.player_page.clone());
            view.set_category(&category);
            let render = view.render();

            if json {
                println!("{}", serde_json::to_string_pretty(&render)?);
                return Ok(());
            }

            match render {
                CatalogRender::Cards { cards } => {
                    for card in cards {
                        println!(
                            "{:>12}  {:>6}  {:<14}  {}  ({})",
                            card.id, card.duration, card.category, card.title, card.href
                        );
                    }
                }
                CatalogRender::NoResults { message } => println!("{}", message),
                CatalogRender::Error { message } => {
                    println!("⚠ {}", message);
                    std::process::exit(1);
                }
            }
        }

        Commands::Watch { id, steps } => {
            let query = id
                .map(|id| format!("id={}", urlencoding::encode(&id)))
                .unwrap_or_default();
            let address = format!("{}?{}", config.catalog.player_page, query);

            let loader = CatalogLoader::from_config(&config);
            let mut player = PlayerController::new(
                &config,
                SessionHistory::starting_at(address),
                Box::new(config.mount_delay()),
            );
            let mut surface = TerminalSurface;

            player.open(&mut surface, &query, loader.load().await).await;

            for step in steps {
                let moved = match step {
                    Step::Next => player.navigate_next(&mut surface).await,
                    Step::Prev => player.navigate_previous(&mut surface).await,
                };
                if !moved {
                    info!("Navigation {:?} ignored at index {:?}", step, player.current_index());
                }
            }

            if let Some(address) = player.history().current_address() {
                println!("Address:     {}", address);
            }

            if let PlayerState::Error(_) = player.state() {
                std::process::exit(1);
            }
        }

        Commands::Embed { id, params } => {
            let overrides = parse_overrides(&params)?;
            println!("{}", config.embed_renderer().render(&id, &overrides));
        }

        Commands::Render { page, query, output } => {
            let loader = CatalogLoader::from_config(&config);
            let html = match page {
                Page::Home => pages::home_page(&config).await,
                Page::Library => pages::library_page(&config, &loader, &query).await,
                Page::Watch => pages::watch_page(&config, &loader, &query).await,
            };

            match output {
                Some(path) => {
                    tokio::fs::write(&path, html).await?;
                    info!("💾 Page written to {}", path.display());
                }
                None => print!("{}", html),
            }
        }

        #[cfg(feature = "api")]
        Commands::Serve { port } => {
            let server = teamup_video::api::ApiServer::new(std::sync::Arc::new(config.clone()));
            let server = match port {
                Some(port) => server.with_port(port),
                None => server,
            };
            server.start().await?;
        }

        Commands::Config { save } => {
            println!("{}", config.summary());
            if let Some(path) = save {
                config.save(&path)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let overrides =
            parse_overrides(&["autoplay=1".to_string(), "color=ff0000".to_string()]).unwrap();
        assert_eq!(overrides.get("autoplay"), Some("1"));
        assert_eq!(overrides.get("color"), Some("ff0000"));
        assert!(parse_overrides(&["autoplay".to_string()]).is_err());
    }

    #[test]
    fn test_cli_parses_watch_steps() {
        let cli = Cli::try_parse_from([
            "teamup-video",
            "watch",
            "--id",
            "2",
            "--nav",
            "next",
            "--nav",
            "prev",
        ])
        .unwrap();
        match cli.command {
            Commands::Watch { id, steps } => {
                assert_eq!(id.as_deref(), Some("2"));
                assert_eq!(steps.len(), 2);
            }
            _ => panic!("expected watch command"),
        }
    }
}
