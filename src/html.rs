//! HTML templating for the landing, library and watch pages

use crate::navigation::watch_address;
use crate::player::{EmbedArea, NavControls, PlayerPage};
use crate::view::{CatalogRender, CatalogView, CategoryControl, VideoCard};

/// Escape text for use in element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Addresses the pages link to
#[derive(Debug, Clone)]
pub struct PageLinks {
    pub home_page: String,
    pub catalog_page: String,
    pub player_page: String,
}

impl PageLinks {
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            home_page: config.catalog.home_page.clone(),
            catalog_page: config.catalog.catalog_page.clone(),
            player_page: config.catalog.player_page.clone(),
        }
    }
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n\
         <link rel=\"stylesheet\" href=\"styles.css\">\n\
         </head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        body
    )
}

fn category_filter(control: &CategoryControl, links: &PageLinks) -> String {
    let class = if control.active {
        "category-filter active"
    } else {
        "category-filter"
    };
    let href = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("category", &control.category)
        .finish();
    format!(
        "<a class=\"{}\" data-category=\"{}\" href=\"{}?{}\">{}</a>\n",
        class,
        escape(&control.category),
        escape(&links.catalog_page),
        escape(&href),
        escape(&control.category)
    )
}

fn video_card(card: &VideoCard) -> String {
    format!(
        "<a class=\"video-card\" data-video-id=\"{id}\" href=\"{href}\">\n\
         <div class=\"video-card-thumbnail\">\n\
         <img src=\"{thumb}\" alt=\"{title}\" loading=\"lazy\">\n\
         <div class=\"video-card-play-button\">▶</div>\n\
         <div class=\"video-card-duration\">{duration}</div>\n\
         </div>\n\
         <div class=\"video-card-content\">\n\
         <h3 class=\"video-card-title\">{title}</h3>\n\
         <p class=\"video-card-description\">{description}</p>\n\
         <span class=\"video-card-category\">{category}</span>\n\
         </div>\n\
         </a>\n",
        id = escape(&card.id),
        href = escape(&card.href),
        thumb = escape(&card.thumbnail),
        title = escape(&card.title),
        duration = escape(&card.duration),
        description = escape(&card.description),
        category = escape(&card.category),
    )
}

/// Contents of the card grid for the current view state
pub fn render_grid(render: &CatalogRender, retry_address: &str) -> String {
    match render {
        CatalogRender::Cards { cards } => cards.iter().map(video_card).collect(),
        CatalogRender::NoResults { message } => format!(
            "<div class=\"no-videos\">\n<p>{}</p>\n</div>\n",
            escape(message)
        ),
        CatalogRender::Error { message } => format!(
            "<div class=\"error-message\">\n\
             <div class=\"error-icon\">⚠</div>\n\
             <p>{}</p>\n\
             <a class=\"retry-button\" href=\"{}\">Retry</a>\n\
             </div>\n",
            escape(message),
            escape(retry_address)
        ),
    }
}

/// Full library page. `retry_address` is the address of this very page.
pub fn render_library_page(view: &CatalogView, links: &PageLinks, retry_address: &str) -> String {
    let mut body = String::new();
    body.push_str("<main class=\"library\">\n<h1>Video Library</h1>\n");

    if !view.is_failed() {
        body.push_str("<nav class=\"category-filters\">\n");
        for control in view.category_controls() {
            body.push_str(&category_filter(&control, links));
        }
        body.push_str("</nav>\n");
    }

    body.push_str(&format!(
        "<div class=\"videos-grid\" id=\"videosGrid\">\n{}</div>\n</main>\n",
        render_grid(&view.render(), retry_address)
    ));

    document("Video Library - TeamUp", &body)
}

fn embed_area(area: &EmbedArea) -> String {
    match area {
        EmbedArea::Empty => String::new(),
        EmbedArea::Loading => "<div class=\"video-placeholder\">\n\
             <div class=\"placeholder-content\">\n\
             <div class=\"loading-spinner\"></div>\n\
             <p>Loading video...</p>\n\
             </div>\n</div>\n"
            .to_string(),
        EmbedArea::Frame(frame) => format!(
            "<iframe src=\"{}\" width=\"{}\" height=\"{}\" frameborder=\"0\" allow=\"{}\"{}></iframe>\n",
            escape(&frame.src),
            escape(&frame.width),
            escape(&frame.height),
            escape(&frame.allow),
            if frame.allow_fullscreen { " allowfullscreen" } else { "" }
        ),
        EmbedArea::Error {
            message,
            return_address,
        } => format!(
            "<div class=\"error-content\">\n\
             <div class=\"error-icon\">⚠</div>\n\
             <p class=\"error-text\">{}</p>\n\
             <a class=\"retry-button\" href=\"{}\">Back to Library</a>\n\
             </div>\n",
            escape(message),
            escape(return_address)
        ),
    }
}

fn nav_button(id: &str, label: &str, target: Option<String>) -> String {
    match target {
        Some(href) => format!(
            "<a class=\"nav-button\" id=\"{}\" href=\"{}\">{}</a>\n",
            id,
            escape(&href),
            label
        ),
        None => format!(
            "<button class=\"nav-button\" id=\"{}\" disabled>{}</button>\n",
            id, label
        ),
    }
}

/// Full watch page from a drawn [`PlayerPage`]
///
/// `neighbours` are the ids before and after the current video, used as link
/// targets for the enabled navigation controls.
pub fn render_watch_page(
    page: &PlayerPage,
    links: &PageLinks,
    neighbours: (Option<&str>, Option<&str>),
) -> String {
    let NavControls {
        previous_enabled,
        next_enabled,
    } = page.navigation;
    let previous = neighbours
        .0
        .filter(|_| previous_enabled)
        .map(|id| watch_address(&links.player_page, id));
    let next = neighbours
        .1
        .filter(|_| next_enabled)
        .map(|id| watch_address(&links.player_page, id));

    let body = format!(
        "<main class=\"watch\">\n\
         <a class=\"back-link\" href=\"{}\">← Library</a>\n\
         <div class=\"video-wrapper\">\n{}</div>\n\
         <h1 id=\"videoTitle\">{}</h1>\n\
         <p id=\"videoDescription\">{}</p>\n\
         <div class=\"video-navigation\">\n{}{}</div>\n\
         </main>\n",
        escape(&links.catalog_page),
        embed_area(&page.embed),
        escape(&page.title),
        escape(&page.description),
        nav_button("prevButton", "← Previous", previous),
        nav_button("nextButton", "Next →", next),
    );

    document(&page.page_title, &body)
}

/// Landing page with the featured video
///
/// A failed mount offers "Retry", a reload of the landing page itself.
pub fn render_home_page(page: &PlayerPage, links: &PageLinks) -> String {
    let player = match &page.embed {
        EmbedArea::Error { message, .. } => format!(
            "<div class=\"video-placeholder\">\n\
             <div class=\"error-content\">\n\
             <div class=\"error-icon\">⚠</div>\n\
             <p class=\"error-text\">{}</p>\n\
             <a class=\"retry-button\" href=\"{}\">Retry</a>\n\
             </div>\n</div>\n",
            escape(message),
            escape(&links.home_page)
        ),
        area => embed_area(area),
    };

    let body = format!(
        "<main class=\"home\">\n\
         <section class=\"hero\">\n\
         <h1>{}</h1>\n\
         <div class=\"video-wrapper\">\n{}</div>\n\
         <a class=\"cta-button\" href=\"{}\">Browse the Video Library</a>\n\
         </section>\n\
         </main>\n",
        escape(&page.title),
        player,
        escape(&links.catalog_page),
    );

    document(&page.page_title, &body)
}
