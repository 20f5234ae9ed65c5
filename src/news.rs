//! News compilation: markdown posts to the `news.json` collection.
//!
//! Posts live under `data/news/`, listed by an `index.json` manifest. Each
//! post is named after its date and may have a companion image with the
//! same base name:
//!
//! ```text
//! data/news/
//! ├── index.json        # ["03-05-24.md", "2023-11-20.md"]
//! ├── 03-05-24.md       # MM-DD-YY
//! ├── 03-05-24.jpg      # optional image (.jpg .jpeg .png .gif .webp)
//! └── 2023-11-20.md     # YYYY-MM-DD
//! ```
//!
//! The first heading of a post becomes its title; a level-one title heading
//! is removed from the rendered body so it is not shown twice. Single line
//! breaks inside paragraphs are kept as `<br>`.
//!
//! The compiled collection is sorted newest first and grouped by year. It is
//! the same document [`crate::collection::load_news`] reads back.

use crate::collection::{Collection, NewsDocument};
use crate::grouping::group_by_year;
use crate::source::{LoadError, Loader, PartialLoadFailure};
use crate::types::NewsItem;
use chrono::{Datelike, NaiveDate};
use futures::future::join_all;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, html as md_html};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const NEWS_DIR: &str = "data/news";
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Error, Debug)]
pub enum NewsError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of compiling the news directory.
#[derive(Debug)]
pub struct CompiledNews {
    pub collection: Collection<NewsItem>,
    /// Manifest entries whose name is not a recognizable date.
    pub skipped: Vec<String>,
    pub failures: Vec<PartialLoadFailure>,
}

/// A post rendered to HTML.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPost {
    pub title: Option<String>,
    pub html: String,
}

/// Date encoded in a post filename.
///
/// Accepts `MM-DD-YY`, `MM-DD-YYYY` and `YYYY-MM-DD`, with or without the
/// `.md` extension. Two-digit years are in the 2000s. Returns `None` for
/// anything else, including impossible dates.
pub fn parse_news_filename(name: &str) -> Option<NaiveDate> {
    let base = name.strip_suffix(".md").unwrap_or(name);
    let parts: Vec<&str> = base.split('-').collect();
    let [a, b, c] = parts.as_slice() else {
        return None;
    };
    if ![a, b, c].iter().all(|p| !p.is_empty() && p.bytes().all(|d| d.is_ascii_digit())) {
        return None;
    }

    let (year, month, day): (i32, u32, u32) = if a.len() == 4 {
        (a.parse().ok()?, b.parse().ok()?, c.parse().ok()?)
    } else if a.len() <= 2 && b.len() <= 2 && matches!(c.len(), 2 | 4) {
        let year: i32 = c.parse().ok()?;
        let year = if year < 100 { 2000 + year } else { year };
        (year, a.parse().ok()?, b.parse().ok()?)
    } else {
        return None;
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Render a markdown post, extracting its title.
pub fn render_post(markdown: &str) -> RenderedPost {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut title: Option<String> = None;
    let mut in_title = false;
    let mut drop_title = false;
    let mut seen_heading = false;
    let mut events = Vec::new();

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::Heading { level, .. }) if !seen_heading => {
                seen_heading = true;
                in_title = true;
                title = Some(String::new());
                drop_title = level == HeadingLevel::H1;
                if !drop_title {
                    events.push(Event::Start(Tag::Heading {
                        level,
                        id: None,
                        classes: Vec::new(),
                        attrs: Vec::new(),
                    }));
                }
            }
            Event::End(TagEnd::Heading(level)) if in_title => {
                in_title = false;
                if !drop_title {
                    events.push(Event::End(TagEnd::Heading(level)));
                }
            }
            Event::Text(ref text) | Event::Code(ref text) if in_title => {
                if let Some(t) = title.as_mut() {
                    t.push_str(text);
                }
                if !drop_title {
                    events.push(event);
                }
            }
            _ if in_title && drop_title => {}
            Event::SoftBreak => events.push(Event::HardBreak),
            other => events.push(other),
        }
    }

    let mut html = String::new();
    md_html::push_html(&mut html, events.into_iter());
    RenderedPost {
        title: title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
        html: html.trim().to_string(),
    }
}

/// Compile every post listed in `data/news/index.json`.
///
/// A missing manifest compiles to an empty collection. Posts that cannot be
/// read are logged and reported in [`CompiledNews::failures`].
pub async fn compile_news(
    loader: Loader<'_>,
    generated_at: &str,
) -> Result<CompiledNews, NewsError> {
    let manifest_path = format!("{NEWS_DIR}/index.json");
    let files = match loader.load_manifest(&manifest_path).await {
        Ok(files) => files,
        Err(e) if e.is_not_found() => {
            info!("no news manifest, compiling empty collection");
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    let mut skipped = Vec::new();
    let mut dated = Vec::new();
    for file in files.iter().filter(|f| f.ends_with(".md")) {
        match parse_news_filename(file) {
            Some(date) => dated.push((file.as_str(), date)),
            None => {
                warn!(file = %file, "could not parse date from news filename, skipping");
                skipped.push(file.clone());
            }
        }
    }

    let mut results = join_all(dated.iter().enumerate().map(|(index, (file, date))| async move {
        (index, load_post(loader, file, *date).await)
    }))
    .await;
    results.sort_by_key(|(index, _)| *index);

    let mut items = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (_, result) in results {
        match result {
            Ok(item) => items.push(item),
            Err(e) => {
                warn!(error = %e, "skipping news post");
                failures.push(PartialLoadFailure::new(e));
            }
        }
    }

    // ISO dates sort chronologically; the sort is stable for same-day posts.
    items.sort_by(|a, b| b.date.cmp(&a.date));
    let grouping = group_by_year(items, |n: &NewsItem| n.year);
    let collection = Collection::from_grouping(generated_at, grouping);
    info!(
        posts = collection.total_count(),
        years = collection.years().len(),
        "compiled news"
    );

    Ok(CompiledNews {
        collection,
        skipped,
        failures,
    })
}

async fn load_post(
    loader: Loader<'_>,
    file: &str,
    date: NaiveDate,
) -> Result<NewsItem, LoadError> {
    let path = format!("{NEWS_DIR}/{file}");
    let markdown = loader.load_text(&path).await?;
    let post = render_post(&markdown);

    let base = file.strip_suffix(".md").unwrap_or(file);
    let candidates: Vec<String> = IMAGE_EXTENSIONS
        .iter()
        .map(|ext| format!("{NEWS_DIR}/{base}.{ext}"))
        .collect();
    let image = loader.resolve_first(&candidates).await.map(|r| r.url);
    debug!(path, has_image = image.is_some(), "compiled news post");

    Ok(NewsItem {
        date: date.format("%Y-%m-%d").to_string(),
        formatted_date: date.format("%B %d, %Y").to_string(),
        year: date.year(),
        content: post.html,
        title: post.title,
        image,
    })
}

/// Write the collection as a pretty-printed `news.json` document.
pub fn write_news(collection: &Collection<NewsItem>, path: &Path) -> Result<(), NewsError> {
    let document = NewsDocument::from(collection);
    let json = serde_json::to_string_pretty(&document)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;
    Ok(())
}
