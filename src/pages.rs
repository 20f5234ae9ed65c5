//! Markdown content pages.
//!
//! Free-form pages (research overview, tools, contact) are markdown files in
//! the `pages/` directory of a local content source:
//!
//! ```text
//! content/pages/
//! ├── home.md              # intro text on the home page (unnumbered)
//! ├── 010-research.md      # nav position 10 → research.html
//! ├── 050-tools.md         # nav position 50 → tools.html
//! ├── 060-github.md        # body is just a URL → external nav link
//! └── lab-handbook.md      # unnumbered → lab-handbook.html, not in nav
//! ```
//!
//! The page title is the first `# heading`, falling back to the filename
//! label. Slugs that collide with generated pages are skipped.

use crate::naming::parse_entry_name;
use pulldown_cmark::{Options, Parser, html as md_html};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

pub const PAGES_DIR: &str = "pages";
pub const HOME_SLUG: &str = "home";

/// Slugs owned by generated pages.
const RESERVED_SLUGS: &[&str] = &["index", "team", "publications", "news"];

#[derive(Error, Debug)]
pub enum PageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// First `# heading` in the markdown, or `link_title` as fallback.
    pub title: String,
    /// Nav label: filename with number stripped and dashes as spaces.
    pub link_title: String,
    pub slug: String,
    /// Raw markdown, or the URL for link pages.
    pub body: String,
    pub in_nav: bool,
    pub sort_key: u32,
    /// Body is a bare URL; the page is an external nav link.
    pub is_link: bool,
}

/// Pages found under `pages/`.
#[derive(Debug, Clone, Default)]
pub struct PageSet {
    /// Content pages, sorted by number prefix.
    pub pages: Vec<Page>,
    /// `home.md`, shown as the home page intro.
    pub home: Option<Page>,
}

/// Read every markdown page under `<root>/pages/`.
///
/// A missing directory yields an empty set.
pub fn load_pages(root: &Path) -> Result<PageSet, PageError> {
    let dir = root.join(PAGES_DIR);
    if !dir.is_dir() {
        return Ok(PageSet::default());
    }

    let mut md_files: Vec<PathBuf> = fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("md"))
                    .unwrap_or(false)
        })
        .collect();
    md_files.sort();

    let mut set = PageSet::default();
    for md_path in &md_files {
        let stem = md_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let content = fs::read_to_string(md_path)?;
        let page = parse_page(&stem, content);

        if page.slug.is_empty() {
            warn!(file = %md_path.display(), "page has no name, skipping");
        } else if page.slug == HOME_SLUG && !page.in_nav {
            set.home = Some(page);
        } else if RESERVED_SLUGS.contains(&page.slug.as_str()) {
            warn!(slug = %page.slug, "page slug collides with a generated page, skipping");
        } else {
            set.pages.push(page);
        }
    }

    set.pages.sort_by_key(|p| p.sort_key);
    Ok(set)
}

/// Build a page from its file stem and markdown content.
pub fn parse_page(stem: &str, content: String) -> Page {
    let parsed = parse_entry_name(stem);
    let in_nav = parsed.number.is_some();
    let sort_key = parsed.number.unwrap_or(u32::MAX);
    let link_title = parsed.display_title;

    let trimmed = content.trim();
    let is_link = !trimmed.contains('\n')
        && (trimmed.starts_with("http://") || trimmed.starts_with("https://"));

    let title = if is_link {
        link_title.clone()
    } else {
        content
            .lines()
            .find(|line| line.starts_with("# "))
            .map(|line| line.trim_start_matches("# ").trim().to_string())
            .unwrap_or_else(|| link_title.clone())
    };

    Page {
        title,
        link_title,
        slug: parsed.name,
        body: if is_link { trimmed.to_string() } else { content },
        in_nav,
        sort_key,
        is_link,
    }
}

/// Render page markdown to HTML (tables, footnotes, strikethrough enabled).
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let mut html = String::new();
    md_html::push_html(&mut html, Parser::new_ext(markdown, options));
    html
}
