//! HTML site generation.
//!
//! Loads every collection through a [`Loader`], derives explicit view state,
//! and renders the final static site with pure render functions.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): intro, research carousel, recent publications and news
//! - **Team** (`/team.html`): roster grouped by category
//! - **Publications** (`/publications.html`, `/publications/<year>.html`)
//! - **News** (`/news.html`, `/news/<year>.html`)
//! - **Content pages** (`/<slug>.html`): one per markdown page
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── team.html
//! ├── publications.html
//! ├── publications/
//! │   ├── 2024.html
//! │   └── 2023.html
//! ├── news.html
//! ├── news/
//! │   └── 2024.html
//! ├── research.html            # from pages/010-research.md
//! ├── publications.json        # collections, copied as-is
//! ├── news.json
//! ├── data/                    # photos and images (records and posts excluded)
//! └── assets/
//! ```
//!
//! ## Page States
//!
//! Each collection page renders from a [`PageState`]: a missing collection
//! shows a "no data" message, a malformed or unreachable one an error banner.
//! A failed collection never aborts the build.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! All interpolation is escaped except news content, which is trusted
//! lab-authored HTML, and rendered markdown.

use crate::collection::{Collection, NEWS_PATH, PUBLICATIONS_PATH, load_news, load_publications};
use crate::config::{self, ResearchArea, SiteConfig};
use crate::pages::{Page, PageError, PageSet, load_pages, render_markdown};
use crate::search::{NEWS_FIELDS, PUBLICATION_FIELDS, preview, search_text, strip_markup};
use crate::source::{Loader, PartialLoadFailure};
use crate::team::{TeamRoster, assemble_team};
use crate::types::{NewsItem, Publication, TeamMember};
use crate::view::{CarouselState, CollectionView, Listing, PageState};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Page error: {0}")]
    Pages(#[from] PageError),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/site.js");

/// Directories copied from a local content root into the output.
const COPIED_DIRS: &[&str] = &["data", "assets"];
/// Source formats that are compiled into pages, never published raw.
const SKIPPED_EXTENSIONS: &[&str] = &["txt", "md"];

/// Built-in sections and their fixed positions in the nav numbering.
const SECTIONS: &[(u32, &str, &str)] = &[
    (20, "team", "Team"),
    (30, "publications", "Publications"),
    (40, "news", "News"),
];

/// A resolved research carousel slide.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slide {
    pub title: String,
    pub description: String,
    /// Public URL of the slide image, when it exists.
    pub image: Option<String>,
}

/// Everything the site is rendered from.
#[derive(Debug)]
pub struct Site {
    pub config: SiteConfig,
    pub publications: PageState<Collection<Publication>>,
    pub news: PageState<Collection<NewsItem>>,
    pub team: PageState<TeamRoster>,
    /// Team records that could not be loaded, taken off the roster.
    pub team_failures: Vec<PartialLoadFailure>,
    pub pages: PageSet,
    pub slides: Vec<Slide>,
}

impl Site {
    /// Whether any collection failed to load (malformed or unreachable).
    pub fn has_errors(&self) -> bool {
        self.publications.is_failed() || self.news.is_failed() || self.team.is_failed()
    }
}

/// Result of a completed build.
#[derive(Debug)]
pub struct Build {
    pub site: Site,
    /// Output-relative paths of the HTML files written.
    pub written: Vec<String>,
    pub assets_copied: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLink {
    pub title: String,
    pub href: String,
    /// Matches the `current` key passed to renderers.
    pub key: String,
    pub external: bool,
}

/// Shared page chrome: config, navigation and stylesheet.
#[derive(Debug, Clone, Copy)]
pub struct Layout<'a> {
    pub config: &'a SiteConfig,
    pub nav: &'a [NavLink],
    pub css: &'a str,
}

// ============================================================================
// Loading
// ============================================================================

/// Load all site content. Collection failures become page states.
pub async fn load_site(loader: Loader<'_>, config: SiteConfig) -> Result<Site, GenerateError> {
    let (publications, news, roster, slides) = futures::join!(
        load_publications(loader, PUBLICATIONS_PATH),
        load_news(loader, NEWS_PATH),
        assemble_team(loader, &config.team.categories),
        resolve_slides(loader, &config.research_areas),
    );

    let publications = PageState::from_load(publications);
    let news = PageState::from_load(news);
    for (name, state_failed) in [
        ("publications", publications.is_failed()),
        ("news", news.is_failed()),
    ] {
        if state_failed {
            warn!(collection = name, "collection failed to load");
        }
    }

    let mut roster = roster;
    let team_failures = std::mem::take(&mut roster.failures);
    let team = if roster.is_empty() && !team_failures.is_empty() {
        PageState::Failed(format!(
            "{} team records could not be loaded",
            team_failures.len()
        ))
    } else {
        PageState::from_load(Ok(roster))
    };

    let pages = match loader.source().local_root() {
        Some(root) => load_pages(root)?,
        None => PageSet::default(),
    };

    info!(
        pages = pages.pages.len(),
        slides = slides.len(),
        "loaded site content"
    );
    Ok(Site {
        config,
        publications,
        news,
        team,
        team_failures,
        pages,
        slides,
    })
}

async fn resolve_slides(loader: Loader<'_>, areas: &[ResearchArea]) -> Vec<Slide> {
    let mut slides = Vec::with_capacity(areas.len());
    for area in areas {
        let image = match &area.image {
            Some(path) => {
                let resolved = loader.resolve_optional(path).await;
                if resolved.is_none() {
                    warn!(path = %path, "research area image not found");
                }
                resolved.map(|r| r.url)
            }
            None => None,
        };
        slides.push(Slide {
            title: area.title.clone(),
            description: area.description.clone(),
            image,
        });
    }
    slides
}

/// Load everything and write the site to `output_dir`.
pub async fn generate(
    loader: Loader<'_>,
    config: SiteConfig,
    output_dir: &Path,
) -> Result<Build, GenerateError> {
    let site = load_site(loader, config).await?;
    let (written, assets_copied) = write_site(&site, output_dir, loader.source().local_root())?;
    info!(
        pages = written.len(),
        assets = assets_copied,
        output = %output_dir.display(),
        "site generated"
    );
    Ok(Build {
        site,
        written,
        assets_copied,
    })
}

// ============================================================================
// Writing
// ============================================================================

/// Render every page into `output_dir`. With a local `content_root`, also
/// copy collections and media. Returns written pages and copied file count.
pub fn write_site(
    site: &Site,
    output_dir: &Path,
    content_root: Option<&Path>,
) -> Result<(Vec<String>, usize), GenerateError> {
    let css = format!(
        "{}\n\n{}",
        config::generate_color_css(&site.config.colors),
        CSS_STATIC
    );
    let nav = build_nav(&site.pages.pages);
    let layout = Layout {
        config: &site.config,
        nav: &nav,
        css: &css,
    };

    fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();

    let home = render_home(
        &layout,
        site.pages.home.as_ref(),
        &site.publications,
        &site.news,
        &site.slides,
        CarouselState::new(site.slides.len()),
    );
    write_page(output_dir, "index.html", home, &mut written)?;

    write_page(
        output_dir,
        "team.html",
        render_team(&layout, &site.team),
        &mut written,
    )?;

    let all_years = CollectionView::default();
    write_page(
        output_dir,
        "publications.html",
        render_publications(&layout, &site.publications, &all_years),
        &mut written,
    )?;
    if let Some(publications) = site.publications.loaded() {
        for year in publications.years() {
            let view = CollectionView::for_year(*year);
            let page = render_publications(&layout, &site.publications, &view);
            write_page(output_dir, &format!("publications/{year}.html"), page, &mut written)?;
        }
    }

    write_page(
        output_dir,
        "news.html",
        render_news(&layout, &site.news, &all_years),
        &mut written,
    )?;
    if let Some(news) = site.news.loaded() {
        for year in news.years() {
            let view = CollectionView::for_year(*year);
            let page = render_news(&layout, &site.news, &view);
            write_page(output_dir, &format!("news/{year}.html"), page, &mut written)?;
        }
    }

    for page in site.pages.pages.iter().filter(|p| !p.is_link) {
        write_page(
            output_dir,
            &format!("{}.html", page.slug),
            render_page(&layout, page),
            &mut written,
        )?;
    }

    let assets_copied = match content_root {
        Some(root) => copy_content_files(root, output_dir)?,
        None => 0,
    };

    Ok((written, assets_copied))
}

fn write_page(
    output_dir: &Path,
    relative: &str,
    markup: Markup,
    written: &mut Vec<String>,
) -> Result<(), GenerateError> {
    let path = output_dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, markup.into_string())?;
    debug!(page = relative, "wrote page");
    written.push(relative.to_string());
    Ok(())
}

/// Copy the collection documents and the media directories.
fn copy_content_files(root: &Path, output_dir: &Path) -> Result<usize, GenerateError> {
    let mut copied = 0;

    for document in [PUBLICATIONS_PATH, NEWS_PATH] {
        let src = root.join(document);
        if src.is_file() {
            fs::copy(&src, output_dir.join(document))?;
            copied += 1;
        }
    }

    for dir in COPIED_DIRS {
        let src_dir = root.join(dir);
        if !src_dir.is_dir() {
            continue;
        }
        for entry in WalkDir::new(&src_dir) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let skipped = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| SKIPPED_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)));
            if skipped {
                continue;
            }
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let dst = output_dir.join(relative);
            if let Some(parent) = dst.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dst)?;
            copied += 1;
        }
    }

    debug!(files = copied, "copied content files");
    Ok(copied)
}

// ============================================================================
// Navigation
// ============================================================================

/// Home first, then built-in sections and numbered pages by position.
pub fn build_nav(pages: &[Page]) -> Vec<NavLink> {
    let mut entries: Vec<(u32, NavLink)> = SECTIONS
        .iter()
        .map(|(position, key, title)| {
            (
                *position,
                NavLink {
                    title: title.to_string(),
                    href: format!("/{key}.html"),
                    key: key.to_string(),
                    external: false,
                },
            )
        })
        .collect();

    for page in pages.iter().filter(|p| p.in_nav) {
        let href = if page.is_link {
            page.body.clone()
        } else {
            format!("/{}.html", page.slug)
        };
        entries.push((
            page.sort_key,
            NavLink {
                title: page.link_title.clone(),
                href,
                key: page.slug.clone(),
                external: page.is_link,
            },
        ));
    }
    entries.sort_by_key(|(position, _)| *position);

    let mut nav = vec![NavLink {
        title: "Home".to_string(),
        href: "/".to_string(),
        key: "home".to_string(),
        external: false,
    }];
    nav.extend(entries.into_iter().map(|(_, link)| link));
    nav
}

/// Renders the navigation menu (hamburger on narrow screens)
pub fn render_nav(items: &[NavLink], current: &str) -> Markup {
    html! {
        input.nav-toggle type="checkbox" id="nav-toggle";
        label.nav-hamburger for="nav-toggle" {
            span.hamburger-line {}
            span.hamburger-line {}
            span.hamburger-line {}
        }
        ul.nav-links {
            @for item in items {
                li class=[(item.key == current).then_some("current")] {
                    @if item.external {
                        a href=(item.href) target="_blank" rel="noopener" { (item.title) }
                    } @else {
                        a href=(item.href) { (item.title) }
                    }
                }
            }
        }
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(layout: &Layout, title: &str, current: &str, content: Markup) -> Markup {
    let full_title = if title == layout.config.title {
        title.to_string()
    } else {
        format!("{} | {}", title, layout.config.title)
    };
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (full_title) }
                style { (PreEscaped(layout.css)) }
            }
            body {
                (site_header(layout, current))
                main { (content) }
                @if !layout.config.footer.is_empty() {
                    footer.site-footer { p { (layout.config.footer) } }
                }
                script { (PreEscaped(JS)) }
            }
        }
    }
}

/// Renders the site header with lab name and navigation
fn site_header(layout: &Layout, current: &str) -> Markup {
    html! {
        header.site-header {
            a.site-title href="/" { (layout.config.title) }
            nav.site-nav {
                (render_nav(layout.nav, current))
            }
        }
    }
}

/// Message for a collection that is not loaded. Empty for loaded states.
fn render_state<T>(state: &PageState<T>, noun: &str) -> Markup {
    html! {
        @match state {
            PageState::Loading => p.loading { "Loading " (noun) "..." },
            PageState::Empty => p.empty { "No " (noun) " data available." },
            PageState::Failed(message) => div.error-banner role="alert" {
                "Error loading " (noun) ": " (message)
            },
            PageState::Loaded(_) => {},
        }
    }
}

fn search_box(placeholder: &str, term: &str) -> Markup {
    html! {
        div.search-box {
            input.search-input type="search" placeholder=(placeholder) value=(term)
                aria-label="Search";
        }
    }
}

/// Year selector. `section` is the page base name (`publications`, `news`).
fn year_filter(section: &str, years: &[i32], selected: Option<i32>) -> Markup {
    html! {
        nav.year-filter aria-label="Filter by year" {
            span.label { "Filter by year:" }
            a.year.selected[selected.is_none()] href={ "/" (section) ".html" } { "All Years" }
            @for year in years {
                a.year.selected[selected == Some(*year)] href={ "/" (section) "/" (year) ".html" } {
                    (year)
                }
            }
        }
    }
}

/// Year sections for a listing, or the matching empty message.
fn render_listing<T>(
    listing: Listing<'_, T>,
    view: &CollectionView,
    noun: &str,
    entry: impl Fn(&T, usize) -> Markup,
) -> Markup {
    html! {
        @match listing {
            Listing::Sections(sections) => {
                @for section in &sections {
                    section.year-section id={ "year-" (section.year) } {
                        h2 {
                            (section.year)
                            " "
                            span.count { "(" (section.items.len()) ")" }
                        }
                        @for (index, item) in &section.items {
                            (entry(*item, *index))
                        }
                    }
                }
                p.no-results hidden { "No " (noun) " found matching your search." }
            },
            Listing::NoSearchResults => {
                div.no-results {
                    "No " (noun) " found matching \"" (view.search_term) "\". Try a different search term."
                }
            },
            Listing::NothingForYear(year) => {
                p.empty { "No " (noun) " for " (year) "." }
            },
        }
    }
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the home page.
pub fn render_home(
    layout: &Layout,
    intro: Option<&Page>,
    publications: &PageState<Collection<Publication>>,
    news: &PageState<Collection<NewsItem>>,
    slides: &[Slide],
    carousel: CarouselState,
) -> Markup {
    let config = layout.config;
    let content = html! {
        section.hero {
            h1 { (config.title) }
            @if !config.tagline.is_empty() {
                p.tagline { (config.tagline) }
            }
        }
        @if let Some(page) = intro {
            section.intro { (PreEscaped(render_markdown(&page.body))) }
        }
        @if !slides.is_empty() {
            section.carousel data-index=(carousel.index) aria-roledescription="carousel" {
                @for (i, slide) in slides.iter().enumerate() {
                    figure.slide.active[carousel.current() == Some(i)] data-slide=(i) {
                        @if let Some(image) = &slide.image {
                            img src=(image) alt=(slide.title) loading="lazy";
                        }
                        figcaption {
                            h3 { (slide.title) }
                            @if !slide.description.is_empty() {
                                p { (slide.description) }
                            }
                        }
                    }
                }
                @if slides.len() > 1 {
                    button.carousel-prev type="button" data-go=(carousel.prev().index) aria-label="Previous slide" { "‹" }
                    button.carousel-next type="button" data-go=(carousel.next().index) aria-label="Next slide" { "›" }
                    div.carousel-dots {
                        @for i in 0..slides.len() {
                            button.dot.active[i == carousel.index] type="button" data-go=(i)
                                aria-label={ "Slide " (i + 1) } {}
                        }
                    }
                }
            }
        }
        div.home-columns {
            section.recent-publications {
                h2 { "Recent Publications" }
                @if let Some(collection) = publications.loaded() {
                    ul.recent-list {
                        @for publication in collection.most_recent(config.home.recent_publications) {
                            li {
                                @if let Some(url) = publication.doi_url() {
                                    a.title href=(url) target="_blank" rel="noopener" { (publication.title) }
                                } @else {
                                    span.title { (publication.title) }
                                }
                                p.authors { (publication.short_authors()) }
                                p.journal { (publication.journal) " (" (publication.year) ")" }
                            }
                        }
                    }
                    a.more href="/publications.html" { "View all publications →" }
                } @else {
                    (render_state(publications, "publications"))
                }
            }
            section.recent-news {
                h2 { "Latest News" }
                @if let Some(collection) = news.loaded() {
                    ul.recent-list {
                        @for item in collection.most_recent(config.home.recent_news) {
                            li {
                                p.date { (item.formatted_date) }
                                @if let Some(title) = &item.title {
                                    h3 { (title) }
                                }
                                p.preview { (preview(&strip_markup(&item.content), 240)) }
                            }
                        }
                    }
                    a.more href="/news.html" { "View all news →" }
                } @else {
                    (render_state(news, "news"))
                }
            }
        }
    };

    base_document(layout, &config.title, "home", content)
}

fn member_card(member: &TeamMember) -> Markup {
    html! {
        article.member-card {
            @if let Some(photo) = &member.photo {
                img.member-photo src=(photo) alt=(member.name) loading="lazy";
            } @else {
                div.member-photo.placeholder aria-hidden="true" { (initials(&member.name)) }
            }
            h3 { (member.name) }
            @if !member.title.is_empty() {
                p.member-title { (member.title) }
            }
            @if !member.interests.is_empty() {
                p.interests { (member.interests) }
            }
            @if let Some(url) = member.scholar_url() {
                a.scholar href=(url) target="_blank" rel="noopener" { "Google Scholar" }
            } @else {
                span.no-link { "No Publications Link" }
            }
        }
    }
}

/// Renders the team page.
pub fn render_team(layout: &Layout, team: &PageState<TeamRoster>) -> Markup {
    let content = html! {
        h1 { "Our Team" }
        @if let Some(roster) = team.loaded() {
            @for (category, members) in &roster.categories {
                section.team-category id=(category.key()) {
                    h2 { (category.title()) }
                    div.member-grid {
                        @for member in members {
                            (member_card(member))
                        }
                    }
                }
            }
        } @else {
            (render_state(team, "team"))
        }
    };

    base_document(layout, "Team", "team", content)
}

fn publication_entry(publication: &Publication, index: usize, view: &CollectionView) -> Markup {
    let key = publication.toggle_key(index);
    let abstract_text = &publication.r#abstract;
    html! {
        article.entry.publication data-search=(search_text(publication, PUBLICATION_FIELDS)) {
            h3 { (publication.title) }
            p.authors { (publication.authors.join(", ")) }
            p.journal { (publication.journal) span.date { " · " (publication.date) } }
            @if let Some(doi) = publication.doi.as_deref().filter(|d| !d.is_empty()) {
                p.doi { strong { "DOI:" } " " (doi) }
            }
            div.links {
                @if let Some(url) = publication.doi_url() {
                    a href=(url) target="_blank" rel="noopener" { "View Article" }
                }
                @if let Some(url) = publication.pubmed_url() {
                    a href=(url) target="_blank" rel="noopener" { "PubMed" }
                }
            }
            @if !abstract_text.is_empty() {
                details.abstract data-key=(key) open[view.is_expanded(&key)] {
                    summary { "Abstract" }
                    p { (abstract_text) }
                }
            }
        }
    }
}

/// Renders a publications page for one view.
pub fn render_publications(
    layout: &Layout,
    publications: &PageState<Collection<Publication>>,
    view: &CollectionView,
) -> Markup {
    let content = html! {
        @if let Some(collection) = publications.loaded() {
            h1 {
                "Publications "
                span.count { "(" (collection.total_count()) " total)" }
            }
            (search_box("Search publications by title, author, journal, or abstract...", &view.search_term))
            (year_filter("publications", collection.years(), view.selected_year))
            p.updated { "Last updated: " (collection.generated_at()) }
            (render_listing(
                view.listing(collection, PUBLICATION_FIELDS),
                view,
                "publications",
                |publication, index| publication_entry(publication, index, view),
            ))
        } @else {
            h1 { "Publications" }
            (render_state(publications, "publications"))
        }
    };

    let title = match view.selected_year {
        Some(year) => format!("Publications {year}"),
        None => "Publications".to_string(),
    };
    base_document(layout, &title, "publications", content)
}

fn news_entry(item: &NewsItem) -> Markup {
    html! {
        article.entry.news-item data-search=(search_text(item, NEWS_FIELDS)) {
            @if let Some(image) = &item.image {
                img.news-image src=(image) alt=(item.title.as_deref().unwrap_or("News image")) loading="lazy";
            }
            p.date { (item.formatted_date) }
            @if let Some(title) = &item.title {
                h3 { (title) }
            }
            div.news-content { (PreEscaped(&item.content)) }
        }
    }
}

/// Renders a news page for one view.
pub fn render_news(
    layout: &Layout,
    news: &PageState<Collection<NewsItem>>,
    view: &CollectionView,
) -> Markup {
    let content = html! {
        @if let Some(collection) = news.loaded() {
            h1 {
                "News "
                span.count { "(" (collection.total_count()) " total)" }
            }
            (search_box("Search news...", &view.search_term))
            (year_filter("news", collection.years(), view.selected_year))
            (render_listing(view.listing(collection, NEWS_FIELDS), view, "news", |item, _| news_entry(item)))
        } @else {
            h1 { "News" }
            (render_state(news, "news"))
        }
    };

    let title = match view.selected_year {
        Some(year) => format!("News {year}"),
        None => "News".to_string(),
    };
    base_document(layout, &title, "news", content)
}

/// Renders a markdown content page.
pub fn render_page(layout: &Layout, page: &Page) -> Markup {
    let content = html! {
        article.page-content {
            (PreEscaped(render_markdown(&page.body)))
        }
    };
    base_document(layout, &page.title, &page.slug, content)
}

// ============================================================================
// Tests
// ============================================================================
