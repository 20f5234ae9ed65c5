//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **content-centric, not file-centric**. Each entity (collection,
//! team category, page, publication) leads with its identity: a positional
//! index and a title. Resource paths and counts follow as indented context
//! lines, so the output reads as an inventory of the site.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Source: content (local)
//!
//! Publications: 5 items in 3 years (2024, 2023, 2021)
//!     Generated: 2025-01-12T02:00:03
//! News: 3 items in 2 years (2024, 2023)
//!     Generated: 2025-01-12T02:00:05
//! Team: 4 members in 3 categories
//!     001 Principal Investigator (1)
//!     002 Postdocs (2)
//!     003 PhD Students (1)
//!     Failed: data/team/postdocs/missing-person.txt
//!         Not found: data/team/postdocs/missing-person.txt
//!
//! Pages
//!     001 Research Overview → research.html
//!     002 github → https://github.com/example-lab (link)
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! Team → team.html
//! Publications → publications.html
//!     2024 → publications/2024.html
//!
//! Generated 9 pages, copied 14 files
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::collection::Collection;
use crate::generate::{Build, Site};
use crate::news::CompiledNews;
use crate::search::{preview, strip_markup};
use crate::source::PartialLoadFailure;
use crate::team::TeamRoster;
use crate::types::{NewsItem, Publication};
use crate::view::PageState;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

fn year_list(years: &[i32]) -> String {
    years
        .iter()
        .map(|y| y.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Two lines per failure: the resource, then the reason.
fn failure_lines(failures: &[PartialLoadFailure], depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for failure in failures {
        lines.push(format!("{}Failed: {}", indent(depth), failure.resource));
        lines.push(format!("{}{}", indent(depth + 1), failure.error));
    }
    lines
}

/// Header and context lines for a loaded collection, or its state.
fn collection_lines<T>(label: &str, state: &PageState<Collection<T>>) -> Vec<String> {
    match state {
        PageState::Loaded(collection) => vec![
            format!(
                "{}: {} in {} ({})",
                label,
                plural(collection.total_count(), "item", "items"),
                plural(collection.years().len(), "year", "years"),
                year_list(collection.years())
            ),
            format!("{}Generated: {}", indent(1), collection.generated_at()),
        ],
        PageState::Empty => vec![format!("{label}: no data")],
        PageState::Loading => vec![format!("{label}: loading")],
        PageState::Failed(message) => vec![format!("{label}: ERROR {message}")],
    }
}

fn team_lines(state: &PageState<TeamRoster>, failures: &[PartialLoadFailure]) -> Vec<String> {
    let mut lines = Vec::new();
    match state {
        PageState::Loaded(roster) => {
            lines.push(format!(
                "Team: {} in {}",
                plural(roster.len(), "member", "members"),
                plural(roster.categories.len(), "category", "categories")
            ));
            for (i, (category, members)) in roster.categories.iter().enumerate() {
                lines.push(format!(
                    "{}{} {} ({})",
                    indent(1),
                    format_index(i + 1),
                    category.title(),
                    members.len()
                ));
            }
        }
        PageState::Empty => lines.push("Team: no data".to_string()),
        PageState::Loading => lines.push("Team: loading".to_string()),
        PageState::Failed(message) => lines.push(format!("Team: ERROR {message}")),
    }
    lines.extend(failure_lines(failures, 1));
    lines
}

// ============================================================================
// check
// ============================================================================

/// Format the content inventory shown by `check`.
pub fn format_check_output(site: &Site, source: &str) -> Vec<String> {
    let mut lines = vec![format!("Source: {source}"), String::new()];

    lines.extend(collection_lines("Publications", &site.publications));
    lines.extend(collection_lines("News", &site.news));
    lines.extend(team_lines(&site.team, &site.team_failures));

    if !site.slides.is_empty() {
        let with_image = site.slides.iter().filter(|s| s.image.is_some()).count();
        lines.push(format!(
            "Research areas: {} ({} with image)",
            site.slides.len(),
            with_image
        ));
    }

    if site.pages.home.is_some() || !site.pages.pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        if site.pages.home.is_some() {
            lines.push(format!("{}Home intro \u{2192} index.html", indent(1)));
        }
        for (i, page) in site.pages.pages.iter().enumerate() {
            let target = if page.is_link {
                format!("{} (link)", page.body)
            } else {
                format!("{}.html", page.slug)
            };
            let hidden = if page.in_nav { "" } else { " [not in nav]" };
            lines.push(format!(
                "{}{} {} \u{2192} {}{}",
                indent(1),
                format_index(i + 1),
                page.title,
                target,
                hidden
            ));
        }
    }

    lines
}

/// Print check output to stdout.
pub fn print_check_output(site: &Site, source: &str) {
    for line in format_check_output(site, source) {
        println!("{}", line);
    }
}

// ============================================================================
// search / recent
// ============================================================================

fn publication_lines(index: usize, publication: &Publication) -> Vec<String> {
    let mut lines = vec![
        format!("{} {}", format_index(index), publication.title),
        format!("{}{}", indent(1), publication.short_authors()),
        format!("{}{} ({})", indent(1), publication.journal, publication.date),
    ];
    if let Some(url) = publication.doi_url() {
        lines.push(format!("{}{}", indent(1), url));
    }
    lines
}

fn news_lines(index: usize, item: &NewsItem) -> Vec<String> {
    let header = match &item.title {
        Some(title) => format!("{} {} {}", format_index(index), item.date, title),
        None => format!("{} {}", format_index(index), item.date),
    };
    vec![
        header,
        format!("{}{}", indent(1), preview(&strip_markup(&item.content), 80)),
    ]
}

/// Format publications matching a search term.
pub fn format_publication_results(term: &str, results: &[&Publication]) -> Vec<String> {
    let mut lines = vec![format!(
        "{} matching \"{}\"",
        plural(results.len(), "publication", "publications"),
        term
    )];
    for (i, publication) in results.iter().enumerate() {
        lines.extend(publication_lines(i + 1, publication));
    }
    lines
}

/// Format news items matching a search term.
pub fn format_news_results(term: &str, results: &[&NewsItem]) -> Vec<String> {
    let mut lines = vec![format!(
        "{} matching \"{}\"",
        plural(results.len(), "news item", "news items"),
        term
    )];
    for (i, item) in results.iter().enumerate() {
        lines.extend(news_lines(i + 1, item));
    }
    lines
}

/// Format the most recent publications.
pub fn format_recent_publications(items: &[&Publication]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .flat_map(|(i, p)| publication_lines(i + 1, p))
        .collect()
}

/// Format the most recent news items.
pub fn format_recent_news(items: &[&NewsItem]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .flat_map(|(i, n)| news_lines(i + 1, n))
        .collect()
}

/// Print lines to stdout.
pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// build
// ============================================================================

fn page_label(page: &str, site: &Site) -> String {
    let stem = page.trim_end_matches(".html");
    match stem {
        "index" => "Home".to_string(),
        "team" => "Team".to_string(),
        "publications" => "Publications".to_string(),
        "news" => "News".to_string(),
        other => match other.split_once('/') {
            Some((_, year)) => format!("{}{}", indent(1), year),
            None => site
                .pages
                .pages
                .iter()
                .find(|p| p.slug == other)
                .map(|p| p.title.clone())
                .unwrap_or_else(|| other.to_string()),
        },
    }
}

fn failed_message<T>(state: &PageState<T>) -> Option<&str> {
    match state {
        PageState::Failed(message) => Some(message),
        _ => None,
    }
}

/// Format the pages written by `build`.
pub fn format_build_output(build: &Build) -> Vec<String> {
    let mut lines: Vec<String> = build
        .written
        .iter()
        .map(|page| format!("{} \u{2192} {}", page_label(page, &build.site), page))
        .collect();

    let mut problems = Vec::new();
    for (label, message) in [
        ("publications", failed_message(&build.site.publications)),
        ("news", failed_message(&build.site.news)),
        ("team", failed_message(&build.site.team)),
    ] {
        if let Some(message) = message {
            problems.push(format!("Warning: {label} failed to load: {message}"));
        }
    }
    if !build.site.team_failures.is_empty() {
        problems.push(format!(
            "Warning: {} could not be loaded",
            plural(build.site.team_failures.len(), "team record", "team records")
        ));
        problems.extend(failure_lines(&build.site.team_failures, 1));
    }
    if !problems.is_empty() {
        lines.push(String::new());
        lines.extend(problems);
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, copied {}",
        plural(build.written.len(), "page", "pages"),
        plural(build.assets_copied, "file", "files")
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(build: &Build) {
    for line in format_build_output(build) {
        println!("{}", line);
    }
}

// ============================================================================
// compile-news
// ============================================================================

/// Format the result of `compile-news`.
pub fn format_news_output(compiled: &CompiledNews, written_to: &Path) -> Vec<String> {
    let collection = &compiled.collection;
    let mut lines = Vec::new();
    for (year, items) in collection.grouping().iter_years() {
        lines.push(format!("{} ({})", year, items.len()));
        for item in items {
            let title = item.title.as_deref().unwrap_or("(untitled)");
            lines.push(format!("{}{} {}", indent(1), item.date, title));
            if let Some(image) = &item.image {
                lines.push(format!("{}Image: {}", indent(2), image));
            }
        }
    }

    for name in &compiled.skipped {
        lines.push(format!("Skipped: {name} (name is not a date)"));
    }
    lines.extend(failure_lines(&compiled.failures, 0));

    lines.push(String::new());
    lines.push(format!(
        "Compiled {} \u{2192} {}",
        plural(collection.total_count(), "news item", "news items"),
        written_to.display()
    ));
    lines
}

/// Print compile-news output to stdout.
pub fn print_news_output(compiled: &CompiledNews, written_to: &Path) {
    for line in format_news_output(compiled, written_to) {
        println!("{}", line);
    }
}
