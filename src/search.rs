//! Case-insensitive substring search over collection items.
//!
//! A search is a list of field accessors: each returns zero or more text
//! values for an item. An item matches when any value contains the term,
//! compared case-insensitively. The empty term matches everything.
//!
//! ```text
//! publications: title | each author | journal | abstract
//! news:         content (markup stripped) | title | formatted date
//! ```

use crate::types::{NewsItem, Publication};
use std::borrow::Cow;

/// Extracts the searchable text values of one field.
pub type FieldFn<T> = fn(&T) -> Vec<Cow<'_, str>>;

/// Keep the items where any configured field contains `term`.
///
/// Stable and order-preserving; never deduplicates. An empty `term`
/// returns every item.
pub fn filter<'a, T>(items: &'a [T], term: &str, fields: &[FieldFn<T>]) -> Vec<&'a T> {
    if term.is_empty() {
        return items.iter().collect();
    }
    let needle = term.to_lowercase();
    items
        .iter()
        .filter(|item| matches(*item, &needle, fields))
        .collect()
}

/// Whether one item matches an already-lowercased needle.
pub fn matches<T>(item: &T, needle: &str, fields: &[FieldFn<T>]) -> bool {
    fields
        .iter()
        .flat_map(|field| field(item))
        .any(|value| value.to_lowercase().contains(needle))
}

/// All field values of an item, lowercased, as a JSON array of strings.
///
/// Rendered into `data-search` attributes. The in-page filter tests each
/// value on its own, the same way [`filter`] does, so a term never matches
/// across two values.
pub fn search_text<T>(item: &T, fields: &[FieldFn<T>]) -> String {
    let values: Vec<String> = fields
        .iter()
        .flat_map(|field| field(item))
        .map(|value| value.to_lowercase())
        .collect();
    serde_json::to_string(&values).unwrap_or_default()
}

fn publication_title(p: &Publication) -> Vec<Cow<'_, str>> {
    vec![Cow::Borrowed(&p.title)]
}

fn publication_authors(p: &Publication) -> Vec<Cow<'_, str>> {
    p.authors.iter().map(|a| Cow::Borrowed(a.as_str())).collect()
}

fn publication_journal(p: &Publication) -> Vec<Cow<'_, str>> {
    vec![Cow::Borrowed(&p.journal)]
}

fn publication_abstract(p: &Publication) -> Vec<Cow<'_, str>> {
    vec![Cow::Borrowed(&p.r#abstract)]
}

pub const PUBLICATION_FIELDS: &[FieldFn<Publication>] = &[
    publication_title,
    publication_authors,
    publication_journal,
    publication_abstract,
];

fn news_content(n: &NewsItem) -> Vec<Cow<'_, str>> {
    vec![Cow::Owned(strip_markup(&n.content))]
}

fn news_title(n: &NewsItem) -> Vec<Cow<'_, str>> {
    n.title.iter().map(|t| Cow::Borrowed(t.as_str())).collect()
}

fn news_date(n: &NewsItem) -> Vec<Cow<'_, str>> {
    vec![Cow::Borrowed(&n.formatted_date)]
}

pub const NEWS_FIELDS: &[FieldFn<NewsItem>] = &[news_content, news_title, news_date];

/// Reduce HTML to its text content.
///
/// Tags are dropped and the handful of entities markdown renderers emit are
/// decoded, so a search for `R&D` matches `R&amp;D`.
pub fn strip_markup(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    decode_entities(&text)
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// Collapse whitespace and cut to at most `max` characters, appending `...`
/// when shortened. Used for plain-text previews.
pub fn preview(text: &str, max: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max {
        collapsed
    } else {
        let cut: String = collapsed.chars().take(max).collect();
        format!("{}...", cut.trim_end())
    }
}
