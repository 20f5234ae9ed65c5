//! Publication and news collections.
//!
//! Both collections are single JSON documents produced by the content
//! generation step, already grouped by year with items newest first:
//!
//! ```json
//! {
//!   "generated_at": "2025-01-12T02:00:03",
//!   "total_publications": 3,
//!   "years": [2024, 2023],
//!   "publications_by_year": { "2024": [ ... ], "2023": [ ... ] }
//! }
//! ```
//!
//! `news.json` has the same shape with `total_news` and `news_by_year`.
//!
//! Loading validates the envelope and normalizes it into a [`Collection`]:
//!
//! - bucket keys must be integer years
//! - a non-empty bucket must be listed in `years`
//! - listed years without items are dropped
//! - the declared total must match the number of items
//!
//! Items inside a bucket are never re-sorted.

use crate::grouping::YearGrouping;
use crate::source::{LoadError, Loader};
use crate::types::{NewsItem, Publication};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

pub const PUBLICATIONS_PATH: &str = "publications.json";
pub const NEWS_PATH: &str = "news.json";

/// Wire format of `publications.json`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicationsDocument {
    pub generated_at: String,
    pub total_publications: usize,
    pub years: Vec<i32>,
    pub publications_by_year: BTreeMap<String, Vec<Publication>>,
}

/// Wire format of `news.json`.
#[derive(Debug, Serialize, Deserialize)]
pub struct NewsDocument {
    pub generated_at: String,
    pub total_news: usize,
    pub years: Vec<i32>,
    pub news_by_year: BTreeMap<String, Vec<NewsItem>>,
}

/// A validated, year-grouped collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection<T> {
    generated_at: String,
    total_count: usize,
    grouping: YearGrouping<T>,
}

impl<T> Collection<T> {
    /// Validate a pre-grouped envelope. `path` is only used in error messages.
    pub fn from_parts(
        path: &str,
        generated_at: String,
        total_count: usize,
        years: Vec<i32>,
        buckets: BTreeMap<String, Vec<T>>,
    ) -> Result<Self, LoadError> {
        let listed: BTreeSet<i32> = years.iter().copied().collect();

        let mut parsed = Vec::with_capacity(buckets.len());
        for (key, items) in buckets {
            let year: i32 = key.trim().parse().map_err(|_| {
                LoadError::malformed(path, format!("bucket key {key:?} is not a year"))
            })?;
            if !listed.contains(&year) {
                if items.is_empty() {
                    continue;
                }
                return Err(LoadError::malformed(
                    path,
                    format!("bucket {year} is not listed in years"),
                ));
            }
            parsed.push((year, items));
        }

        let grouping = YearGrouping::from_buckets(parsed);
        for year in listed.iter().filter(|y| !grouping.years().contains(*y)) {
            debug!(path, year, "dropping year without items");
        }

        let actual = grouping.len();
        if actual != total_count {
            return Err(LoadError::malformed(
                path,
                format!("declared total {total_count} does not match {actual} items"),
            ));
        }

        Ok(Self {
            generated_at,
            total_count,
            grouping,
        })
    }

    /// Wrap an already-derived grouping; the total is its item count.
    pub fn from_grouping(generated_at: impl Into<String>, grouping: YearGrouping<T>) -> Self {
        Self {
            generated_at: generated_at.into(),
            total_count: grouping.len(),
            grouping,
        }
    }

    /// Content generation timestamp, for display only.
    pub fn generated_at(&self) -> &str {
        &self.generated_at
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// Years with items, newest first.
    pub fn years(&self) -> &[i32] {
        self.grouping.years()
    }

    pub fn bucket(&self, year: i32) -> &[T] {
        self.grouping.bucket(year)
    }

    pub fn grouping(&self) -> &YearGrouping<T> {
        &self.grouping
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.grouping.iter()
    }

    /// The `n` most recent items.
    ///
    /// Whole year buckets are accumulated newest first until at least `n`
    /// items are collected, then the result is cut to exactly `n`. Returns
    /// everything when fewer than `n` items exist.
    pub fn most_recent(&self, n: usize) -> Vec<&T> {
        let mut recent = Vec::new();
        for year in self.years() {
            if recent.len() >= n {
                break;
            }
            recent.extend(self.bucket(*year));
        }
        recent.truncate(n);
        recent
    }
}

impl From<&Collection<NewsItem>> for NewsDocument {
    fn from(collection: &Collection<NewsItem>) -> Self {
        NewsDocument {
            generated_at: collection.generated_at.clone(),
            total_news: collection.total_count,
            years: collection.years().to_vec(),
            news_by_year: collection
                .grouping
                .iter_years()
                .map(|(year, items)| (year.to_string(), items.to_vec()))
                .collect(),
        }
    }
}

/// Load and validate `publications.json` (or another document of that shape).
pub async fn load_publications(
    loader: Loader<'_>,
    path: &str,
) -> Result<Collection<Publication>, LoadError> {
    let doc: PublicationsDocument = loader.load_json(path).await?;
    Collection::from_parts(
        path,
        doc.generated_at,
        doc.total_publications,
        doc.years,
        doc.publications_by_year,
    )
}

/// Load and validate `news.json` (or another document of that shape).
pub async fn load_news(loader: Loader<'_>, path: &str) -> Result<Collection<NewsItem>, LoadError> {
    let doc: NewsDocument = loader.load_json(path).await?;
    Collection::from_parts(
        path,
        doc.generated_at,
        doc.total_news,
        doc.years,
        doc.news_by_year,
    )
}
