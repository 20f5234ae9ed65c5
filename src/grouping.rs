//! Year bucketing for dated collections.
//!
//! Publications and news arrive already grouped by year, newest first. The
//! grouper re-derives the display order of years, drops empty buckets, and
//! never reorders items inside a bucket.

use serde::Serialize;
use std::collections::BTreeMap;

/// Items bucketed by year, with years in descending display order.
///
/// Invariant: every year in [`years`](Self::years) has a non-empty bucket,
/// and every bucket's year appears in `years`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearGrouping<T> {
    years: Vec<i32>,
    buckets: BTreeMap<i32, Vec<T>>,
}

impl<T> Default for YearGrouping<T> {
    fn default() -> Self {
        Self {
            years: Vec::new(),
            buckets: BTreeMap::new(),
        }
    }
}

impl<T> YearGrouping<T> {
    /// Build from pre-grouped buckets, dropping any that are empty.
    pub fn from_buckets(buckets: impl IntoIterator<Item = (i32, Vec<T>)>) -> Self {
        let mut map: BTreeMap<i32, Vec<T>> = BTreeMap::new();
        for (year, items) in buckets {
            if !items.is_empty() {
                map.entry(year).or_default().extend(items);
            }
        }
        let years = map.keys().rev().copied().collect();
        Self { years, buckets: map }
    }

    /// Distinct years, newest first.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Items for one year, in source order. Empty for unknown years.
    pub fn bucket(&self, year: i32) -> &[T] {
        self.buckets.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// All items, newest year first, source order within a year.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.years.iter().flat_map(|y| self.bucket(*y).iter())
    }

    /// Buckets paired with their year, in display order.
    pub fn iter_years(&self) -> impl Iterator<Item = (i32, &[T])> {
        self.years.iter().map(|y| (*y, self.bucket(*y)))
    }

    /// Years to display for an optional year selection.
    ///
    /// `None` selects every year. A selected year that has no items yields
    /// nothing to display.
    pub fn select_year(&self, year: Option<i32>) -> Vec<i32> {
        match year {
            None => self.years.clone(),
            Some(y) if self.buckets.contains_key(&y) => vec![y],
            Some(_) => Vec::new(),
        }
    }
}

/// Bucket a flat sequence by year.
///
/// Within a year the input order is preserved, so callers that feed
/// newest-first items get newest-first buckets.
pub fn group_by_year<T>(
    items: impl IntoIterator<Item = T>,
    year_of: impl Fn(&T) -> i32,
) -> YearGrouping<T> {
    let mut buckets: BTreeMap<i32, Vec<T>> = BTreeMap::new();
    for item in items {
        buckets.entry(year_of(&item)).or_default().push(item);
    }
    YearGrouping::from_buckets(buckets)
}
