//! Explicit view state for the rendered pages.
//!
//! Render functions in [`crate::generate`] are pure: they take content plus
//! one of these values and return markup. Nothing here touches I/O.
//!
//! - [`PageState`]: loading / loaded / empty / failed, derived from a load result
//! - [`CollectionView`]: year selection, search term and expanded abstracts
//! - [`CarouselState`]: the research-area carousel on the home page

use crate::collection::Collection;
use crate::search::{FieldFn, matches};
use crate::source::LoadError;
use crate::team::TeamRoster;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Content that can be present but hold nothing.
pub trait HasItems {
    fn has_items(&self) -> bool;
}

impl<T> HasItems for Collection<T> {
    fn has_items(&self) -> bool {
        !self.is_empty()
    }
}

impl HasItems for TeamRoster {
    fn has_items(&self) -> bool {
        !self.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum PageState<T> {
    Loading,
    Loaded(T),
    /// Nothing to show; not an error.
    Empty,
    /// Load failed; carries the message for the error banner.
    Failed(String),
}

impl<T: HasItems> PageState<T> {
    /// Absent resources and empty content are `Empty`; any other load error
    /// is `Failed`.
    pub fn from_load(result: Result<T, LoadError>) -> Self {
        match result {
            Ok(content) if content.has_items() => PageState::Loaded(content),
            Ok(_) => PageState::Empty,
            Err(e) if e.is_not_found() => PageState::Empty,
            Err(e) => PageState::Failed(e.to_string()),
        }
    }
}

impl<T> PageState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            PageState::Loaded(content) => Some(content),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PageState::Failed(_))
    }
}

/// One year's items after filtering. Each item carries its position in the
/// unfiltered bucket, which keys its abstract toggle.
#[derive(Debug, PartialEq)]
pub struct YearSection<'a, T> {
    pub year: i32,
    pub items: Vec<(usize, &'a T)>,
}

/// What a collection page lists for the current view.
#[derive(Debug, PartialEq)]
pub enum Listing<'a, T> {
    Sections(Vec<YearSection<'a, T>>),
    /// A search term is set and nothing matched in the displayed years.
    NoSearchResults,
    /// No search term, and the selected year has no items.
    NothingForYear(i32),
}

impl<'a, T> Listing<'a, T> {
    /// Flatten the listed items, newest year first. Empty for the
    /// no-results variants.
    pub fn into_items(self) -> Vec<&'a T> {
        match self {
            Listing::Sections(sections) => sections
                .into_iter()
                .flat_map(|section| section.items.into_iter().map(|(_, item)| item))
                .collect(),
            Listing::NoSearchResults | Listing::NothingForYear(_) => Vec::new(),
        }
    }
}

/// View state for the publications and news pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionView {
    pub selected_year: Option<i32>,
    pub search_term: String,
    /// Toggle keys of expanded abstracts.
    pub expanded: BTreeSet<String>,
}

impl CollectionView {
    pub fn for_year(year: i32) -> Self {
        Self {
            selected_year: Some(year),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    /// Flip one abstract between expanded and collapsed.
    pub fn toggle(&mut self, key: &str) {
        if !self.expanded.remove(key) {
            self.expanded.insert(key.to_string());
        }
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.contains(key)
    }

    pub fn years_to_display<T>(&self, collection: &Collection<T>) -> Vec<i32> {
        collection.grouping().select_year(self.selected_year)
    }

    /// Filter and group the collection for display.
    ///
    /// With a search term, years without matches are hidden. Item order
    /// within each year is unchanged.
    pub fn listing<'a, T>(
        &self,
        collection: &'a Collection<T>,
        fields: &[FieldFn<T>],
    ) -> Listing<'a, T> {
        let needle = self.search_term.to_lowercase();
        let sections: Vec<YearSection<'a, T>> = self
            .years_to_display(collection)
            .into_iter()
            .map(|year| YearSection {
                year,
                items: collection
                    .bucket(year)
                    .iter()
                    .enumerate()
                    .filter(|(_, item)| needle.is_empty() || matches(*item, &needle, fields))
                    .collect(),
            })
            .filter(|section| !section.items.is_empty())
            .collect();

        if !sections.is_empty() {
            return Listing::Sections(sections);
        }
        match (needle.is_empty(), self.selected_year) {
            (false, _) => Listing::NoSearchResults,
            (true, Some(year)) => Listing::NothingForYear(year),
            (true, None) => Listing::Sections(Vec::new()),
        }
    }
}

/// Position in a cyclic carousel of `len` slides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselState {
    pub index: usize,
    pub len: usize,
}

impl CarouselState {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn next(self) -> Self {
        if self.len == 0 {
            return self;
        }
        Self {
            index: (self.index + 1) % self.len,
            ..self
        }
    }

    pub fn prev(self) -> Self {
        if self.len == 0 {
            return self;
        }
        Self {
            index: (self.index + self.len - 1) % self.len,
            ..self
        }
    }

    /// Jump to a slide. Out-of-range targets leave the state unchanged.
    pub fn go_to(self, index: usize) -> Self {
        if index < self.len {
            Self { index, ..self }
        } else {
            self
        }
    }

    /// Current slide, if there are any.
    pub fn current(&self) -> Option<usize> {
        (self.len > 0).then_some(self.index)
    }
}
