//! Shared test utilities for the lab-site test suite.
//!
//! Provides fixture setup, item builders and lookup helpers that panic with
//! a useful message when the thing looked for is missing.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let source = DirSource::new(tmp.path());
//! let roster = assemble_team(Loader::new(&source), &Category::ALL).await;
//!
//! let jane = find_member(&roster, "Jane Doe");
//! assert_eq!(jane.title, "Postdoctoral Fellow");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::pages::{Page, PageSet};
use crate::source::PartialLoadFailure;
use crate::team::TeamRoster;
use crate::types::{NewsItem, Publication, TeamMember};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Builders
// =========================================================================

/// A publication with no abstract, DOI or PMID. `date` is the year.
pub fn publication(title: &str, authors: &[&str], journal: &str, year: i32) -> Publication {
    Publication {
        title: title.to_string(),
        authors: authors.iter().map(|a| a.to_string()).collect(),
        journal: journal.to_string(),
        date: year.to_string(),
        year,
        r#abstract: String::new(),
        doi: None,
        pmid: None,
    }
}

/// An untitled news item with placeholder content. `date` is ISO.
pub fn news_item(date: &str, year: i32) -> NewsItem {
    NewsItem {
        date: date.to_string(),
        formatted_date: date.to_string(),
        year,
        content: "<p>Lab news.</p>".to_string(),
        title: None,
        image: None,
    }
}

// =========================================================================
// Lookups
// =========================================================================

/// Find the failure recorded for a resource path.
pub fn find_failure<'a>(failures: &'a [PartialLoadFailure], resource: &str) -> &'a PartialLoadFailure {
    failures
        .iter()
        .find(|f| f.resource == resource)
        .unwrap_or_else(|| {
            let recorded: Vec<&str> = failures.iter().map(|f| f.resource.as_str()).collect();
            panic!("no failure for '{resource}'. Recorded: {recorded:?}")
        })
}

/// Find a team member by name across all categories.
pub fn find_member<'a>(roster: &'a TeamRoster, name: &str) -> &'a TeamMember {
    roster
        .categories
        .iter()
        .flat_map(|(_, members)| members)
        .find(|m| m.name == name)
        .unwrap_or_else(|| {
            let names: Vec<&str> = roster
                .categories
                .iter()
                .flat_map(|(_, members)| members)
                .map(|m| m.name.as_str())
                .collect();
            panic!("member '{name}' not found. Available: {names:?}")
        })
}

/// Find a content page by slug.
pub fn find_page<'a>(set: &'a PageSet, slug: &str) -> &'a Page {
    set.pages.iter().find(|p| p.slug == slug).unwrap_or_else(|| {
        let slugs: Vec<&str> = set.pages.iter().map(|p| p.slug.as_str()).collect();
        panic!("page '{slug}' not found. Available: {slugs:?}")
    })
}
