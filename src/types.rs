//! Content types shared by loading, searching and rendering.
//!
//! Publications and news items are deserialized straight from the collection
//! documents (`publications.json`, `news.json`). Team members are assembled
//! from per-member text records by [`crate::team`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A journal article, as produced by the publications harvester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,
    /// Citation order.
    pub authors: Vec<String>,
    pub journal: String,
    /// Raw publication date text (`2024-Mar`, `2023 Nov-Dec`, ...).
    pub date: String,
    /// Bucketing year. Redundant with `date`.
    pub year: i32,
    #[serde(default)]
    pub r#abstract: String,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub pmid: Option<String>,
}

impl Publication {
    /// Stable identity for abstract toggles: the DOI when present, otherwise
    /// the item's position within its year bucket.
    pub fn toggle_key(&self, index: usize) -> String {
        match self.doi.as_deref() {
            Some(doi) if !doi.is_empty() => doi.to_string(),
            _ => format!("pub-{}-{}", self.year, index),
        }
    }

    pub fn doi_url(&self) -> Option<String> {
        self.doi
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| format!("https://doi.org/{d}"))
    }

    pub fn pubmed_url(&self) -> Option<String> {
        self.pmid
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("https://pubmed.ncbi.nlm.nih.gov/{p}/"))
    }

    /// Author line for compact listings: first three, then "et al.".
    pub fn short_authors(&self) -> String {
        let shown = self.authors.iter().take(3).cloned().collect::<Vec<_>>();
        if self.authors.len() > 3 {
            format!("{}, et al.", shown.join(", "))
        } else {
            shown.join(", ")
        }
    }
}

/// A dated news post. `content` is trusted, lab-authored HTML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// ISO date (`2024-03-05`).
    pub date: String,
    /// Display date (`March 05, 2024`).
    pub formatted_date: String,
    pub year: i32,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Team roster categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    PrincipalInvestigator,
    Instructors,
    Postdocs,
    ResearchFellows,
    PhdStudents,
    MastersStudents,
    AdministrativeStaff,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::PrincipalInvestigator,
        Category::Instructors,
        Category::Postdocs,
        Category::ResearchFellows,
        Category::PhdStudents,
        Category::MastersStudents,
        Category::AdministrativeStaff,
    ];

    /// Directory name under `data/team/`.
    pub fn key(self) -> &'static str {
        match self {
            Category::PrincipalInvestigator => "principal-investigator",
            Category::Instructors => "instructors",
            Category::Postdocs => "postdocs",
            Category::ResearchFellows => "research-fellows",
            Category::PhdStudents => "phd-students",
            Category::MastersStudents => "masters-students",
            Category::AdministrativeStaff => "administrative-staff",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::PrincipalInvestigator => "Principal Investigator",
            Category::Instructors => "Instructors",
            Category::Postdocs => "Postdocs",
            Category::ResearchFellows => "Research Fellows",
            Category::PhdStudents => "PhD Students",
            Category::MastersStudents => "Masters Students",
            Category::AdministrativeStaff => "Administrative Staff",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| format!("unknown team category: {s}"))
    }
}

/// A lab member, assembled from `data/team/<category>/<name>.txt`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMember {
    pub name: String,
    pub title: String,
    pub interests: String,
    /// Raw scholar-profile text; may be empty or not a URL.
    pub scholar: String,
    /// Public URL of the companion photo, if one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub category: Category,
}

impl TeamMember {
    /// The scholar profile link, only if it is an absolute http(s) URL.
    pub fn scholar_url(&self) -> Option<&str> {
        let raw = self.scholar.trim();
        let parsed = url::Url::parse(raw).ok()?;
        (matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some())
            .then_some(raw)
    }
}
