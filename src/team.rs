//! Team roster assembly.
//!
//! The roster is stored as one directory per category, each with an ordered
//! manifest and one plain-text record per member:
//!
//! ```text
//! data/team/
//! ├── principal-investigator/
//! │   ├── index.json          # ["jane-doe.txt"]
//! │   ├── jane-doe.txt        # positional record
//! │   └── jane-doe.jpg        # optional photo
//! └── postdocs/
//!     ├── index.json
//!     └── ...
//! ```
//!
//! ## Record Format
//!
//! A record is up to four paragraphs separated by blank lines:
//!
//! ```text
//! Jane Doe
//!
//! Postdoctoral Fellow
//!
//! Aging biology, selenoproteins
//!
//! https://scholar.google.com/citations?user=abc
//! ```
//!
//! Paragraph 0 is the name, then title, research interests and scholar link.
//! Missing trailing paragraphs are empty; extra ones are ignored.
//!
//! ## Failure Isolation
//!
//! Categories and members are fetched concurrently. One unreadable record or
//! manifest is logged and recorded in [`TeamRoster::failures`]; everything
//! else still loads. A category without a manifest is simply absent.

use crate::source::{LoadError, Loader, PartialLoadFailure};
use crate::types::{Category, TeamMember};
use futures::future::join_all;
use tracing::{debug, warn};

/// The four positional fields of a member record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemberRecord {
    pub name: String,
    pub title: String,
    pub interests: String,
    pub scholar: String,
}

/// Assembled roster, categories in caller order.
#[derive(Debug, Default)]
pub struct TeamRoster {
    /// Only categories with at least one member.
    pub categories: Vec<(Category, Vec<TeamMember>)>,
    pub failures: Vec<PartialLoadFailure>,
}

impl TeamRoster {
    pub fn members(&self, category: Category) -> &[TeamMember] {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, members)| members.as_slice())
            .unwrap_or(&[])
    }

    /// Total members across all categories.
    pub fn len(&self) -> usize {
        self.categories.iter().map(|(_, m)| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Directory holding one category's manifest, records and photos.
pub fn category_dir(category: Category) -> String {
    format!("data/team/{}", category.key())
}

/// Split a record into its positional paragraphs.
///
/// Line endings are normalized first, so CRLF records parse the same as LF.
/// `path` is only used in the error for an empty record.
pub fn parse_member_record(path: &str, text: &str) -> Result<MemberRecord, LoadError> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in normalized.trim().lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    let mut fields = paragraphs.into_iter();
    let name = fields
        .next()
        .ok_or_else(|| LoadError::malformed(path, "empty member record"))?;
    Ok(MemberRecord {
        name,
        title: fields.next().unwrap_or_default(),
        interests: fields.next().unwrap_or_default(),
        scholar: fields.next().unwrap_or_default(),
    })
}

/// Load every requested category.
///
/// Never fails as a whole: per-item failures are collected on the roster.
pub async fn assemble_team(loader: Loader<'_>, categories: &[Category]) -> TeamRoster {
    let loads = join_all(categories.iter().map(|c| load_category(loader, *c))).await;

    let mut roster = TeamRoster::default();
    for (category, (members, failures)) in categories.iter().zip(loads) {
        roster.failures.extend(failures);
        if members.is_empty() {
            debug!(category = %category, "no members, omitting category");
            continue;
        }
        roster.categories.push((*category, members));
    }
    roster
}

async fn load_category(
    loader: Loader<'_>,
    category: Category,
) -> (Vec<TeamMember>, Vec<PartialLoadFailure>) {
    let manifest_path = format!("{}/index.json", category_dir(category));
    let files = match loader.load_manifest(&manifest_path).await {
        Ok(files) => files,
        Err(e) if e.is_not_found() => {
            debug!(category = %category, "no manifest");
            return (Vec::new(), Vec::new());
        }
        Err(e) => {
            warn!(category = %category, error = %e, "skipping team category");
            return (Vec::new(), vec![PartialLoadFailure::new(e)]);
        }
    };

    let mut results = join_all(files.iter().enumerate().map(|(index, file)| async move {
        (index, load_member(loader, category, file).await)
    }))
    .await;
    results.sort_by_key(|(index, _)| *index);

    let mut members = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (_, result) in results {
        match result {
            Ok(member) => members.push(member),
            Err(e) => {
                warn!(category = %category, error = %e, "skipping team member");
                failures.push(PartialLoadFailure::new(e));
            }
        }
    }
    debug!(category = %category, members = members.len(), "loaded team category");
    (members, failures)
}

async fn load_member(
    loader: Loader<'_>,
    category: Category,
    file: &str,
) -> Result<TeamMember, LoadError> {
    let dir = category_dir(category);
    let path = format!("{dir}/{file}");
    let text = loader.load_text(&path).await?;
    let record = parse_member_record(&path, &text)?;

    let base = file.strip_suffix(".txt").unwrap_or(file);
    let photo = loader
        .resolve_optional(&format!("{dir}/{base}.jpg"))
        .await
        .map(|r| r.url);

    Ok(TeamMember {
        name: record.name,
        title: record.title,
        interests: record.interests,
        scholar: record.scholar,
        photo,
        category,
    })
}
