//! Filename parsing for the NNN-name convention.
//!
//! Content pages under `pages/` carry an optional numeric prefix (`NNN-`)
//! that orders them in the navigation bar, followed by the slug:
//!
//! - `010-research.md` → position 10, slug `research`, label "research"
//! - `055-open-positions.md` → position 55, slug `open-positions`, label "open positions"
//! - `home.md` → unnumbered, slug `home` (not listed in navigation)
//!
//! The built-in sections (team, publications, news) hold fixed positions in
//! the same numbering space, so pages can be placed between them.

/// Result of parsing a numbered entry name like `010-research`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Number prefix if present (`10` from `010-research`).
    pub number: Option<u32>,
    /// Name part after `NNN-`, dashes preserved. Empty if number-only.
    /// For unnumbered entries, this is the full input.
    pub name: String,
    /// Display label: name with dashes converted to spaces.
    pub display_title: String,
}

/// Parse an entry name following the `NNN-name` convention.
///
/// - `"010-research"` → number=Some(10), name="research"
/// - `"040-who-we-are"` → number=Some(40), name="who-we-are", display_title="who we are"
/// - `"001"` / `"001-"` → number=Some(1), name=""
/// - `"home"` → number=None, name="home"
pub fn parse_entry_name(name: &str) -> ParsedName {
    if let Some((prefix, rest)) = name.split_once('-') {
        if let Ok(num) = prefix.parse::<u32>() {
            return ParsedName {
                number: Some(num),
                name: rest.to_string(),
                display_title: rest.replace('-', " "),
            };
        }
    }
    if let Ok(num) = name.parse::<u32>() {
        return ParsedName {
            number: Some(num),
            name: String::new(),
            display_title: String::new(),
        };
    }
    ParsedName {
        number: None,
        name: name.to_string(),
        display_title: name.replace('-', " "),
    }
}
