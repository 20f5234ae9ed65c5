//! Site configuration.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root and is layered over stock defaults, so it only needs the
//! keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "Research Lab"
//! tagline = ""
//! footer = ""
//!
//! [home]
//! recent_publications = 5   # publications listed on the home page
//! recent_news = 5           # news items listed on the home page
//!
//! [team]
//! categories = ["principal-investigator", "instructors", "postdocs",
//!               "research-fellows", "phd-students", "masters-students",
//!               "administrative-staff"]
//!
//! [fetch]
//! # timeout_secs = 10       # per-request timeout for --url sources
//!
//! [[research_areas]]        # home page carousel, none by default
//! title = "Aging Biology"
//! description = "Why do we age?"
//! image = "assets/research/aging.jpg"
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#1a1a1a"
//! text_muted = "#5f6368"
//! border = "#e0e0e0"
//! link = "#1a5fb4"
//! link_hover = "#0b3d91"
//! accent = "#1a5fb4"
//!
//! [colors.dark]
//! background = "#121212"
//! text = "#eeeeee"
//! text_muted = "#a0a0a0"
//! border = "#333333"
//! link = "#8ab4f8"
//! link_hover = "#c6dafc"
//! accent = "#8ab4f8"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Lab name, shown in the header and page titles.
    pub title: String,
    /// One-line description under the title on the home page.
    pub tagline: String,
    /// Footer text (affiliation, address).
    pub footer: String,
    pub home: HomeConfig,
    pub team: TeamConfig,
    pub fetch: FetchConfig,
    /// Slides for the home page research carousel.
    pub research_areas: Vec<ResearchArea>,
    pub colors: ColorConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Research Lab".to_string(),
            tagline: String::new(),
            footer: String::new(),
            home: HomeConfig::default(),
            team: TeamConfig::default(),
            fetch: FetchConfig::default(),
            research_areas: Vec::new(),
            colors: ColorConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate values that deserialize fine but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::Validation("title must not be empty".into()));
        }
        if self.home.recent_publications == 0 || self.home.recent_news == 0 {
            return Err(ConfigError::Validation(
                "home.recent_publications and home.recent_news must be at least 1".into(),
            ));
        }
        let distinct: BTreeSet<Category> = self.team.categories.iter().copied().collect();
        if distinct.len() != self.team.categories.len() {
            return Err(ConfigError::Validation(
                "team.categories must not repeat a category".into(),
            ));
        }
        if self.fetch.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "fetch.timeout_secs must be positive".into(),
            ));
        }
        if let Some(i) = self
            .research_areas
            .iter()
            .position(|a| a.title.trim().is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "research_areas[{i}].title must not be empty"
            )));
        }
        Ok(())
    }
}

/// Home page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomeConfig {
    /// Number of most recent publications listed.
    pub recent_publications: usize,
    /// Number of most recent news items listed.
    pub recent_news: usize,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            recent_publications: 5,
            recent_news: 5,
        }
    }
}

/// Team page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TeamConfig {
    /// Categories to show, in display order.
    pub categories: Vec<Category>,
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            categories: Category::ALL.to_vec(),
        }
    }
}

/// Remote content fetching.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Per-request timeout for HTTP sources. No timeout when absent.
    pub timeout_secs: Option<u64>,
}

impl FetchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// One slide of the research carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResearchArea {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Path relative to the content root.
    #[serde(default)]
    pub image: Option<String>,
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Secondary text: dates, journals, author lists.
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
    /// Year selector and carousel highlights.
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#1a1a1a".to_string(),
            text_muted: "#5f6368".to_string(),
            border: "#e0e0e0".to_string(),
            link: "#1a5fb4".to_string(),
            link_hover: "#0b3d91".to_string(),
            accent: "#1a5fb4".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#121212".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#a0a0a0".to_string(),
            border: "#333333".to_string(),
            link: "#8ab4f8".to_string(),
            link_hover: "#c6dafc".to_string(),
            accent: "#8ab4f8".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so an
///   overlay `[[research_areas]]` list replaces the default list.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Lab Site Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the content root (next to publications.json).
# Unknown keys will cause an error.

# Lab name, shown in the header and page titles.
title = "Research Lab"

# One-line description shown under the title on the home page.
tagline = ""

# Footer text, e.g. department and address.
footer = ""

# ---------------------------------------------------------------------------
# Home page
# ---------------------------------------------------------------------------
[home]
# How many of the most recent publications and news items to list.
recent_publications = 5
recent_news = 5

# ---------------------------------------------------------------------------
# Team page
# ---------------------------------------------------------------------------
[team]
# Categories to show, in display order. Each maps to data/team/<category>/.
categories = [
    "principal-investigator",
    "instructors",
    "postdocs",
    "research-fellows",
    "phd-students",
    "masters-students",
    "administrative-staff",
]

# ---------------------------------------------------------------------------
# Fetching (only used with --url)
# ---------------------------------------------------------------------------
[fetch]
# Per-request timeout in seconds. Omit for no timeout.
# timeout_secs = 10

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#1a1a1a"
text_muted = "#5f6368"    # Dates, journals, author lists
border = "#e0e0e0"
link = "#1a5fb4"
link_hover = "#0b3d91"
accent = "#1a5fb4"        # Year selector, carousel

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#121212"
text = "#eeeeee"
text_muted = "#a0a0a0"
border = "#333333"
link = "#8ab4f8"
link_hover = "#c6dafc"
accent = "#8ab4f8"

# ---------------------------------------------------------------------------
# Research carousel on the home page (none by default)
# ---------------------------------------------------------------------------
# [[research_areas]]
# title = "Aging Biology"
# description = "Molecular mechanisms of aging and lifespan control."
# image = "assets/research/aging.jpg"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-link: {light_link};
    --color-link-hover: {light_link_hover};
    --color-accent: {light_accent};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-link: {dark_link};
        --color-link-hover: {dark_link_hover};
        --color-accent: {dark_accent};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_link = colors.light.link,
        light_link_hover = colors.light.link_hover,
        light_accent = colors.light.accent,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_link = colors.dark.link,
        dark_link_hover = colors.dark.link_hover,
        dark_accent = colors.dark.accent,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Research Lab");
        assert_eq!(config.home.recent_publications, 5);
        assert_eq!(config.home.recent_news, 5);
        assert_eq!(config.team.categories, Category::ALL.to_vec());
        assert_eq!(config.fetch.timeout(), None);
        assert!(config.research_areas.is_empty());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
title = "Gladyshev Lab"

[colors.light]
background = "#fafafa"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.title, "Gladyshev Lab");
        assert_eq!(config.colors.light.background, "#fafafa");
        // Defaults preserved
        assert_eq!(config.colors.light.text, "#1a1a1a");
        assert_eq!(config.colors.dark.background, "#121212");
        assert_eq!(config.home.recent_news, 5);
    }

    #[test]
    fn parse_team_categories() {
        let toml = r#"
[team]
categories = ["principal-investigator", "postdocs"]
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            config.team.categories,
            vec![Category::PrincipalInvestigator, Category::Postdocs]
        );
    }

    #[test]
    fn unknown_category_rejected() {
        let toml = r#"
[team]
categories = ["interns"]
"#;
        assert!(toml::from_str::<SiteConfig>(toml).is_err());
    }

    #[test]
    fn parse_research_areas() {
        let toml = r#"
[[research_areas]]
title = "Aging"
description = "Why we age"
image = "assets/aging.jpg"

[[research_areas]]
title = "Selenium"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.research_areas.len(), 2);
        assert_eq!(config.research_areas[0].image.as_deref(), Some("assets/aging.jpg"));
        assert_eq!(config.research_areas[1].description, "");
    }

    #[test]
    fn fetch_timeout_as_duration() {
        let toml = r#"
[fetch]
timeout_secs = 15
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.fetch.timeout(), Some(Duration::from_secs(15)));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title, "Research Lab");
        assert_eq!(config.colors.light.background, "#ffffff");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r##"
tagline = "Aging research"

[home]
recent_news = 3

[colors.dark]
accent = "#ff9800"
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.tagline, "Aging research");
        assert_eq!(config.home.recent_news, 3);
        assert_eq!(config.home.recent_publications, 5);
        assert_eq!(config.colors.dark.accent, "#ff9800");
        assert_eq!(config.colors.dark.background, "#121212");
    }

    #[test]
    fn load_config_from_fixtures() {
        let tmp = crate::test_helpers::setup_fixtures();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title, "Laboratory of Redox Biology");
        assert_eq!(config.research_areas.len(), 2);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // CSS generation tests
    // =========================================================================

    #[test]
    fn generate_css_uses_config_colors() {
        let mut colors = ColorConfig::default();
        colors.light.background = "#f0f0f0".to_string();
        colors.dark.background = "#1a1a1a".to_string();

        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #f0f0f0"));
        assert!(css.contains("--color-bg: #1a1a1a"));
    }

    #[test]
    fn generate_css_includes_all_variables() {
        let css = generate_color_css(&ColorConfig::default());
        for var in [
            "--color-bg:",
            "--color-text:",
            "--color-text-muted:",
            "--color-border:",
            "--color-link:",
            "--color-link-hover:",
            "--color-accent:",
        ] {
            assert!(css.contains(var), "missing {var}");
        }
        assert!(css.contains("@media (prefers-color-scheme: dark)"));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"title = "A""#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"title = "B""#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("title").unwrap().as_str(), Some("B"));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str(
            r##"
[colors.light]
background = "#fff"
text = "#000"
"##,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r##"
[colors.light]
background = "#fafafa"
"##,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let light = merged.get("colors").unwrap().get("light").unwrap();
        assert_eq!(light.get("background").unwrap().as_str(), Some("#fafafa"));
        assert_eq!(light.get("text").unwrap().as_str(), Some("#000"));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str(
            r#"
[team]
categories = ["postdocs", "phd-students"]
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[team]
categories = ["principal-investigator"]
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let categories = merged.get("team").unwrap().get("categories").unwrap();
        assert_eq!(categories.as_array().unwrap().len(), 1);
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[home]
recent_pubs = 3
"#;
        let err = toml::from_str::<SiteConfig>(toml_str).unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let toml_str = r#"
[carousel]
speed = 3
"#;
        assert!(toml::from_str::<SiteConfig>(toml_str).is_err());
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let toml_str = r##"
[colors.light]
bg = "#fff"
"##;
        assert!(toml::from_str::<SiteConfig>(toml_str).is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "subtitle = \"x\"\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_empty_title() {
        let mut config = SiteConfig::default();
        config.title = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn validate_zero_recent_counts() {
        let mut config = SiteConfig::default();
        config.home.recent_news = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_duplicate_categories() {
        let mut config = SiteConfig::default();
        config.team.categories = vec![Category::Postdocs, Category::Postdocs];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("team.categories"));
    }

    #[test]
    fn validate_zero_timeout() {
        let mut config = SiteConfig::default();
        config.fetch.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_untitled_research_area() {
        let mut config = SiteConfig::default();
        config.research_areas.push(ResearchArea {
            title: String::new(),
            description: "x".to_string(),
            image: None,
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("research_areas[0]"));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[home]
recent_publications = 0
"#,
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // resolve_config / load_raw_config tests
    // =========================================================================

    #[test]
    fn load_raw_config_returns_none_when_no_file() {
        let tmp = TempDir::new().unwrap();
        assert!(load_raw_config(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn resolve_config_with_overlay() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[home]
recent_publications = 10
"#,
        )
        .unwrap();
        let config = resolve_config(base, Some(overlay)).unwrap();
        assert_eq!(config.home.recent_publications, 10);
        assert_eq!(config.home.recent_news, 5);
    }

    #[test]
    fn resolve_config_overlay_research_areas() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[[research_areas]]
title = "Aging"
"#,
        )
        .unwrap();
        let config = resolve_config(base, Some(overlay)).unwrap();
        assert_eq!(config.research_areas.len(), 1);
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str(r#"title = """#).unwrap();
        let result = resolve_config(base, Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // stock_config_toml / stock_defaults_value tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.title, defaults.title);
        assert_eq!(config.home.recent_publications, 5);
        assert_eq!(config.team.categories, defaults.team.categories);
        assert_eq!(config.colors.light.accent, defaults.colors.light.accent);
        assert_eq!(config.colors.dark.background, defaults.colors.dark.background);
        assert!(config.research_areas.is_empty());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in ["[home]", "[team]", "[fetch]", "[colors.light]", "[colors.dark]", "[[research_areas]]"] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value().unwrap();
        assert!(val.is_table());
        for key in ["title", "home", "team", "fetch", "colors", "research_areas"] {
            assert!(val.get(key).is_some(), "missing {key}");
        }
    }
}
