//! # Lab Site
//!
//! A static site generator for a research lab: home page, team roster,
//! publications and news, plus free-form markdown pages.
//!
//! # Architecture: Load, Derive, Render
//!
//! Every page is built from static content files. The same relative paths are
//! served by a local content directory or an already-published site:
//!
//! ```text
//! 1. Load     source   →  typed collections      (publications, news, team, pages)
//! 2. Derive   content  →  page state + view      (empty / failed / loaded, year, search)
//! 3. Render   state    →  dist/                  (pure maud functions, then file writes)
//! ```
//!
//! Loading never aborts on one bad resource. A missing collection renders as
//! "no data", a malformed one as an error banner, and an unreadable team
//! record is reported while the rest of the roster renders.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`source`] | Content sources (directory, HTTP), the failure taxonomy, typed loading |
//! | [`collection`] | Year-bucketed collection documents (`publications.json`, `news.json`) |
//! | [`grouping`] | Ordered year buckets and year selection |
//! | [`team`] | Team roster assembly from per-member text records and manifests |
//! | [`news`] | Compiles dated markdown posts into the news collection |
//! | [`search`] | Case-insensitive substring search over configurable fields |
//! | [`view`] | Explicit page state, collection view and carousel state |
//! | [`pages`] | Markdown content pages |
//! | [`generate`] | Loads everything and renders the HTML site using Maud |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Content types shared by loading and rendering |
//! | [`naming`] | `NNN-name` filename convention parser for pages |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Static Content, Two Sources
//!
//! There is no server-side code and no database. The publications harvester
//! and the news compiler write JSON documents next to the team records, and
//! the generator reads them back. Reading through [`source::ContentSource`]
//! lets `check` and `search` run against either a working copy or the live
//! site with identical results.
//!
//! ## Explicit View State
//!
//! Selected year, search term and expanded abstracts live in
//! [`view::CollectionView`]; render functions take it as an argument. The
//! same filtering drives per-year pages, the `search` command and the
//! in-page search box (through `data-search` attributes).
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system. Interpolation is auto-escaped; the only raw HTML is
//! lab-authored news content and rendered markdown.

pub mod collection;
pub mod config;
pub mod generate;
pub mod grouping;
pub mod naming;
pub mod news;
pub mod output;
pub mod pages;
pub mod search;
pub mod source;
pub mod team;
pub mod types;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
