//! Content loading.
//!
//! Every page of the site is built from static resources: JSON collections,
//! per-member text records, filename manifests and optional companion images.
//! This module fetches those resources from a [`ContentSource`] and parses
//! them into typed values.
//!
//! ## Sources
//!
//! - [`DirSource`]: a local content directory (the usual case for `build`)
//! - [`HttpSource`]: an already-published site, fetched over HTTP
//!
//! Both speak the same relative paths (`publications.json`,
//! `data/team/postdocs/index.json`, ...). A leading `/` is accepted so that
//! paths can be copied straight from the generated HTML.
//!
//! ## Failure Taxonomy
//!
//! | Variant | Meaning | Page state |
//! |---------|---------|------------|
//! | [`LoadError::NotFound`] | resource absent (missing file, HTTP 404) | empty ("no data") |
//! | [`LoadError::Malformed`] | present, but not the expected shape | error banner |
//! | [`LoadError::Unavailable`] | any other transport failure | error banner |
//!
//! Normal absence of optional companions (team photos, news images) never
//! surfaces as an error: [`Loader::resolve_optional`] returns `Option`.
//!
//! There is no caching layer. Each run re-fetches everything.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Malformed content in {path}: {reason}")]
    Malformed { path: String, reason: String },
    #[error("Could not fetch {path}: {reason}")]
    Unavailable { path: String, reason: String },
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound(_))
    }

    /// The resource path the error refers to.
    pub fn path(&self) -> &str {
        match self {
            LoadError::NotFound(path) => path,
            LoadError::Malformed { path, .. } | LoadError::Unavailable { path, .. } => path,
        }
    }

    pub(crate) fn malformed(path: &str, reason: impl ToString) -> Self {
        LoadError::Malformed {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    fn unavailable(path: &str, reason: impl ToString) -> Self {
        LoadError::Unavailable {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// One failed item of a batch load. The rest of the batch is unaffected.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialLoadFailure {
    pub resource: String,
    pub error: LoadError,
}

impl PartialLoadFailure {
    pub fn new(error: LoadError) -> Self {
        Self {
            resource: error.path().to_string(),
            error,
        }
    }
}

/// A place static content can be read from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the raw bytes of a resource.
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError>;

    /// Probe for a resource without reading it.
    async fn exists(&self, path: &str) -> bool;

    /// URL under which generated pages reference the resource.
    fn public_url(&self, path: &str) -> String;

    /// Root directory for sources backed by the local filesystem.
    fn local_root(&self) -> Option<&Path> {
        None
    }

    /// Human-readable description for CLI output.
    fn describe(&self) -> String;
}

/// Normalize a resource path: strip leading slashes, drop empty and `.`
/// segments, reject `..`.
pub fn normalize_path(path: &str) -> Option<String> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

// ============================================================================
// Directory source
// ============================================================================

/// Content stored in a local directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, LoadError> {
        normalize_path(path)
            .map(|p| self.root.join(p))
            .ok_or_else(|| LoadError::NotFound(path.to_string()))
    }
}

#[async_trait]
impl ContentSource for DirSource {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        let full = self.resolve(path)?;
        debug!(path, file = %full.display(), "reading");
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(LoadError::NotFound(path.to_string()))
            }
            Err(e) => Err(LoadError::unavailable(path, e)),
        }
    }

    async fn exists(&self, path: &str) -> bool {
        let Ok(full) = self.resolve(path) else {
            return false;
        };
        tokio::fs::metadata(&full)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    fn public_url(&self, path: &str) -> String {
        format!("/{}", normalize_path(path).unwrap_or_default())
    }

    fn local_root(&self) -> Option<&Path> {
        Some(&self.root)
    }

    fn describe(&self) -> String {
        format!("{}/", self.root.display())
    }
}

// ============================================================================
// HTTP source
// ============================================================================

/// Content served from a web origin.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base: Url,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source rooted at `base`. Relative paths are resolved under
    /// it, so `https://lab.example.org/site` serves `site/publications.json`.
    pub fn new(base: &str, timeout: Option<Duration>) -> Result<Self, LoadError> {
        let mut url = Url::parse(base).map_err(|e| LoadError::unavailable(base, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(LoadError::unavailable(base, "only http and https are supported"));
        }
        if !url.path().ends_with('/') {
            let with_slash = format!("{}/", url.path());
            url.set_path(&with_slash);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LoadError::unavailable(base, e))?;

        Ok(Self { base: url, client })
    }

    /// Absolute URL of a resource.
    pub fn resource_url(&self, path: &str) -> Result<Url, LoadError> {
        let normalized =
            normalize_path(path).ok_or_else(|| LoadError::NotFound(path.to_string()))?;
        self.base
            .join(&normalized)
            .map_err(|e| LoadError::unavailable(path, e))
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        let url = self.resource_url(path)?;
        debug!(path, %url, "fetching");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::unavailable(path, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LoadError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(LoadError::unavailable(path, format!("HTTP {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LoadError::unavailable(path, e))?;
        Ok(body.to_vec())
    }

    async fn exists(&self, path: &str) -> bool {
        let Ok(url) = self.resource_url(path) else {
            return false;
        };
        match self.client.head(url.clone()).send().await {
            Ok(r) if r.status() == StatusCode::METHOD_NOT_ALLOWED => {}
            Ok(r) => return r.status().is_success(),
            Err(e) => {
                debug!(path, error = %e, "existence check failed");
                return false;
            }
        }
        // Host refuses HEAD; check with GET instead.
        self.client
            .get(url)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn public_url(&self, path: &str) -> String {
        self.resource_url(path)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| path.to_string())
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

// ============================================================================
// Typed loading
// ============================================================================

/// A resolved optional companion resource (photo, news image).
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// Path relative to the content root.
    pub path: String,
    /// URL for use in generated pages.
    pub url: String,
}

/// Typed access to a [`ContentSource`].
#[derive(Clone, Copy)]
pub struct Loader<'a> {
    source: &'a dyn ContentSource,
}

impl<'a> Loader<'a> {
    pub fn new(source: &'a dyn ContentSource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &'a dyn ContentSource {
        self.source
    }

    pub fn public_url(&self, path: &str) -> String {
        self.source.public_url(path)
    }

    /// Load a resource as UTF-8 text.
    pub async fn load_text(&self, path: &str) -> Result<String, LoadError> {
        let bytes = self.source.fetch(path).await?;
        String::from_utf8(bytes).map_err(|e| LoadError::malformed(path, e))
    }

    /// Load and deserialize a JSON document.
    ///
    /// Missing required fields are reported as [`LoadError::Malformed`]
    /// rather than silently defaulted.
    pub async fn load_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, LoadError> {
        let bytes = self.source.fetch(path).await?;
        serde_json::from_slice(&bytes).map_err(|e| LoadError::malformed(path, e))
    }

    /// Load an `index.json` manifest: an ordered list of filenames.
    pub async fn load_manifest(&self, path: &str) -> Result<Vec<String>, LoadError> {
        self.load_json(path).await
    }

    /// Probe for an optional companion resource.
    ///
    /// Absence is the normal case for many entries and is never an error.
    pub async fn resolve_optional(&self, path: &str) -> Option<Resource> {
        if self.source.exists(path).await {
            Some(Resource {
                path: path.to_string(),
                url: self.source.public_url(path),
            })
        } else {
            None
        }
    }

    /// Try each candidate in order, returning the first that exists.
    pub async fn resolve_first(&self, candidates: &[String]) -> Option<Resource> {
        for candidate in candidates {
            if let Some(resource) = self.resolve_optional(candidate).await {
                return Some(resource);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::fs;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Doc {
        name: String,
        count: u32,
    }

    fn source_with(files: &[(&str, &str)]) -> (TempDir, DirSource) {
        let tmp = TempDir::new().unwrap();
        for (path, content) in files {
            let full = tmp.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        let source = DirSource::new(tmp.path());
        (tmp, source)
    }

    #[test]
    fn normalize_strips_leading_slash() {
        assert_eq!(
            normalize_path("/data/team/index.json").as_deref(),
            Some("data/team/index.json")
        );
    }

    #[test]
    fn normalize_collapses_empty_and_dot_segments() {
        assert_eq!(normalize_path("data//./x.txt").as_deref(), Some("data/x.txt"));
    }

    #[test]
    fn normalize_rejects_parent_segments() {
        assert_eq!(normalize_path("data/../../etc/passwd"), None);
        assert_eq!(normalize_path("/"), None);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let (_tmp, source) = source_with(&[]);
        let err = Loader::new(&source)
            .load_text("news.json")
            .await
            .unwrap_err();
        assert_eq!(err, LoadError::NotFound("news.json".to_string()));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn parent_traversal_is_not_found() {
        let (_tmp, source) = source_with(&[]);
        let err = source.fetch("../secret").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn load_json_parses_document() {
        let (_tmp, source) = source_with(&[("doc.json", r#"{"name": "x", "count": 3}"#)]);
        let doc: Doc = Loader::new(&source).load_json("/doc.json").await.unwrap();
        assert_eq!(doc.name, "x");
        assert_eq!(doc.count, 3);
    }

    #[tokio::test]
    async fn load_json_missing_field_is_malformed() {
        let (_tmp, source) = source_with(&[("doc.json", r#"{"name": "x"}"#)]);
        let err = Loader::new(&source)
            .load_json::<Doc>("doc.json")
            .await
            .unwrap_err();
        match err {
            LoadError::Malformed { path, reason } => {
                assert_eq!(path, "doc.json");
                assert!(reason.contains("count"), "reason: {reason}");
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn load_json_invalid_syntax_is_malformed() {
        let (_tmp, source) = source_with(&[("doc.json", "{not json")]);
        let err = Loader::new(&source)
            .load_json::<Doc>("doc.json")
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    #[tokio::test]
    async fn load_text_rejects_invalid_utf8() {
        let (tmp, source) = source_with(&[]);
        fs::write(tmp.path().join("bad.txt"), [0xff, 0xfe, 0x00]).unwrap();
        let err = Loader::new(&source).load_text("bad.txt").await.unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    #[tokio::test]
    async fn load_manifest_preserves_order() {
        let (_tmp, source) = source_with(&[(
            "data/team/postdocs/index.json",
            r#"["zoe.txt", "adam.txt"]"#,
        )]);
        let files = Loader::new(&source)
            .load_manifest("data/team/postdocs/index.json")
            .await
            .unwrap();
        assert_eq!(files, vec!["zoe.txt", "adam.txt"]);
    }

    #[tokio::test]
    async fn resolve_optional_present_and_absent() {
        let (_tmp, source) = source_with(&[("data/team/pi/jane.jpg", "fake image")]);
        let loader = Loader::new(&source);

        let photo = loader.resolve_optional("data/team/pi/jane.jpg").await;
        assert_eq!(
            photo,
            Some(Resource {
                path: "data/team/pi/jane.jpg".to_string(),
                url: "/data/team/pi/jane.jpg".to_string(),
            })
        );
        assert_eq!(loader.resolve_optional("data/team/pi/john.jpg").await, None);
    }

    #[tokio::test]
    async fn resolve_optional_ignores_directories() {
        let (tmp, source) = source_with(&[]);
        fs::create_dir_all(tmp.path().join("data/photo.jpg")).unwrap();
        assert_eq!(Loader::new(&source).resolve_optional("data/photo.jpg").await, None);
    }

    #[tokio::test]
    async fn resolve_first_takes_first_existing_candidate() {
        let (_tmp, source) = source_with(&[
            ("data/news/01-02-24.png", "png"),
            ("data/news/01-02-24.webp", "webp"),
        ]);
        let candidates: Vec<String> = ["jpg", "png", "webp"]
            .iter()
            .map(|ext| format!("data/news/01-02-24.{ext}"))
            .collect();
        let found = Loader::new(&source).resolve_first(&candidates).await.unwrap();
        assert_eq!(found.path, "data/news/01-02-24.png");
    }

    #[test]
    fn dir_source_public_url_is_site_absolute() {
        let source = DirSource::new("content");
        assert_eq!(source.public_url("data/x.jpg"), "/data/x.jpg");
        assert_eq!(source.public_url("/data/x.jpg"), "/data/x.jpg");
    }

    // =========================================================================
    // HTTP source (URL construction only, no network)
    // =========================================================================

    #[test]
    fn http_source_joins_under_base_path() {
        let source = HttpSource::new("https://lab.example.org/site", None).unwrap();
        let url = source.resource_url("publications.json").unwrap();
        assert_eq!(url.as_str(), "https://lab.example.org/site/publications.json");
    }

    #[test]
    fn http_source_leading_slash_stays_under_base() {
        let source = HttpSource::new("https://lab.example.org/site/", None).unwrap();
        let url = source.resource_url("/data/team/postdocs/index.json").unwrap();
        assert_eq!(
            url.as_str(),
            "https://lab.example.org/site/data/team/postdocs/index.json"
        );
    }

    #[test]
    fn http_source_rejects_other_schemes() {
        assert!(HttpSource::new("ftp://lab.example.org/", None).is_err());
        assert!(HttpSource::new("not a url", None).is_err());
    }

    #[test]
    fn http_source_public_url_is_absolute() {
        let source = HttpSource::new("https://lab.example.org", None).unwrap();
        assert_eq!(
            source.public_url("data/team/pi/jane.jpg"),
            "https://lab.example.org/data/team/pi/jane.jpg"
        );
    }

    // =========================================================================
    // HTTP status mapping
    // =========================================================================

    async fn serve(method_name: &str, route: &str, response: ResponseTemplate, server: &MockServer) {
        Mock::given(method(method_name))
            .and(path(route))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn http_fetch_returns_body() {
        let server = MockServer::start().await;
        serve(
            "GET",
            "/data/team/postdocs/index.json",
            ResponseTemplate::new(200).set_body_string(r#"["jane-doe.txt"]"#),
            &server,
        )
        .await;

        let source = HttpSource::new(&server.uri(), None).unwrap();
        let manifest = Loader::new(&source)
            .load_manifest("data/team/postdocs/index.json")
            .await
            .unwrap();
        assert_eq!(manifest, vec!["jane-doe.txt"]);
    }

    #[tokio::test]
    async fn http_404_is_not_found() {
        let server = MockServer::start().await;
        let source = HttpSource::new(&server.uri(), None).unwrap();

        let err = source.fetch("news.json").await.unwrap_err();
        assert_eq!(err, LoadError::NotFound("news.json".to_string()));
    }

    #[tokio::test]
    async fn http_server_error_is_unavailable() {
        let server = MockServer::start().await;
        serve("GET", "/publications.json", ResponseTemplate::new(500), &server).await;

        let source = HttpSource::new(&server.uri(), None).unwrap();
        let err = source.fetch("publications.json").await.unwrap_err();
        assert!(matches!(err, LoadError::Unavailable { .. }), "{err:?}");
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn http_malformed_json_is_malformed() {
        let server = MockServer::start().await;
        serve(
            "GET",
            "/publications.json",
            ResponseTemplate::new(200).set_body_string("<html>not json</html>"),
            &server,
        )
        .await;

        let source = HttpSource::new(&server.uri(), None).unwrap();
        let err = Loader::new(&source)
            .load_json::<Doc>("publications.json")
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn http_resolve_optional_present_and_absent() {
        let server = MockServer::start().await;
        serve("HEAD", "/data/team/pi/jane.jpg", ResponseTemplate::new(200), &server).await;

        let source = HttpSource::new(&server.uri(), None).unwrap();
        let loader = Loader::new(&source);

        let photo = loader.resolve_optional("data/team/pi/jane.jpg").await.unwrap();
        assert_eq!(photo.path, "data/team/pi/jane.jpg");
        assert_eq!(photo.url, format!("{}/data/team/pi/jane.jpg", server.uri()));
        assert_eq!(loader.resolve_optional("data/team/pi/alex.jpg").await, None);
    }

    #[tokio::test]
    async fn http_exists_retries_with_get_when_head_refused() {
        let server = MockServer::start().await;
        serve("HEAD", "/data/news/03-05-24.jpg", ResponseTemplate::new(405), &server).await;
        serve("GET", "/data/news/03-05-24.jpg", ResponseTemplate::new(200), &server).await;
        serve("HEAD", "/data/news/01-15-24.jpg", ResponseTemplate::new(405), &server).await;

        let source = HttpSource::new(&server.uri(), None).unwrap();
        assert!(source.exists("data/news/03-05-24.jpg").await);
        assert!(!source.exists("data/news/01-15-24.jpg").await);
    }
}
