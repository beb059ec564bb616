//! Fetching remote resources
//!
//! A [`Fetcher`] issues a single GET for a resource and hands back the body
//! decoded in the requested [`Shape`]. There is no caching and no retry: the
//! request either settles or fails.

use serde_json::Value;
use std::future::Future;
use thiserror::Error;
use url::Url;

/// How a response body should be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Json,
    Text,
}

/// A decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Json(Value),
    Text(String),
}

impl Fetched {
    /// Take the body as JSON, parsing it if it was fetched as text
    pub fn into_json(self) -> Result<Value, serde_json::Error> {
        match self {
            Fetched::Json(value) => Ok(value),
            Fetched::Text(text) => serde_json::from_str(&text),
        }
    }

    /// Take the body as text
    pub fn into_text(self) -> String {
        match self {
            Fetched::Text(text) => text,
            Fetched::Json(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid resource '{resource}': {reason}")]
    InvalidResource { resource: String, reason: String },

    #[error("request to {url} failed: {source}")]
    NetworkUnavailable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {code}")]
    HttpStatus { url: String, code: u16 },

    #[error("failed to decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// HTTP status code, if the server answered with a non-success status
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Source of remote content.
///
/// Implementations issue exactly one request per call and must not retry.
pub trait Fetcher: Send + Sync {
    fn fetch(
        &self,
        resource: &str,
        shape: Shape,
    ) -> impl Future<Output = Result<Fetched, FetchError>> + Send;
}

/// Fetcher backed by `reqwest`, resolving relative resources against a base URL
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base: Url,
}

impl HttpFetcher {
    /// Create a fetcher for the given base URL
    pub fn new(base: &str) -> Result<Self, FetchError> {
        let base = Url::parse(base).map_err(|e| FetchError::InvalidResource {
            resource: base.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    /// The base URL relative resources resolve against
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve a resource the way a browser resolves a link on the base page
    pub fn resolve(&self, resource: &str) -> Result<Url, FetchError> {
        if resource.trim().is_empty() {
            return Err(FetchError::InvalidResource {
                resource: resource.to_string(),
                reason: "resource is empty".to_string(),
            });
        }

        self.base
            .join(resource)
            .map_err(|e| FetchError::InvalidResource {
                resource: resource.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, resource: &str, shape: Shape) -> Result<Fetched, FetchError> {
        let url = self.resolve(resource)?;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::NetworkUnavailable {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                code: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::NetworkUnavailable {
                url: url.to_string(),
                source,
            })?;

        decode(url.as_str(), &body, shape)
    }
}

/// UTF-8 byte order mark
const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode a response body the way browsers do: a leading byte order mark is
/// dropped and text is decoded lossily.
fn decode(url: &str, body: &[u8], shape: Shape) -> Result<Fetched, FetchError> {
    let body = body.strip_prefix(BOM).unwrap_or(body);

    match shape {
        Shape::Json => serde_json::from_slice(body)
            .map(Fetched::Json)
            .map_err(|source| FetchError::Decode {
                url: url.to_string(),
                source,
            }),
        Shape::Text => Ok(Fetched::Text(String::from_utf8_lossy(body).into_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    async fn spawn_site(dir: &Path) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = crate::server::router(dir.to_path_buf());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let fetcher = HttpFetcher::new("http://example.com/blog/index.html").unwrap();
        assert_eq!(
            fetcher.resolve("posts.json").unwrap().as_str(),
            "http://example.com/blog/posts.json"
        );
        assert_eq!(
            fetcher.resolve("/about.md").unwrap().as_str(),
            "http://example.com/about.md"
        );
        assert_eq!(
            fetcher.resolve("https://cdn.example.org/x.md").unwrap().as_str(),
            "https://cdn.example.org/x.md"
        );
    }

    #[test]
    fn test_empty_resource_is_rejected() {
        let fetcher = HttpFetcher::new("http://example.com/").unwrap();
        assert!(matches!(
            fetcher.resolve("  "),
            Err(FetchError::InvalidResource { .. })
        ));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpFetcher::new("not a url"),
            Err(FetchError::InvalidResource { .. })
        ));
    }

    #[test]
    fn test_fetched_conversions() {
        let text = Fetched::Text(r#"[{"path":"/p1","title":"Hello"}]"#.to_string());
        let value = text.into_json().unwrap();
        assert_eq!(value[0]["title"], "Hello");

        assert!(Fetched::Text("nope".to_string()).into_json().is_err());
        assert_eq!(Fetched::Json(serde_json::json!([1, 2])).into_text(), "[1,2]");
    }

    #[tokio::test]
    async fn test_fetch_json_and_text() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("posts.json"),
            r#"[{"path":"/p1","title":"Hello"}]"#,
        )
        .unwrap();
        fs::write(dir.path().join("about.md"), "# Title").unwrap();

        let fetcher = HttpFetcher::new(&spawn_site(dir.path()).await).unwrap();

        let posts = fetcher.fetch("posts.json", Shape::Json).await.unwrap();
        assert_eq!(
            posts,
            Fetched::Json(serde_json::json!([{"path": "/p1", "title": "Hello"}]))
        );

        let about = fetcher.fetch("about.md", Shape::Text).await.unwrap();
        assert_eq!(about, Fetched::Text("# Title".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_strips_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("posts.json"),
            "\u{feff}[{\"path\":\"/p1\",\"title\":\"Hello\"}]",
        )
        .unwrap();
        fs::write(dir.path().join("about.md"), "\u{feff}# Title").unwrap();

        let fetcher = HttpFetcher::new(&spawn_site(dir.path()).await).unwrap();

        let posts = fetcher.fetch("posts.json", Shape::Json).await.unwrap();
        assert_eq!(
            posts,
            Fetched::Json(serde_json::json!([{"path": "/p1", "title": "Hello"}]))
        );

        let about = fetcher.fetch("about.md", Shape::Text).await.unwrap();
        assert_eq!(about, Fetched::Text("# Title".to_string()));
        assert_eq!(
            crate::content::MarkdownRenderer::new().render(&about.into_text()),
            "<h1>Title</h1>\n"
        );
    }

    #[test]
    fn test_decode_keeps_inner_byte_order_mark() {
        let body = "a\u{feff}b".as_bytes();
        assert_eq!(
            decode("x", body, Shape::Text).unwrap(),
            Fetched::Text("a\u{feff}b".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_missing_resource_reports_status() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = HttpFetcher::new(&spawn_site(dir.path()).await).unwrap();

        let err = fetcher.fetch("missing.json", Shape::Json).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_fetch_undecodable_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("posts.json"), "{ not json").unwrap();
        let fetcher = HttpFetcher::new(&spawn_site(dir.path()).await).unwrap();

        let err = fetcher.fetch("posts.json", Shape::Json).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = HttpFetcher::new(&format!("http://{}/", addr)).unwrap();
        let err = fetcher.fetch("posts.json", Shape::Json).await.unwrap_err();
        assert!(matches!(err, FetchError::NetworkUnavailable { .. }));
    }
}
