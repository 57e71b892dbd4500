//! HTTP implementation of [`FeedBackend`].
//!
//! - `GET {base}/featured` returns a JSON array of items.
//! - `GET {base}/follows?subject=a&subject=b` returns a JSON object of subject to flag.
//! - `PUT {base}/follows/{subject}` follows, `DELETE` unfollows.
//!
//! Follow endpoints are viewer-scoped. Without a viewer token `follows`
//! answers with an empty overlay and `set_follow` fails before any request.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, header};
use url::Url;

use featured_core::{AppConfig, Error, FeaturedItem, OverlayState, SubjectId};

use super::FeedBackend;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "featured/0.1";

/// HTTP backend configuration.
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Base URL of the feed API.
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: featured/0.1).
    pub user_agent: String,
    /// Bearer token for viewer-scoped endpoints.
    pub viewer_token: Option<String>,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            viewer_token: None,
        }
    }
}

impl From<&AppConfig> for HttpBackendConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.backend_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            viewer_token: config.viewer_token.clone(),
        }
    }
}

/// Feed backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: Url,
    viewer_token: Option<String>,
}

impl HttpBackend {
    /// Create a new HTTP backend with the given configuration.
    pub fn new(config: HttpBackendConfig) -> Result<Self, Error> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| Error::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(format!("{} cannot be a base URL", config.base_url)));
        }

        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .build()
            .map_err(|e| Error::Backend(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base_url, viewer_token: config.viewer_token })
    }

    /// Build an endpoint URL by appending path segments to the base URL.
    ///
    /// Segments are percent-encoded, so subject ids can't escape the path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Viewer token for follow endpoints.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if no viewer token is configured.
    pub fn require_viewer_token(&self) -> Result<&str, Error> {
        self.viewer_token
            .as_deref()
            .ok_or_else(|| Error::InvalidInput("viewer token required; set FEATURED_VIEWER_TOKEN".into()))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self.http.request(method, url).header(header::ACCEPT, "application/json");
        match &self.viewer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, Error> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        tracing::debug!("backend response status: {}", status);
        check_status(status)?;
        Ok(response)
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, Error> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::HttpError(format!("failed to read response: {e}")))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn map_transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::FetchTimeout(err.to_string())
    } else {
        Error::HttpError(format!("network error: {err}"))
    }
}

fn check_status(status: StatusCode) -> Result<(), Error> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(Error::AuthError(format!("status {}", status.as_u16())));
    }
    if status.is_client_error() || status.is_server_error() {
        return Err(Error::HttpError(format!("status {}", status.as_u16())));
    }
    Ok(())
}

#[async_trait]
impl FeedBackend for HttpBackend {
    async fn featured(&self) -> Result<Vec<FeaturedItem>, Error> {
        let start = Instant::now();
        let url = self.endpoint(&["featured"])?;
        let response = self.send(self.request(Method::GET, url)).await?;
        let items: Vec<FeaturedItem> = Self::decode(response).await?;
        tracing::debug!("fetched {} featured items in {:?}", items.len(), start.elapsed());
        Ok(items)
    }

    async fn follows(&self, subjects: &[SubjectId]) -> Result<OverlayState, Error> {
        if subjects.is_empty() {
            return Ok(OverlayState::new());
        }
        if self.require_viewer_token().is_err() {
            tracing::debug!(requested = subjects.len(), "no viewer token; follow state unknown");
            return Ok(OverlayState::new());
        }

        let url = self.endpoint(&["follows"])?;
        let query: Vec<(&str, &str)> = subjects.iter().map(|s| ("subject", s.as_str())).collect();
        let response = self.send(self.request(Method::GET, url).query(&query)).await?;
        let overlay: OverlayState = Self::decode(response).await?;
        tracing::debug!(requested = subjects.len(), known = overlay.len(), "fetched follow flags");
        Ok(overlay)
    }

    async fn set_follow(&self, subject: &SubjectId, followed: bool) -> Result<(), Error> {
        self.require_viewer_token()?;
        let url = self.endpoint(&["follows", subject.as_str()])?;
        let method = if followed { Method::PUT } else { Method::DELETE };
        self.send(self.request(method, url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::FeaturedLoader;
    use featured_core::{FeaturedCache, FollowState};
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Request heads received by a [`spawn_server`] instance, in arrival order.
    type RequestLog = Arc<Mutex<Vec<String>>>;

    /// Serve HTTP/1.1 on a loopback port until the test runtime shuts down.
    ///
    /// `respond` gets the raw request head and returns `(status, body)`, or
    /// `None` to hold the connection open without answering.
    async fn spawn_server<F>(respond: F) -> (String, RequestLog)
    where
        F: Fn(&str) -> Option<(u16, String)> + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let log: RequestLog = Arc::default();
        let respond = Arc::new(respond);

        let seen = log.clone();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let respond = respond.clone();
                let seen = seen.clone();
                tokio::spawn(async move {
                    let head = read_head(&mut stream).await;
                    seen.lock().unwrap().push(head.clone());
                    match respond(&head) {
                        Some((status, body)) => {
                            let response = format!(
                                "HTTP/1.1 {status} Test\r\ncontent-type: application/json\r\n\
                                 content-length: {}\r\nconnection: close\r\n\r\n{body}",
                                body.len()
                            );
                            let _ = stream.write_all(response.as_bytes()).await;
                            let _ = stream.shutdown().await;
                        }
                        None => tokio::time::sleep(Duration::from_secs(5)).await,
                    }
                });
            }
        });

        (format!("http://{addr}/api"), log)
    }

    async fn read_head(stream: &mut TcpStream) -> String {
        let mut head = Vec::new();
        let mut chunk = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            head.extend_from_slice(&chunk[..n]);
        }
        String::from_utf8_lossy(&head).into_owned()
    }

    fn request_line(head: &str) -> &str {
        head.lines().next().unwrap_or_default()
    }

    fn has_bearer(head: &str, token: &str) -> bool {
        head.to_ascii_lowercase()
            .contains(&format!("authorization: bearer {}", token.to_ascii_lowercase()))
    }

    /// Featured list with two owners; follows answer only to a bearer token.
    fn feed_routes(head: &str) -> Option<(u16, String)> {
        let line = request_line(head);
        if line.starts_with("GET /api/featured ") {
            let body = r#"[
                {"id": "p1", "title": "Show A", "ownerId": "owner1"},
                {"id": "p2", "title": "Show B", "ownerId": "owner2"}
            ]"#;
            return Some((200, body.to_string()));
        }
        if line.starts_with("GET /api/follows?") {
            if !has_bearer(head, "tok") {
                return Some((401, String::new()));
            }
            return Some((200, r#"{"owner1":true,"owner2":false}"#.to_string()));
        }
        if line.starts_with("PUT /api/follows/") || line.starts_with("DELETE /api/follows/") {
            return Some((200, String::new()));
        }
        Some((404, String::new()))
    }

    fn backend_at(base_url: &str, viewer_token: Option<&str>) -> HttpBackend {
        HttpBackend::new(HttpBackendConfig {
            base_url: base_url.to_string(),
            viewer_token: viewer_token.map(str::to_string),
            ..Default::default()
        })
        .unwrap()
    }

    fn make_backend(base_url: &str) -> HttpBackend {
        HttpBackend::new(HttpBackendConfig { base_url: base_url.to_string(), ..Default::default() }).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = HttpBackendConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000/api");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.user_agent, "featured/0.1");
        assert!(config.viewer_token.is_none());
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig {
            backend_url: "https://feed.example.com/v2".into(),
            timeout_ms: 2_500,
            viewer_token: Some("tok".into()),
            ..Default::default()
        };
        let config = HttpBackendConfig::from(&app);
        assert_eq!(config.base_url, "https://feed.example.com/v2");
        assert_eq!(config.timeout, Duration::from_millis(2_500));
        assert_eq!(config.viewer_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let result = HttpBackend::new(HttpBackendConfig { base_url: "not a url".into(), ..Default::default() });
        assert!(matches!(result, Err(Error::InvalidUrl(_))));

        let result = HttpBackend::new(HttpBackendConfig { base_url: "mailto:a@b.c".into(), ..Default::default() });
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let backend = make_backend("https://feed.example.com/api");
        assert_eq!(backend.endpoint(&["featured"]).unwrap().as_str(), "https://feed.example.com/api/featured");

        let backend = make_backend("https://feed.example.com/api/");
        assert_eq!(backend.endpoint(&["featured"]).unwrap().as_str(), "https://feed.example.com/api/featured");
    }

    #[test]
    fn test_endpoint_encodes_subject() {
        let backend = make_backend("https://feed.example.com/api");
        let url = backend.endpoint(&["follows", "../admin"]).unwrap();
        assert_eq!(url.path(), "/api/follows/..%2Fadmin");
    }

    #[test]
    fn test_check_status() {
        assert!(check_status(StatusCode::OK).is_ok());
        assert!(check_status(StatusCode::NO_CONTENT).is_ok());
        assert!(matches!(check_status(StatusCode::UNAUTHORIZED), Err(Error::AuthError(_))));
        assert!(matches!(check_status(StatusCode::FORBIDDEN), Err(Error::AuthError(_))));
        assert!(matches!(check_status(StatusCode::NOT_FOUND), Err(Error::HttpError(msg)) if msg == "status 404"));
        assert!(matches!(check_status(StatusCode::BAD_GATEWAY), Err(Error::HttpError(_))));
    }

    #[tokio::test]
    async fn test_follows_without_subjects_skips_request() {
        // Unroutable base: any request would fail.
        let backend = make_backend("http://127.0.0.1:9/api");
        let overlay = backend.follows(&[]).await.unwrap();
        assert!(overlay.is_empty());
    }

    #[tokio::test]
    async fn test_follows_decodes_flag_map_and_repeats_subject() {
        let (base_url, log) = spawn_server(feed_routes).await;
        let backend = backend_at(&base_url, Some("tok"));

        let overlay = backend
            .follows(&[SubjectId::new("owner1"), SubjectId::new("owner2")])
            .await
            .unwrap();
        assert_eq!(overlay.follow_state(&SubjectId::new("owner1")), FollowState::Following);
        assert_eq!(overlay.follow_state(&SubjectId::new("owner2")), FollowState::NotFollowing);

        let heads = log.lock().unwrap().clone();
        assert_eq!(heads.len(), 1);
        assert!(request_line(&heads[0]).starts_with("GET /api/follows?subject=owner1&subject=owner2 "));
        assert!(has_bearer(&heads[0], "tok"));
    }

    #[tokio::test]
    async fn test_follows_without_viewer_is_unknown_and_skips_request() {
        let (base_url, log) = spawn_server(feed_routes).await;
        let backend = backend_at(&base_url, None);

        let overlay = backend.follows(&[SubjectId::new("owner1")]).await.unwrap();
        assert!(overlay.is_empty());
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_loader_without_viewer_still_loads_records() {
        let (base_url, log) = spawn_server(feed_routes).await;
        let mut loader = FeaturedLoader::new(backend_at(&base_url, None), FeaturedCache::default());

        let cache = loader.load().await.unwrap();
        assert_eq!(cache.records().len(), 2);
        assert!(!cache.is_stale());
        let follows: Vec<FollowState> = cache.projected_view().iter().map(|p| p.follow).collect();
        assert_eq!(follows, vec![FollowState::Unknown, FollowState::Unknown]);

        let heads = log.lock().unwrap().clone();
        assert_eq!(heads.len(), 1);
        assert!(request_line(&heads[0]).starts_with("GET /api/featured "));
    }

    #[tokio::test]
    async fn test_loader_with_viewer_overlays_follow_state() {
        let (base_url, _log) = spawn_server(feed_routes).await;
        let mut loader = FeaturedLoader::new(backend_at(&base_url, Some("tok")), FeaturedCache::default());

        let cache = loader.load().await.unwrap();
        let follows: Vec<FollowState> = cache.projected_view().iter().map(|p| p.follow).collect();
        assert_eq!(follows, vec![FollowState::Following, FollowState::NotFollowing]);
    }

    #[tokio::test]
    async fn test_set_follow_uses_put_and_delete() {
        let (base_url, log) = spawn_server(feed_routes).await;
        let backend = backend_at(&base_url, Some("tok"));

        backend.set_follow(&SubjectId::new("owner1"), true).await.unwrap();
        backend.set_follow(&SubjectId::new("owner 2"), false).await.unwrap();

        let heads = log.lock().unwrap().clone();
        assert_eq!(heads.len(), 2);
        assert!(request_line(&heads[0]).starts_with("PUT /api/follows/owner1 "));
        assert!(request_line(&heads[1]).starts_with("DELETE /api/follows/owner%202 "));
        assert!(heads.iter().all(|head| has_bearer(head, "tok")));
    }

    #[tokio::test]
    async fn test_set_follow_without_viewer_fails_before_request() {
        let (base_url, log) = spawn_server(feed_routes).await;
        let mut loader = FeaturedLoader::new(backend_at(&base_url, None), FeaturedCache::default());

        let result = loader.set_follow(&SubjectId::new("owner1"), true).await;
        assert!(matches!(result, Err(Error::InvalidInput(msg)) if msg.contains("FEATURED_VIEWER_TOKEN")));
        assert!(log.lock().unwrap().is_empty());
        assert!(loader.cache().is_empty());
    }

    #[tokio::test]
    async fn test_unanswered_request_maps_to_fetch_timeout() {
        let (base_url, _log) = spawn_server(|_| None).await;
        let backend = HttpBackend::new(HttpBackendConfig {
            base_url,
            timeout: Duration::from_millis(200),
            ..Default::default()
        })
        .unwrap();

        let result = backend.featured().await;
        assert!(matches!(result, Err(Error::FetchTimeout(_))));
    }

    #[tokio::test]
    async fn test_error_status_and_bad_body() {
        let (base_url, _log) = spawn_server(|head| {
            if request_line(head).starts_with("GET /api/featured ") {
                Some((200, "{not json".to_string()))
            } else {
                Some((503, String::new()))
            }
        })
        .await;
        let backend = backend_at(&base_url, Some("tok"));

        assert!(matches!(backend.featured().await, Err(Error::DecodeFailed(_))));
        let result = backend.follows(&[SubjectId::new("owner1")]).await;
        assert!(matches!(result, Err(Error::HttpError(msg)) if msg == "status 503"));
    }

    #[test]
    fn test_require_viewer_token() {
        let anonymous = make_backend("https://feed.example.com/api");
        assert!(matches!(anonymous.require_viewer_token(), Err(Error::InvalidInput(_))));

        let viewer = backend_at("https://feed.example.com/api", Some("tok"));
        assert_eq!(viewer.require_viewer_token().unwrap(), "tok");
    }
}
