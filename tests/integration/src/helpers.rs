//! Test helpers for integration tests
//!
//! `TestHarness` wires the in-memory adapters into a real `ServiceContext`
//! and `AppState`; `TestServer` drives a live server backed by PostgreSQL
//! and Redis when those are configured.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use blog_api::{create_app, create_app_state, AppState};
use blog_common::{AppConfig, JwtService};
use blog_core::{MessageQueuePublisher, VisitorInfo, WebsiteConfig};
use blog_service::{
    BlogSettings, CachedWebsiteConfigProvider, ContentFilter, CreateCommentRequest,
    ServiceContext, ServiceContextBuilder,
};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use crate::fixtures::{
    FailingPublisher, InMemoryCommentRepository, InMemoryDirectory, InMemoryGuestbookRepository,
    InMemoryKeyValueStore, InMemoryWebsiteConfigRepository, RecordingPublisher, StaticGeoLocator,
};

pub const ADMIN_ID: i64 = 1;
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const WEBSITE_URL: &str = "https://blog.example.com";
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// How long async notification assertions wait for the worker pool
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Website config with every switch explicit
pub fn website_config(comment_review: bool, message_review: bool, email_notice: bool) -> WebsiteConfig {
    WebsiteConfig {
        is_comment_review: comment_review,
        is_message_review: message_review,
        is_email_notice: email_notice,
        tourist_avatar: Some("https://blog.example.com/tourist.png".to_string()),
        ..WebsiteConfig::default()
    }
}

/// Comment request on an article
pub fn article_comment(article_id: i64, content: &str) -> CreateCommentRequest {
    CreateCommentRequest {
        reply_user_id: None,
        topic_id: Some(article_id),
        parent_id: None,
        comment_type: 1,
        content: content.to_string(),
    }
}

pub fn visitor(ip: &str) -> VisitorInfo {
    VisitorInfo::new(ip, "Chrome", "Windows")
}

/// Minimal config accepted by `AppConfig::from_lookup`
pub fn offline_config() -> AppConfig {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("API_PORT", "0"),
        ("DATABASE_URL", "postgres://unused/blog"),
        ("REDIS_URL", "redis://unused:6379"),
        ("JWT_SECRET", TEST_JWT_SECRET),
        ("BLOG_WEBSITE_URL", WEBSITE_URL),
        ("GEO_LOOKUP_ENABLED", "false"),
    ]);
    AppConfig::from_lookup(|name| vars.get(name).map(ToString::to_string))
        .expect("offline config is complete")
}

enum PublisherChoice {
    Recording,
    Failing,
}

/// Builder for [`TestHarness`]
pub struct HarnessBuilder {
    website_config: WebsiteConfig,
    publisher: PublisherChoice,
    geo: StaticGeoLocator,
    sensitive_words: Vec<String>,
    workers: usize,
    queue_capacity: usize,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            website_config: website_config(false, false, true),
            publisher: PublisherChoice::Recording,
            geo: StaticGeoLocator::default(),
            sensitive_words: Vec::new(),
            workers: 2,
            queue_capacity: 64,
        }
    }
}

impl HarnessBuilder {
    pub fn website_config(mut self, config: WebsiteConfig) -> Self {
        self.website_config = config;
        self
    }

    pub fn failing_publisher(mut self) -> Self {
        self.publisher = PublisherChoice::Failing;
        self
    }

    pub fn geo(mut self, geo: StaticGeoLocator) -> Self {
        self.geo = geo;
        self
    }

    pub fn sensitive_words(mut self, words: &[&str]) -> Self {
        self.sensitive_words = words.iter().map(ToString::to_string).collect();
        self
    }

    pub fn notification_queue(mut self, workers: usize, capacity: usize) -> Self {
        self.workers = workers;
        self.queue_capacity = capacity;
        self
    }

    /// Wire everything up; must run inside a Tokio runtime
    pub fn build(self) -> TestHarness {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let comments = Arc::new(InMemoryCommentRepository::new());
        let guestbook = Arc::new(InMemoryGuestbookRepository::new());
        let directory = Arc::new(InMemoryDirectory::new());
        let website_repo = Arc::new(InMemoryWebsiteConfigRepository::with_config(
            self.website_config,
        ));
        let recording = Arc::new(RecordingPublisher::new());
        let failing = Arc::new(FailingPublisher::new());

        directory.add_user(ADMIN_ID, Some(ADMIN_EMAIL));

        let publisher: Arc<dyn MessageQueuePublisher> = match self.publisher {
            PublisherChoice::Recording => recording.clone(),
            PublisherChoice::Failing => failing.clone(),
        };

        let config_provider = Arc::new(CachedWebsiteConfigProvider::new(
            website_repo.clone(),
            store.clone(),
            Duration::from_secs(60),
        ));

        let content_filter =
            ContentFilter::new(&self.sensitive_words).expect("sensitive words compile");

        let settings = BlogSettings {
            website_url: WEBSITE_URL.to_string(),
            admin_user_id: ADMIN_ID,
            notify_workers: self.workers,
            notify_queue_capacity: self.queue_capacity,
            ..BlogSettings::default()
        };

        let jwt = Arc::new(JwtService::new(TEST_JWT_SECRET, 3600));

        let ctx = ServiceContextBuilder::new()
            .comment_repo(comments.clone())
            .guestbook_repo(guestbook.clone())
            .article_repo(directory.clone())
            .talk_repo(directory.clone())
            .user_info_repo(directory.clone())
            .website_config_repo(website_repo.clone())
            .kv_store(store.clone())
            .config_provider(config_provider)
            .geo_locator(Arc::new(self.geo))
            .publisher(publisher)
            .content_filter(content_filter)
            .jwt_service(jwt.clone())
            .settings(settings)
            .build()
            .expect("service context builds");

        TestHarness {
            state: AppState::new(ctx, offline_config()),
            store,
            comments,
            guestbook,
            directory,
            website_repo,
            publisher: recording,
            failing_publisher: failing,
            jwt,
        }
    }
}

/// Services over in-memory adapters, plus handles to inspect them
pub struct TestHarness {
    state: AppState,
    pub store: Arc<InMemoryKeyValueStore>,
    pub comments: Arc<InMemoryCommentRepository>,
    pub guestbook: Arc<InMemoryGuestbookRepository>,
    pub directory: Arc<InMemoryDirectory>,
    pub website_repo: Arc<InMemoryWebsiteConfigRepository>,
    pub publisher: Arc<RecordingPublisher>,
    pub failing_publisher: Arc<FailingPublisher>,
    pub jwt: Arc<JwtService>,
}

impl TestHarness {
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::default()
    }

    /// Default harness: no review, email notices on, recording publisher
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn ctx(&self) -> &ServiceContext {
        self.state.service_context()
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Wait until queued notifications have been handled
    pub async fn wait_for_notifications(&self) {
        assert!(
            self.ctx().notifications().wait_idle(IDLE_TIMEOUT).await,
            "notification workers did not go idle"
        );
    }

    pub fn token_for(&self, user_id: i64) -> String {
        self.jwt.issue(user_id).expect("token issues")
    }

    /// In-process router without the rate limiter (no peer address in `oneshot`)
    pub fn router(&self) -> Router {
        blog_api::routes::create_router()
            .merge(blog_api::routes::health_routes())
            .with_state(self.state())
    }

    /// Send one request through the router and decode the JSON reply
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", "203.0.113.7")
            .header(header::USER_AGENT, "Mozilla/5.0 (Windows NT 10.0) Chrome/120.0");
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("request builds");

        let response = self.router().oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body is JSON")
        };
        (status, json)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Live server (PostgreSQL + Redis)
// ============================================================================

/// Server bound to an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: AppState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state.clone())?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            state,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn token_for(&self, user_id: i64) -> Result<String> {
        Ok(self.state.jwt_service().issue(user_id)?)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    pub async fn put_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .put(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }
}

/// Configuration from the environment (and `.env`)
pub fn test_config() -> Result<AppConfig> {
    AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Whether PostgreSQL and Redis are configured for live tests
pub fn check_test_env() -> bool {
    dotenvy::dotenv().ok();

    for var in ["DATABASE_URL", "REDIS_URL", "JWT_SECRET"] {
        if std::env::var(var).is_err() {
            eprintln!("Skipping test: {var} not set");
            return false;
        }
    }
    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
