//! Server setup and initialization
//!
//! Provides the application builder, dependency wiring and the server runner.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use blog_cache::{RedisKeyValueStore, RedisPool, RedisPoolConfig, RedisQueuePublisher};
use blog_common::{AppConfig, AppError, JwtService};
use blog_core::{GeoLocator, KeyValueStore, WebsiteConfigRepository};
use blog_db::{
    create_pool, run_migrations, DatabaseConfig, PgArticleRepository, PgCommentRepository,
    PgGuestbookRepository, PgTalkRepository, PgUserInfoRepository, PgWebsiteConfigRepository,
};
use blog_service::{
    BlogSettings, CachedWebsiteConfigProvider, ContentFilter, DisabledGeoLocator, IpApiLocator,
    ServiceContextBuilder,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware_with_config;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// How long queued notifications may drain after the listener stops
const NOTIFICATION_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the complete Axum application with all routes and middleware
///
/// Health routes skip the rate limiter so probes are never throttled.
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;

    Ok(api.merge(health_routes()).with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(format!("migrations failed: {e}")))?;
    info!("PostgreSQL connection established");

    let redis_pool = RedisPool::new(RedisPoolConfig::from(&config.redis))
        .map_err(|e| AppError::Cache(e.to_string()))?;
    // Counters degrade to 503 while Redis is away, so this is not fatal
    match redis_pool.health_check().await {
        Ok(latency) => info!(latency_ms = latency.as_millis() as u64, "Redis reachable"),
        Err(e) => warn!(error = %e, "Redis unreachable at startup"),
    }
    let kv_store: Arc<dyn KeyValueStore> = Arc::new(RedisKeyValueStore::new(redis_pool.clone()));
    let publisher = Arc::new(RedisQueuePublisher::new(redis_pool.clone()));
    let shared_redis = Arc::new(redis_pool);

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
    ));

    let website_config_repo: Arc<dyn WebsiteConfigRepository> =
        Arc::new(PgWebsiteConfigRepository::new(pool.clone()));
    let config_provider = Arc::new(CachedWebsiteConfigProvider::new(
        website_config_repo.clone(),
        kv_store.clone(),
        config.blog.config_cache_ttl(),
    ));

    let geo_locator: Arc<dyn GeoLocator> = if config.geo.enabled {
        Arc::new(IpApiLocator::new(&config.geo).map_err(|e| AppError::Config(e.to_string()))?)
    } else {
        info!("Geo lookup disabled");
        Arc::new(DisabledGeoLocator)
    };

    let content_filter = match &config.content.sensitive_words_path {
        Some(path) => {
            let filter = ContentFilter::from_file(path)
                .map_err(|e| AppError::Config(format!("{e:#}")))?;
            info!(path = %path.display(), "Sensitive word list loaded");
            filter
        }
        None => {
            warn!("No sensitive word list configured, only markup is filtered");
            ContentFilter::default()
        }
    };

    let service_context = ServiceContextBuilder::new()
        .pool(pool.clone())
        .redis_pool(shared_redis)
        .comment_repo(Arc::new(PgCommentRepository::new(pool.clone())))
        .guestbook_repo(Arc::new(PgGuestbookRepository::new(pool.clone())))
        .article_repo(Arc::new(PgArticleRepository::new(pool.clone())))
        .talk_repo(Arc::new(PgTalkRepository::new(pool.clone())))
        .user_info_repo(Arc::new(PgUserInfoRepository::new(pool)))
        .website_config_repo(website_config_repo)
        .kv_store(kv_store)
        .config_provider(config_provider)
        .geo_locator(geo_locator)
        .publisher(publisher)
        .content_filter(content_filter)
        .jwt_service(jwt_service)
        .settings(BlogSettings::from(&config))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server until ctrl-c
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    // Peer addresses feed the rate limiter and visitor tracking
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state.clone())?;

    run_server(app, addr).await?;

    let notifications = state.service_context().notifications();
    notifications.shutdown(NOTIFICATION_DRAIN_TIMEOUT).await;
    let stats = notifications.stats();
    info!(
        delivered = stats.delivered,
        failed = stats.failed,
        dropped = stats.dropped,
        "Notification workers stopped"
    );

    Ok(())
}
