//! View tracking
//!
//! Article views are counted once per article per process lifetime; site
//! visits once per visitor fingerprint, with a per-region breakdown. Tracking
//! is best effort: store failures are logged and never reach the caller.

use dashmap::DashSet;
use tracing::{debug, info, instrument, warn};

use blog_cache::keys;
use blog_core::VisitorInfo;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Region bucket for visitors that could not be located
pub const UNKNOWN_REGION: &str = "unknown";

const REGION_SUFFIXES: [&str; 4] = ["Province", "City", "省", "市"];

/// Articles whose view has already been counted by this process
#[derive(Debug, Default)]
pub struct ArticleViewGuard {
    seen: DashSet<i64>,
}

impl ArticleViewGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` exactly once per article id
    pub fn first_view(&self, article_id: i64) -> bool {
        self.seen.insert(article_id)
    }

    /// Allow the next view of `article_id` to be counted again
    pub fn forget(&self, article_id: i64) {
        self.seen.remove(&article_id);
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Collapse a geo lookup result to a display region
pub fn normalize_region(raw: Option<&str>) -> String {
    let mut region = raw.unwrap_or_default().trim();
    for suffix in REGION_SUFFIXES {
        region = region.strip_suffix(suffix).unwrap_or(region).trim();
    }

    if region.is_empty() {
        UNKNOWN_REGION.to_string()
    } else {
        region.to_string()
    }
}

/// View tracking service
pub struct ViewService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ViewService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Count a view of `article_id` unless this process already did.
    ///
    /// Returns whether the view was counted.
    #[instrument(skip(self))]
    pub async fn record_article_view(&self, article_id: i64) -> bool {
        let guard = self.ctx.view_guard();
        if !guard.first_view(article_id) {
            return false;
        }

        match self
            .ctx
            .kv_store()
            .zincr_by(keys::ARTICLE_VIEWS_COUNT, &article_id.to_string(), 1.0)
            .await
        {
            Ok(views) => {
                debug!(article_id, views, "Article view counted");
                true
            }
            Err(e) => {
                // Let a later request retry
                guard.forget(article_id);
                warn!(article_id, error = %e, "Failed to count article view");
                false
            }
        }
    }

    /// Count a unique site visit for `visitor`.
    ///
    /// Returns whether this visitor was new.
    #[instrument(skip(self, visitor), fields(ip = %visitor.ip_address))]
    pub async fn record_visit(&self, visitor: &VisitorInfo) -> bool {
        match self.try_record_visit(visitor).await {
            Ok(counted) => counted,
            Err(e) => {
                warn!(error = %e, "Failed to record site visit");
                false
            }
        }
    }

    async fn try_record_visit(&self, visitor: &VisitorInfo) -> ServiceResult<bool> {
        let store = self.ctx.kv_store();
        let fingerprint = visitor.fingerprint();

        if store
            .sismember(keys::UNIQUE_VISITOR, fingerprint.as_str())
            .await?
        {
            return Ok(false);
        }

        let located = match self.ctx.geo_locator().locate(&visitor.ip_address).await {
            Ok(region) => region,
            Err(e) => {
                debug!(error = %e, "Geo lookup failed");
                None
            }
        };
        let region = normalize_region(located.as_deref());

        // The SADD result decides between racing first visits
        if store.sadd(keys::UNIQUE_VISITOR, fingerprint.as_str()).await? == 0 {
            return Ok(false);
        }

        let counted = match store.hincr_by(keys::VISITOR_AREA, &region, 1).await {
            Ok(_) => store.incr_by(keys::BLOG_VIEWS_COUNT, 1).await,
            Err(e) => Err(e),
        };
        if let Err(e) = counted {
            // Let a later visit retry
            if let Err(undo) = store.srem(keys::UNIQUE_VISITOR, fingerprint.as_str()).await {
                debug!(error = %undo, "Failed to release visitor fingerprint");
            }
            return Err(e.into());
        }

        info!(region = %region, browser = %visitor.browser, os = %visitor.os, "New visitor");
        Ok(true)
    }

    /// Total counted views of one article
    pub async fn article_views(&self, article_id: i64) -> ServiceResult<i64> {
        let score = self
            .ctx
            .kv_store()
            .zscore(keys::ARTICLE_VIEWS_COUNT, &article_id.to_string())
            .await?;
        Ok(score.map_or(0, |s| s as i64))
    }

    /// Most viewed articles, highest first
    #[instrument(skip(self))]
    pub async fn top_articles(&self, limit: usize) -> ServiceResult<Vec<(i64, i64)>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let ranked = self
            .ctx
            .kv_store()
            .zrevrange_with_scores(keys::ARTICLE_VIEWS_COUNT, 0, limit as isize - 1)
            .await?;

        Ok(ranked
            .into_iter()
            .filter_map(|(id, score)| Some((id.parse().ok()?, score as i64)))
            .collect())
    }

    /// Unique site visits
    pub async fn site_views(&self) -> ServiceResult<i64> {
        let raw = self.ctx.kv_store().get(keys::BLOG_VIEWS_COUNT).await?;
        Ok(raw.and_then(|r| r.trim().parse().ok()).unwrap_or(0))
    }

    /// Visitors per region, largest first
    pub async fn visitor_areas(&self) -> ServiceResult<Vec<(String, i64)>> {
        let raw = self.ctx.kv_store().hget_all(keys::VISITOR_AREA).await?;

        let mut areas: Vec<(String, i64)> = raw
            .into_iter()
            .filter_map(|(region, count)| Some((region, count.trim().parse().ok()?)))
            .collect();
        areas.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(areas)
    }
}
