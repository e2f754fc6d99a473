//! View and visit statistics handlers

use axum::{extract::State, Json};
use blog_core::EntityKind;
use blog_service::{
    AreaCount, ArticleStatsResponse, BlogStatsResponse, EngagementService, RankQuery,
    RankedArticleResponse, ViewService,
};

use crate::extractors::{ClientInfo, IdPath, ValidatedQuery};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Count a view of an article and return its counters
///
/// GET /articles/{id}/stats
pub async fn article_stats(
    State(state): State<AppState>,
    IdPath(article_id): IdPath,
) -> ApiResult<Json<ArticleStatsResponse>> {
    let ctx = state.service_context();
    let views = ViewService::new(ctx);
    views.record_article_view(article_id).await;

    let views_count = views.article_views(article_id).await?;
    let like_count = EngagementService::new(ctx)
        .like_count(EntityKind::Article, article_id)
        .await?;

    Ok(Json(ArticleStatsResponse {
        article_id,
        views_count,
        like_count,
    }))
}

/// Most viewed articles
///
/// GET /articles/rank?limit={n}
pub async fn article_rank(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<RankQuery>,
) -> ApiResult<Json<Vec<RankedArticleResponse>>> {
    let ranked = ViewService::new(state.service_context())
        .top_articles(query.limit())
        .await?;
    Ok(Json(ranked.into_iter().map(Into::into).collect()))
}

/// Record a site visit
///
/// POST /report
pub async fn report_visit(State(state): State<AppState>, client: ClientInfo) -> NoContent {
    ViewService::new(state.service_context())
        .record_visit(&client.visitor())
        .await;
    NoContent
}

/// Site views and visitor regions
///
/// GET /blog/stats
pub async fn blog_stats(State(state): State<AppState>) -> ApiResult<Json<BlogStatsResponse>> {
    let service = ViewService::new(state.service_context());
    let views_count = service.site_views().await?;
    let areas = service
        .visitor_areas()
        .await?
        .into_iter()
        .map(AreaCount::from)
        .collect();

    Ok(Json(BlogStatsResponse { views_count, areas }))
}
