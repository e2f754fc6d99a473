//! Engagement service
//!
//! Like toggles for articles, comments and talks. Each kind keeps a per-user
//! set of liked ids and one hash of counters; the two are updated with
//! independent single-key commands, never inside a transaction.

use std::collections::HashMap;

use blog_cache::keys;
use blog_core::EntityKind;
use tracing::{debug, info, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Engagement service
pub struct EngagementService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EngagementService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Like `entity_id` if `actor` has not yet, unlike it otherwise.
    ///
    /// Returns the counter after the toggle, never below zero.
    #[instrument(skip(self))]
    pub async fn toggle_like(
        &self,
        actor: Option<i64>,
        kind: EntityKind,
        entity_id: i64,
    ) -> ServiceResult<i64> {
        let user_id = actor.ok_or(ServiceError::Unauthenticated)?;

        let store = self.ctx.kv_store();
        let set_key = keys::user_like_key(kind, user_id);
        let count_key = keys::like_count_key(kind);
        let field = entity_id.to_string();

        let liked = store.sismember(&set_key, &field).await?;

        // HINCRBY 0 creates a missing field without clobbering a concurrent write
        if store.hget(count_key, &field).await?.is_none() {
            store.hincr_by(count_key, &field, 0).await?;
        }

        if liked {
            // A concurrent unlike may already have removed the member
            if store.srem(&set_key, &field).await? > 0 {
                store.hincr_by(count_key, &field, -1).await?;
            } else {
                debug!(user_id, entity_id, %kind, "Like already removed, decrement skipped");
            }
        } else if store.sadd(&set_key, &field).await? > 0 {
            store.hincr_by(count_key, &field, 1).await?;
        } else {
            debug!(user_id, entity_id, %kind, "Like already recorded, increment skipped");
        }

        let like_count = self.settle_counter(count_key, &field).await?;

        info!(
            user_id,
            entity_id,
            %kind,
            liked = !liked,
            like_count,
            "Like toggled"
        );

        Ok(like_count)
    }

    /// Current counter for one entity, zero when never liked
    #[instrument(skip(self))]
    pub async fn like_count(&self, kind: EntityKind, entity_id: i64) -> ServiceResult<i64> {
        let raw = self
            .ctx
            .kv_store()
            .hget(keys::like_count_key(kind), &entity_id.to_string())
            .await?;
        Ok(raw.as_deref().and_then(parse_count).unwrap_or(0).max(0))
    }

    /// Every counter of one kind, keyed by entity id
    #[instrument(skip(self))]
    pub async fn like_counts(&self, kind: EntityKind) -> ServiceResult<HashMap<i64, i64>> {
        let raw = self
            .ctx
            .kv_store()
            .hget_all(keys::like_count_key(kind))
            .await?;

        Ok(raw
            .iter()
            .filter_map(|(id, count)| Some((id.parse().ok()?, parse_count(count)?.max(0))))
            .collect())
    }

    /// Ids of `kind` liked by `user_id`, ascending
    #[instrument(skip(self))]
    pub async fn liked_ids(&self, kind: EntityKind, user_id: i64) -> ServiceResult<Vec<i64>> {
        let members = self
            .ctx
            .kv_store()
            .smembers(&keys::user_like_key(kind, user_id))
            .await?;

        let mut ids: Vec<i64> = members.iter().filter_map(|m| m.parse().ok()).collect();
        ids.sort_unstable();
        Ok(ids)
    }

    pub async fn has_liked(
        &self,
        kind: EntityKind,
        user_id: i64,
        entity_id: i64,
    ) -> ServiceResult<bool> {
        Ok(self
            .ctx
            .kv_store()
            .sismember(&keys::user_like_key(kind, user_id), &entity_id.to_string())
            .await?)
    }

    /// Re-read a counter after a toggle, repairing negative or corrupt values to zero
    async fn settle_counter(&self, count_key: &str, field: &str) -> ServiceResult<i64> {
        let store = self.ctx.kv_store();
        let raw = store.hget(count_key, field).await?;

        match raw.as_deref().map(|r| (r, parse_count(r))) {
            Some((_, Some(count))) if count >= 0 => Ok(count),
            Some((_, Some(count))) => {
                // Relative repair keeps increments that landed after the read
                let repaired = store.hincr_by(count_key, field, -count).await?;
                warn!(key = count_key, field, count, repaired, "Negative like counter repaired");
                Ok(repaired.max(0))
            }
            Some((raw, None)) => {
                warn!(key = count_key, field, raw, "Corrupt like counter reset to 0");
                store.hset(count_key, field, "0").await?;
                Ok(0)
            }
            None => Ok(0),
        }
    }
}

fn parse_count(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}
