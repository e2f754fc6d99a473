//! Redis key namespaces.
//!
//! Key names are shared with the admin console and the mail worker, so they
//! must not change shape.

use blog_core::EntityKind;

/// Sorted set: member = article id, score = views
pub const ARTICLE_VIEWS_COUNT: &str = "article_views_count";
/// String counter of unique site visits
pub const BLOG_VIEWS_COUNT: &str = "blog_views_count";
/// Set of visitor fingerprints already counted
pub const UNIQUE_VISITOR: &str = "unique_visitor";
/// Hash: field = region, value = visitor count
pub const VISITOR_AREA: &str = "visitor_area";
/// Cached website configuration JSON
pub const WEBSITE_CONFIG: &str = "website_config";

pub const ARTICLE_LIKE_COUNT: &str = "article_like_count";
pub const COMMENT_LIKE_COUNT: &str = "comment_like_count";
pub const TALK_LIKE_COUNT: &str = "talk_like_count";

pub const ARTICLE_USER_LIKE: &str = "article_user_like:";
pub const COMMENT_USER_LIKE: &str = "comment_user_like:";
pub const TALK_USER_LIKE: &str = "talk_user_like:";

/// Hash holding every like counter of one kind
#[must_use]
pub fn like_count_key(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Article => ARTICLE_LIKE_COUNT,
        EntityKind::Comment => COMMENT_LIKE_COUNT,
        EntityKind::Talk => TALK_LIKE_COUNT,
    }
}

#[must_use]
pub fn user_like_prefix(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Article => ARTICLE_USER_LIKE,
        EntityKind::Comment => COMMENT_USER_LIKE,
        EntityKind::Talk => TALK_USER_LIKE,
    }
}

/// Set of entity ids one user has liked
#[must_use]
pub fn user_like_key(kind: EntityKind, user_id: i64) -> String {
    format!("{}{user_id}", user_like_prefix(kind))
}
