//! Moderation gate
//!
//! Decides whether freshly submitted content is published immediately or held
//! for an administrator. Pure functions over the current website configuration.

use blog_core::{ContentKind, WebsiteConfig};

/// Whether `kind` must wait for admin approval under `config`
pub fn requires_review(config: &WebsiteConfig, kind: ContentKind) -> bool {
    match kind {
        ContentKind::Comment => config.is_comment_review,
        ContentKind::Message => config.is_message_review,
    }
}

/// Value stored in `is_review` for new content of `kind`
pub fn initial_review_state(config: &WebsiteConfig, kind: ContentKind) -> bool {
    !requires_review(config, kind)
}
