//! Comment entity - a user comment attached to an article, friend-link page or talk

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// What a comment is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum CommentType {
    Article = 1,
    Link = 2,
    Talk = 3,
}

impl CommentType {
    /// Site path prefix of the page hosting the comment
    pub fn path(self) -> &'static str {
        match self {
            Self::Article => "/articles/",
            Self::Link => "/links/",
            Self::Talk => "/talks/",
        }
    }

    /// Whether comments of this type must reference a topic
    pub fn requires_topic(self) -> bool {
        matches!(self, Self::Article | Self::Talk)
    }

    #[inline]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for CommentType {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Article),
            2 => Ok(Self::Link),
            3 => Ok(Self::Talk),
            other => Err(DomainError::UnknownCommentType(other)),
        }
    }
}

impl From<CommentType> for i32 {
    fn from(value: CommentType) -> Self {
        value.as_i32()
    }
}

impl fmt::Display for CommentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Article => "article",
            Self::Link => "link",
            Self::Talk => "talk",
        };
        f.write_str(name)
    }
}

/// Comment entity, as persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub reply_user_id: Option<i64>,
    pub topic_id: Option<i64>,
    /// `None` for top-level comments
    pub parent_id: Option<i64>,
    pub comment_type: CommentType,
    pub content: String,
    /// `true` once the comment is visible to the public
    pub is_review: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Reply target, ignoring the zero placeholder some clients send
    pub fn reply_target(&self) -> Option<i64> {
        self.reply_user_id.filter(|id| *id != 0)
    }

    #[inline]
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    #[inline]
    pub fn is_published(&self) -> bool {
        self.is_review
    }
}

/// A comment that has passed sanitisation and moderation and is ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub user_id: i64,
    pub reply_user_id: Option<i64>,
    pub topic_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub comment_type: CommentType,
    pub content: String,
    pub is_review: bool,
}

impl NewComment {
    /// Materialise the row a store would return after inserting with `id`
    pub fn into_comment(self, id: i64, created_at: DateTime<Utc>) -> Comment {
        Comment {
            id,
            user_id: self.user_id,
            reply_user_id: self.reply_user_id,
            topic_id: self.topic_id,
            parent_id: self.parent_id,
            comment_type: self.comment_type,
            content: self.content,
            is_review: self.is_review,
            created_at,
            updated_at: None,
        }
    }
}
