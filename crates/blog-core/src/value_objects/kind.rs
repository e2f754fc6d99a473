//! Kinds of content the engagement and moderation flows distinguish

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Entity kinds that can be liked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Article,
    Comment,
    Talk,
}

impl EntityKind {
    pub const ALL: [Self; 3] = [Self::Article, Self::Comment, Self::Talk];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Comment => "comment",
            Self::Talk => "talk",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = DomainError;

    /// Accepts both the singular and the plural route segment
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "article" | "articles" => Ok(Self::Article),
            "comment" | "comments" => Ok(Self::Comment),
            "talk" | "talks" => Ok(Self::Talk),
            _ => Err(DomainError::UnknownEntityKind(s.to_string())),
        }
    }
}

/// User-submitted content subject to moderation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Comment,
    Message,
}
