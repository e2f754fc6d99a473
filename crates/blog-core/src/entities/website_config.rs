//! Website configuration document
//!
//! Stored as a single JSON document. Older admin consoles write the switches as
//! `0`/`1`, newer ones as booleans, so both are accepted on the way in.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Site-wide settings edited from the admin console
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebsiteConfig {
    pub website_name: Option<String>,
    pub website_author: Option<String>,
    pub website_intro: Option<String>,
    pub website_notice: Option<String>,
    pub website_avatar: Option<String>,
    pub website_create_time: Option<String>,
    pub website_record_no: Option<String>,
    pub tourist_avatar: Option<String>,
    pub user_avatar: Option<String>,

    /// New comments are held until an admin approves them
    #[serde(deserialize_with = "flag")]
    pub is_comment_review: bool,
    /// New guestbook messages are held until an admin approves them
    #[serde(deserialize_with = "flag")]
    pub is_message_review: bool,
    /// Send email notifications for new comments
    #[serde(deserialize_with = "flag")]
    pub is_email_notice: bool,

    /// Fields this backend does not interpret, kept so saves round-trip
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        None => false,
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(i)) => i != 0,
        Some(Flag::Text(s)) => matches!(s.trim(), "1" | "true" | "TRUE" | "True"),
    })
}
