//! Read-only views of collaborators owned by other parts of the blog
//!
//! Only the fields the engagement and notification flows need are modelled.

/// Article, reduced to its author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
}

/// Talk (short post), reduced to its author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Talk {
    pub id: i64,
    pub user_id: i64,
}

/// Public profile of a user account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub id: i64,
    pub nickname: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

impl UserInfo {
    /// Email address usable for notifications, if one is on file
    pub fn contact_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}
