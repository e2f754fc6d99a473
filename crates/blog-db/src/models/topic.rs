//! Read-only models for the rows comments hang off

use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ArticleModel {
    pub id: i64,
    pub user_id: i64,
    pub article_title: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct TalkModel {
    pub id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserInfoModel {
    pub id: i64,
    pub nickname: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
}
