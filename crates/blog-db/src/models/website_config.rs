//! Website configuration database model

use sqlx::FromRow;

/// The single configuration row, stored as a JSON document
#[derive(Debug, Clone, FromRow)]
pub struct WebsiteConfigModel {
    pub id: i32,
    pub config: serde_json::Value,
}
