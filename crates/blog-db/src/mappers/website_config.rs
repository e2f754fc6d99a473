//! Website configuration mapper

use blog_core::{DomainError, WebsiteConfig};

use crate::models::WebsiteConfigModel;

impl TryFrom<WebsiteConfigModel> for WebsiteConfig {
    type Error = DomainError;

    fn try_from(model: WebsiteConfigModel) -> Result<Self, Self::Error> {
        serde_json::from_value(model.config).map_err(|e| {
            DomainError::DatabaseError(format!("malformed website config row {}: {e}", model.id))
        })
    }
}
