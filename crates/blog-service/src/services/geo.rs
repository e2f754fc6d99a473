//! IP geolocation
//!
//! Region lookups feed the visitor area statistics and the guestbook
//! `ip_source` column. Both treat a failed lookup as "unknown", so the
//! locator only has to be quick, not reliable.

use std::net::IpAddr;

use async_trait::async_trait;
use blog_common::GeoConfig;
use blog_core::{DomainError, GeoLocator, RepoResult};
use serde::Deserialize;
use tracing::debug;

/// Client for ip-api.com style JSON endpoints
#[derive(Debug, Clone)]
pub struct IpApiLocator {
    client: reqwest::Client,
    url_template: String,
}

/// Response body; only the fields we read
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(rename = "regionName", default)]
    region_name: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

impl IpApiResponse {
    fn region(self) -> Option<String> {
        if self.status != "success" {
            return None;
        }
        [self.region_name, self.city]
            .into_iter()
            .flatten()
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty())
    }
}

impl IpApiLocator {
    pub fn new(config: &GeoConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            url_template: config.url.clone(),
        })
    }

    fn url_for(&self, ip: IpAddr) -> String {
        self.url_template.replace("{ip}", &ip.to_string())
    }
}

#[async_trait]
impl GeoLocator for IpApiLocator {
    async fn locate(&self, ip_address: &str) -> RepoResult<Option<String>> {
        let Ok(ip) = ip_address.trim().parse::<IpAddr>() else {
            return Ok(None);
        };
        if !is_public(ip) {
            return Ok(None);
        }

        let response = self
            .client
            .get(self.url_for(ip))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| DomainError::InternalError(format!("geo lookup failed: {e}")))?;

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| DomainError::InternalError(format!("geo lookup response: {e}")))?;

        let region = body.region();
        debug!(ip = %ip, region = ?region, "Geo lookup");
        Ok(region)
    }
}

/// Locator used when lookups are switched off
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGeoLocator;

#[async_trait]
impl GeoLocator for DisabledGeoLocator {
    async fn locate(&self, _ip_address: &str) -> RepoResult<Option<String>> {
        Ok(None)
    }
}

/// Whether an address can be placed by a public geo database
fn is_public(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast())
        }
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_public(IpAddr::V4(v4));
            }
            // fc00::/7 unique local, fe80::/10 link local
            let first = v6.segments()[0];
            !(v6.is_loopback()
                || v6.is_unspecified()
                || (first & 0xfe00) == 0xfc00
                || (first & 0xffc0) == 0xfe80)
        }
    }
}
