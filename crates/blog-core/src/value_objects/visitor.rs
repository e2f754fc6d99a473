//! Visitor identity for unique-visit counting
//!
//! A visitor is identified without a login by hashing IP address, browser
//! family and operating system together.

use sha2::{Digest, Sha256};
use std::fmt;

/// Browser family reported when the user agent is not recognised
pub const UNKNOWN_AGENT: &str = "Unknown";

/// What we know about an anonymous visitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorInfo {
    pub ip_address: String,
    pub browser: String,
    pub os: String,
}

impl VisitorInfo {
    pub fn new(
        ip_address: impl Into<String>,
        browser: impl Into<String>,
        os: impl Into<String>,
    ) -> Self {
        Self {
            ip_address: ip_address.into(),
            browser: browser.into(),
            os: os.into(),
        }
    }

    /// Build from a raw `User-Agent` header
    pub fn from_user_agent(ip_address: impl Into<String>, user_agent: &str) -> Self {
        Self::new(ip_address, browser_family(user_agent), os_family(user_agent))
    }

    /// Stable hash of IP + browser + OS
    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = Sha256::new();
        hasher.update(self.ip_address.as_bytes());
        hasher.update(self.browser.as_bytes());
        hasher.update(self.os.as_bytes());
        Fingerprint(hex::encode(hasher.finalize()))
    }
}

/// Hex-encoded visitor fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Browser family from a user agent string.
///
/// Order matters: Edge and Opera also advertise Chrome, Chrome advertises Safari.
pub fn browser_family(user_agent: &str) -> &'static str {
    let ua = user_agent;
    if ua.contains("Edg/") || ua.contains("Edge/") {
        "Edge"
    } else if ua.contains("OPR/") || ua.contains("Opera") {
        "Opera"
    } else if ua.contains("Firefox/") {
        "Firefox"
    } else if ua.contains("Chrome/") || ua.contains("CriOS/") {
        "Chrome"
    } else if ua.contains("Safari/") {
        "Safari"
    } else if ua.contains("MSIE") || ua.contains("Trident/") {
        "Internet Explorer"
    } else {
        UNKNOWN_AGENT
    }
}

/// Operating system family from a user agent string
pub fn os_family(user_agent: &str) -> &'static str {
    let ua = user_agent;
    if ua.contains("Windows") {
        "Windows"
    } else if ua.contains("Android") {
        "Android"
    } else if ua.contains("iPhone") || ua.contains("iPad") || ua.contains("iPod") {
        "iOS"
    } else if ua.contains("Mac OS X") || ua.contains("Macintosh") {
        "Mac OS X"
    } else if ua.contains("Linux") {
        "Linux"
    } else {
        UNKNOWN_AGENT
    }
}
