//! HTTP request handlers
//!
//! Handlers are organized by domain and delegate to the service layer.

pub mod comments;
pub mod health;
pub mod likes;
pub mod messages;
pub mod stats;
pub mod website;
