//! # blog-service
//!
//! Application layer: like toggles, view tracking, comment and guestbook
//! moderation, and the email notification pipeline.

pub mod dto;
pub mod services;

pub use dto::*;
pub use services::*;
