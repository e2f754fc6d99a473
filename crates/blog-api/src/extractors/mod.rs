//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, path ids, and client identity.

mod auth;
mod client;
mod path;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser};
pub use client::ClientInfo;
pub use path::IdPath;
pub use validated::{ValidatedJson, ValidatedQuery};
