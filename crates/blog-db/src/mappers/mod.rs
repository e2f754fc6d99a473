//! Model to entity mappers
//!
//! - `From<Model> for Entity` where every row maps cleanly
//! - `TryFrom<Model> for Entity` where a column can hold a value the domain rejects

mod comment;
mod guestbook;
mod topic;
mod website_config;
