//! Value objects - immutable types that represent domain concepts

mod kind;
mod visitor;

pub use kind::{ContentKind, EntityKind};
pub use visitor::{browser_family, os_family, Fingerprint, VisitorInfo, UNKNOWN_AGENT};
