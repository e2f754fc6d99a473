//! Application error types

mod app_error;

pub use app_error::{AppError, AppResult, INTERNAL_MESSAGE, UNAVAILABLE_MESSAGE};
