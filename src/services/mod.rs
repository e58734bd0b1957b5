pub mod auth_service;
pub mod cart_service;
pub mod favorite_service;
pub mod menu_service;
pub mod order_service;
pub mod review_service;
pub mod user_service;

use crate::error::{AppError, AppResult};

/// Unwrap a required field, failing with the caller's message.
pub(crate) fn require<T>(value: Option<T>, message: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::BadRequest(message.to_string()))
}

/// Like [`require`], but blank strings count as missing.
pub(crate) fn require_text(value: Option<String>, message: &str) -> AppResult<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(AppError::BadRequest(message.to_string())),
    }
}
