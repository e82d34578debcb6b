use axum::extract::OriginalUri;
use axum::http::Method;

use crate::error::AppError;

/// Runs when nothing matched the method and path. Raises instead of
/// rendering so the terminal error handler shapes the response.
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::not_found(format!("Route not found: {} {}", method, uri.path()))
}
