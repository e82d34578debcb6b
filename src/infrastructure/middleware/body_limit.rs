use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::infrastructure::config::Config;

/// Refuse a request whose declared `Content-Length` is over the limit before
/// it is routed. Bodies without a length are cut off by `DefaultBodyLimit`
/// when an extractor reads them.
pub async fn limit_request_body(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    let declared = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());

    if let Some(length) = declared {
        if length > config.body_limit_bytes as u64 {
            return Err(AppError::rejected(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!(
                    "Request body of {} bytes exceeds the {} byte limit",
                    length, config.body_limit_bytes
                ),
            ));
        }
    }

    Ok(next.run(request).await)
}
