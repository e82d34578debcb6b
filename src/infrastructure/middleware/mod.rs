pub mod body_limit;
pub mod error_handler;
pub mod request_logger;

pub use body_limit::limit_request_body;
pub use error_handler::{error_handler, panic_response};
pub use request_logger::request_logger;

use axum::extract::{OriginalUri, Request};

/// Path as the client sent it, before any nesting stripped a prefix
pub(crate) fn request_path(request: &Request) -> String {
    request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path())
        .unwrap_or_else(|| request.uri().path())
        .to_owned()
}
