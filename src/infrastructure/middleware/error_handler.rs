use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body::Body as HttpBody;
use std::any::Any;
use std::sync::Arc;

use super::request_path;
use crate::error::{AppError, RaisedError};
use crate::infrastructure::config::Config;

/// Terminal error sink. Every error raised below it (handlers, the not-found
/// fallback, caught panics, refused bodies) is logged here and rendered into
/// the envelope. Error statuses that arrive with an empty body and no raised
/// error are rendered from their status. Traces are only exposed in
/// development.
pub async fn error_handler(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request_path(&request);

    let mut response = next.run(request).await;

    let error = match response.extensions_mut().remove::<RaisedError>() {
        Some(RaisedError(error)) => error,
        None if is_bare_error(&response) => Arc::new(AppError::from_status(response.status())),
        None => return response,
    };

    tracing::error!(
        error = %error.message(),
        trace = %error.trace(),
        method = %method,
        path = %path,
        status = error.status_code().as_u16(),
        "Request failed"
    );

    error.to_response(config.is_development())
}

fn is_bare_error(response: &Response) -> bool {
    response.status().as_u16() >= 400 && response.body().size_hint().exact() == Some(0)
}

/// Handler for `CatchPanicLayer`: a panicking handler is an unclassified error
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    AppError::from_panic(payload).into_response()
}
