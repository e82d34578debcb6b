use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};
use http_body::{Body as HttpBody, Frame, SizeHint};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::Instant;
use tracing::Level;

use super::request_path;

/// Logs one line per request once its response has been fully written.
///
/// The request is handed on untouched; the timing lives in a hook owned by
/// the response body, so the line is emitted when the server is done with
/// the body rather than when the handler returns.
pub async fn request_logger(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request_path(&request);

    let response = next.run(request).await;

    let hook = CompletionHook {
        method,
        path,
        status: response.status(),
        started,
    };
    let (parts, body) = response.into_parts();

    Response::from_parts(parts, Body::new(LoggedBody { inner: body, _hook: hook }))
}

/// `"<METHOD> <PATH> <STATUS> - <duration>ms"`
pub fn completion_line(method: &Method, path: &str, status: StatusCode, elapsed: Duration) -> String {
    format!("{} {} {} - {}ms", method, path, status.as_u16(), elapsed.as_millis())
}

pub fn completion_level(status: StatusCode) -> Level {
    if status.as_u16() >= 500 {
        Level::ERROR
    } else if status.as_u16() >= 400 {
        Level::WARN
    } else {
        Level::INFO
    }
}

struct CompletionHook {
    method: Method,
    path: String,
    status: StatusCode,
    started: Instant,
}

impl Drop for CompletionHook {
    fn drop(&mut self) {
        let line = completion_line(&self.method, &self.path, self.status, self.started.elapsed());

        match completion_level(self.status) {
            Level::ERROR => tracing::error!("{}", line),
            Level::WARN => tracing::warn!("{}", line),
            _ => tracing::info!("{}", line),
        }
    }
}

struct LoggedBody {
    inner: Body,
    _hook: CompletionHook,
}

impl HttpBody for LoggedBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Pin::new(&mut self.get_mut().inner).poll_frame(cx)
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}
