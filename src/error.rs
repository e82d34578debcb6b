use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};
use std::any::Any;
use std::panic::Location;
use std::sync::Arc;

use crate::domain::shared::{ApiResponse, ErrorCode, ErrorDetail};

const FALLBACK_MESSAGE: &str = "Internal Server Error";

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Deliberately raised by a handler, carries its own HTTP status
    #[error("{message}")]
    Classified {
        status: StatusCode,
        message: String,
        code: Option<ErrorCode>,
        details: Option<Value>,
        raised_at: &'static Location<'static>,
    },

    /// Anything else; always surfaces as a 500
    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),
}

/// The error that produced a response, left in the response extensions for
/// the terminal error handler.
#[derive(Debug, Clone)]
pub struct RaisedError(pub Arc<AppError>);

impl AppError {
    #[track_caller]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Classified {
            status,
            message: message.into(),
            code: None,
            details: None,
            raised_at: Location::caller(),
        }
    }

    #[track_caller]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message).with_code(ErrorCode::ValidationError)
    }

    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message).with_code(ErrorCode::NotFound)
    }

    #[track_caller]
    pub fn file_upload(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message).with_code(ErrorCode::FileUploadError)
    }

    /// A request the framework refused before a handler saw it (unreadable
    /// body, wrong content type, size limit). Keeps the refusal's status.
    #[track_caller]
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        let error = Self::new(status, message);
        match code_for_status(status) {
            Some(code) => error.with_code(code),
            None => error,
        }
    }

    /// Stand-in for an error response that arrived without a body or a
    /// raised error, e.g. an I/O failure inside the static file service.
    #[track_caller]
    pub fn from_status(status: StatusCode) -> Self {
        Self::rejected(status, status.canonical_reason().unwrap_or(FALLBACK_MESSAGE))
    }

    pub fn unclassified(err: impl Into<anyhow::Error>) -> Self {
        Self::Unclassified(err.into())
    }

    /// Build an unclassified error from a caught panic payload
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            String::new()
        };
        Self::Unclassified(anyhow::Error::msg(message))
    }

    pub fn with_code(mut self, new_code: ErrorCode) -> Self {
        if let Self::Classified { code, .. } = &mut self {
            *code = Some(new_code);
        }
        self
    }

    pub fn with_details(mut self, new_details: Value) -> Self {
        if let Self::Classified { details, .. } = &mut self {
            *details = Some(new_details);
        }
        self
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Classified { status, .. } => *status,
            Self::Unclassified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Classified { code, .. } => *code,
            Self::Unclassified(_) => Some(ErrorCode::InternalError),
        }
    }

    /// User-facing message; unclassified errors with no text fall back to a fixed literal
    pub fn message(&self) -> String {
        match self {
            Self::Classified { message, .. } => message.clone(),
            Self::Unclassified(err) => {
                let message = err.to_string();
                if message.is_empty() {
                    FALLBACK_MESSAGE.to_string()
                } else {
                    message
                }
            }
        }
    }

    /// Diagnostic trace: raise location for classified errors, cause chain
    /// (plus backtrace when captured) for unclassified ones.
    pub fn trace(&self) -> String {
        match self {
            Self::Classified {
                message, raised_at, ..
            } => format!("AppError: {}\n    at {}", message, raised_at),
            Self::Unclassified(err) => format!("{:?}", err),
        }
    }

    /// Shape the `error` member of the envelope
    pub fn to_detail(&self, include_trace: bool) -> ErrorDetail {
        let details = match self {
            Self::Classified { details, .. } if include_trace => {
                Some(attach_trace(details.clone(), self.trace()))
            }
            Self::Classified { details, .. } => details.clone(),
            Self::Unclassified(_) if include_trace => Some(json!({ "stack": self.trace() })),
            Self::Unclassified(_) => None,
        };

        ErrorDetail {
            message: self.message(),
            code: self.code().map(|code| code.to_string()),
            details,
        }
    }

    /// Render the full envelope with this error's status
    pub fn to_response(&self, include_trace: bool) -> Response {
        let body = ApiResponse::<()>::failure(self.to_detail(include_trace));
        (self.status_code(), body).into_response()
    }
}

fn attach_trace(details: Option<Value>, trace: String) -> Value {
    match details {
        Some(Value::Object(mut map)) => {
            map.insert("stack".to_string(), Value::String(trace));
            Value::Object(map)
        }
        Some(other) => json!({ "value": other, "stack": trace }),
        None => json!({ "stack": trace }),
    }
}

fn code_for_status(status: StatusCode) -> Option<ErrorCode> {
    match status {
        StatusCode::NOT_FOUND => Some(ErrorCode::NotFound),
        StatusCode::BAD_REQUEST
        | StatusCode::PAYLOAD_TOO_LARGE
        | StatusCode::UNSUPPORTED_MEDIA_TYPE
        | StatusCode::UNPROCESSABLE_ENTITY => Some(ErrorCode::ValidationError),
        status if status.as_u16() >= 500 => Some(ErrorCode::InternalError),
        _ => None,
    }
}

impl From<JsonRejection> for AppError {
    #[track_caller]
    fn from(rejection: JsonRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    #[track_caller]
    fn from(rejection: FormRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

/// Handlers return errors instead of rendering them. The trace-free envelope
/// is a placeholder until the terminal error handler re-renders it.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = self.to_response(false);
        response.extensions_mut().insert(RaisedError(Arc::new(self)));
        response
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
