pub mod api_response;
pub mod error_code;

pub use api_response::{ApiResponse, ErrorDetail};
pub use error_code::ErrorCode;
