//! Request handlers organized by resource.

pub mod health;
pub mod snapshots;
pub mod test_details;

use axum::http::StatusCode;
use ripple_core::Error;
use tracing::error;

/// Map a domain error onto a status code and message.
pub(crate) fn error_response(err: Error) -> (StatusCode, String) {
    match err {
        Error::InvalidId(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        e if e.is_not_found() => (StatusCode::NOT_FOUND, e.to_string()),
        e => {
            error!(error = %e, "Request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
