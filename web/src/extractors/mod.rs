pub(crate) mod authenticated_user;

use axum::http::StatusCode;

/// Rejection shape shared by the request extractors.
pub(crate) type RejectionType = (StatusCode, String);
