use axum::extract::{FromRequest, rejection::JsonRejection};

use crate::errors::ApiError;

/// JSON request body whose rejections are reported as [`ApiError`]s
///
/// Bodies that parse but don't match the payload type (missing required
/// fields, unknown enum values, wrong types) become 422 validation failures;
/// malformed JSON and missing content types become 400.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Payload<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => Self::invalid("body", err.body_text()),
            other => Self::bad_request(other.body_text()),
        }
    }
}
