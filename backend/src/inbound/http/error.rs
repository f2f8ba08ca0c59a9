//! HTTP mapping for domain errors.
//!
//! Domain [`Error`] values become JSON bodies with a matching status code.
//! Internal failures are redacted; validation failures carry
//! `details.field` and `details.code` so editors can highlight the input.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::error;

use crate::domain::ports::ArticleListFilterError;
use crate::domain::{
    ArticleValidationError, Error, ErrorCode, LoginValidationError, SlugValidationError,
    TRACE_ID_HEADER, UploadValidationError,
};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

/// `invalid_request` error pointing at one input field.
pub(crate) fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(message = self.message(), trace_id = ?self.trace_id(), "internal error");
        }
        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

impl From<ArticleValidationError> for Error {
    fn from(err: ArticleValidationError) -> Self {
        field_error(err.field(), err.code(), err.to_string())
    }
}

impl From<LoginValidationError> for Error {
    fn from(err: LoginValidationError) -> Self {
        let (field, code) = match err {
            LoginValidationError::EmptyUsername => ("username", "empty_username"),
            LoginValidationError::EmptyPassword => ("password", "empty_password"),
        };
        field_error(field, code, err.to_string())
    }
}

impl From<UploadValidationError> for Error {
    fn from(err: UploadValidationError) -> Self {
        let field = match err {
            UploadValidationError::UnsupportedContentType => "contentType",
            UploadValidationError::InvalidName => "filename",
            UploadValidationError::EmptyPayload | UploadValidationError::TooLarge { .. } => "body",
        };
        field_error(field, err.code(), err.to_string())
    }
}

impl From<SlugValidationError> for Error {
    fn from(err: SlugValidationError) -> Self {
        field_error("slug", "invalid_slug", err.to_string())
    }
}

impl From<ArticleListFilterError> for Error {
    fn from(err: ArticleListFilterError) -> Self {
        let code = match err {
            ArticleListFilterError::MonthWithoutYear => "month_without_year",
            ArticleListFilterError::MonthOutOfRange => "month_out_of_range",
        };
        field_error("month", code, err.to_string())
    }
}
