//! Error taxonomy shared by the core, the store and the HTTP layer.
//! Every variant maps to one HTTP status and carries a machine-stable kind
//! (the variant name) next to a human-readable detail.

use actix_web::{HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError, http::StatusCode};
use derive_more::Display;
use serde_json::json;
use strum_macros::IntoStaticStr;

use crate::service::attendance::AttendanceState;
use crate::model::time_log::EventKind;

#[derive(Debug, Display, IntoStaticStr)]
pub enum AppError {
    // ---------------------------
    // Authentication / authorization
    // ---------------------------
    #[display(fmt = "Authentication credentials were not provided or are invalid.")]
    Unauthenticated,

    #[display(fmt = "You do not have permission to perform this action.")]
    Forbidden,

    // ---------------------------
    // Validation
    // ---------------------------
    #[display(fmt = "Cannot record {} while {}: {}.", attempted, current, reason)]
    InvalidTransition {
        attempted: EventKind,
        current: AttendanceState,
        reason: &'static str,
    },

    #[display(fmt = "You must have both a check-in and a check-out to submit a logsheet.")]
    IncompleteDay,

    #[display(fmt = "Work day credit must be 1.0 or 0.5.")]
    InvalidCredit,

    #[display(fmt = "Invalid action.")]
    InvalidAction,

    #[display(fmt = "Invalid date format. Use YYYY-MM-DD.")]
    InvalidDate,

    #[display(fmt = "Field '{}' is required.", _0)]
    MissingField(&'static str),

    #[display(fmt = "Request body is invalid: {}", _0)]
    InvalidBody(String),

    // ---------------------------
    // Lookup / lifecycle
    // ---------------------------
    #[display(fmt = "Logsheet not found or already processed.")]
    NotFoundOrAlreadyDecided,

    #[display(fmt = "The logsheet for this date has already been decided.")]
    AlreadyDecided,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[display(fmt = "Internal error: {}", _0)]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Stable identifier clients can branch on.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::InvalidTransition { .. }
            | AppError::IncompleteDay
            | AppError::InvalidCredit
            | AppError::InvalidAction
            | AppError::InvalidDate
            | AppError::MissingField(_)
            | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::NotFoundOrAlreadyDecided => StatusCode::NOT_FOUND,
            AppError::AlreadyDecided => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // internal details stay in the log
        let detail = match self {
            AppError::Internal(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({
            "kind": self.kind(),
            "detail": detail,
        }))
    }
}

/// `JsonConfig` error handler, so body failures answer with a kind like any other error.
pub fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let app_err = match err {
        JsonPayloadError::ContentType => AppError::MissingField("request body"),
        JsonPayloadError::Deserialize(e) if e.is_eof() => AppError::MissingField("request body"),
        other => AppError::InvalidBody(other.to_string()),
    };
    app_err.into()
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "Database error");
        AppError::Internal(e.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        tracing::error!(error = %e, "Token encoding error");
        AppError::Internal(e.to_string())
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(e: argon2::password_hash::Error) -> Self {
        tracing::error!(error = %e, "Password hashing error");
        AppError::Internal(e.to_string())
    }
}
