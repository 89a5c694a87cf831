//! # Error Handling
//!
//! Every fallible operation in this crate returns [`ApiError`]. Two failure
//! classes matter to callers:
//!
//! - **Validation** (`ValidationFailed`, 422): the request was rejected before
//!   any query was sent, e.g. a negative page offset.
//! - **Data access** (`Database`, 500): the store failed. The underlying
//!   [`DbErr`] is kept untouched inside the variant so callers can inspect or
//!   retry it; nothing here retries or swallows it.
//!
//! When the error is rendered as an HTTP response the body only carries a
//! sanitized message. Internal details are logged with `tracing`.

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

use crate::validation::{ValidationError, ValidationErrors};

#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found
    NotFound {
        /// Resource type (e.g., "Member", "Team")
        resource: String,
        id: Option<String>,
    },

    /// 400 Bad Request
    BadRequest { message: String },

    /// 422 Unprocessable Entity
    ValidationFailed { errors: Vec<ValidationError> },

    /// 500 Internal Server Error - store failure (details logged, not exposed)
    Database {
        message: String,
        internal: DbErr,
    },
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn validation_failed(errors: Vec<ValidationError>) -> Self {
        Self::ValidationFailed { errors }
    }

    /// Wrap a store failure without reinterpreting it.
    ///
    /// Unlike the `From<DbErr>` conversion this never maps
    /// `DbErr::RecordNotFound` to a 404.
    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    /// The underlying store error, if this is a data-access failure.
    #[must_use]
    pub fn db_err(&self) -> Option<&DbErr> {
        match self {
            Self::Database { internal, .. } => Some(internal),
            _ => None,
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing message (sanitized)
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { resource, id } => match id {
                Some(id) => format!("{resource} with ID '{id}' not found"),
                None => format!("{resource} not found"),
            },
            Self::BadRequest { message }
            | Self::Database { message, .. } => message.clone(),
            Self::ValidationFailed { errors } => match errors.as_slice() {
                [single] => single.to_string(),
                _ => format!(
                    "Validation failed: {}",
                    errors
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            },
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let body = match self {
            Self::ValidationFailed { errors } => ErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(errors),
            },
            other => ErrorResponse {
                error: other.user_message(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database { internal, .. } => Some(internal),
            _ => None,
        }
    }
}

/// `RecordNotFound` becomes a 404; every other `DbErr` a data-access failure.
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::RecordNotFound(msg) => {
                let resource = msg.split_whitespace().next().unwrap_or("Resource");
                Self::NotFound {
                    resource: resource.to_string(),
                    id: None,
                }
            }
            _ => Self::database(err),
        }
    }
}

/// Malformed query strings, e.g. `?age_goe=ten`.
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::ValidationFailed {
            errors: errors.errors().to_vec(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self::ValidationFailed {
            errors: vec![error],
        }
    }
}
